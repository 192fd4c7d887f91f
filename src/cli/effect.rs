//! Host-side submit effects
//!
//! `SimulatedSubmit` stands in for a network call: it waits a fixed delay
//! and then succeeds (or fails when configured to). `TimeoutSubmit` bounds
//! any effect; the engine itself never times out a submission.

use std::time::Duration;

use crate::form::{SubmitEffect, SubmitFailure};
use crate::validation::FormValues;

use super::config::Config;

/// Delay-then-resolve submit effect
#[derive(Debug, Clone)]
pub struct SimulatedSubmit {
    delay: Duration,
    fail: bool,
}

impl SimulatedSubmit {
    pub fn new(delay: Duration, fail: bool) -> Self {
        Self { delay, fail }
    }
}

impl SubmitEffect for SimulatedSubmit {
    async fn submit(&self, values: FormValues) -> Result<(), SubmitFailure> {
        tokio::time::sleep(self.delay).await;

        if self.fail {
            return Err(SubmitFailure::new(format!(
                "simulated failure submitting {} values",
                values.len()
            )));
        }

        Ok(())
    }
}

/// Wraps an effect with an upper bound on how long it may take.
#[derive(Debug, Clone)]
pub struct TimeoutSubmit<E> {
    inner: E,
    limit: Option<Duration>,
}

impl<E> TimeoutSubmit<E> {
    pub fn new(inner: E, limit: Option<Duration>) -> Self {
        Self { inner, limit }
    }
}

impl<E: SubmitEffect> SubmitEffect for TimeoutSubmit<E> {
    async fn submit(&self, values: FormValues) -> Result<(), SubmitFailure> {
        match self.limit {
            Some(limit) => tokio::time::timeout(limit, self.inner.submit(values))
                .await
                .map_err(|_| SubmitFailure::new(format!("submit timed out after {}ms", limit.as_millis())))?,
            None => self.inner.submit(values).await,
        }
    }
}

/// Builds the effect described by the configuration.
pub fn effect_from_config(config: &Config) -> TimeoutSubmit<SimulatedSubmit> {
    TimeoutSubmit::new(
        SimulatedSubmit::new(config.submit_delay(), config.fail_submissions),
        config.submit_timeout(),
    )
}
