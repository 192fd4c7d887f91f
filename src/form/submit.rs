//! Submit effect abstraction
//!
//! The submit effect is the only asynchronous step in the engine. The
//! controller hands a validated snapshot of the values to an injected
//! `SubmitEffect` and later receives its success or failure as a
//! completion event. There is no timeout and no retry at this level.

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::validation::{FieldErrors, FormValues};

/// Failure signalled by a submit effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct SubmitFailure {
    pub reason: String,
}

impl SubmitFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// External collaborator that delivers validated values somewhere.
pub trait SubmitEffect: Send + Sync {
    /// Deliver the values. Resolves once the delivery has succeeded or failed.
    fn submit(&self, values: FormValues) -> impl Future<Output = Result<(), SubmitFailure>> + Send;
}

/// Handle for one in-flight submission.
///
/// Returned by `on_submit` and handed back to `on_submit_complete`. The
/// epoch ties it to the schema that was active when it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub(crate) id: Uuid,
    pub(crate) epoch: u64,
    pub(crate) values: FormValues,
    pub(crate) requested_at: DateTime<Utc>,
}

impl SubmitTicket {
    pub(crate) fn new(epoch: u64, values: FormValues) -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch,
            values,
            requested_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The validated values to hand to the submit effect
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }
}

/// Result of a submit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Validation failed; the errors are now the displayed field errors
    Rejected(FieldErrors),
    /// A submission is already in flight; nothing changed
    AlreadySubmitting,
    /// All fields passed; run the effect and report back with the ticket
    Ready(SubmitTicket),
}

/// Result of applying a submit completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The submission succeeded; values and errors were cleared
    Succeeded(Uuid),
    /// The ticket no longer matches the active schema or in-flight submission
    Stale,
}

/// Result of a full submit cycle run by `submit_with`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(FieldErrors),
    AlreadySubmitting,
    Succeeded {
        submission_id: Uuid,
        values: FormValues,
    },
}
