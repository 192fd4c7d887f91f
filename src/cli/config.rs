//! Host configuration
//!
//! JSON file, every key optional:
//! - submit_delay_ms: simulated network latency of the submit effect (default 1000)
//! - submit_timeout_ms: bound on the submit effect, enforced by the host (default none)
//! - fail_submissions: make the simulated effect fail (default false)
//! - log_level: minimum log severity (default "info")

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,

    #[serde(default)]
    pub submit_timeout_ms: Option<u64>,

    #[serde(default)]
    pub fail_submissions: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_submit_delay_ms() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_submit_delay_ms(),
            submit_timeout_ms: None,
            fail_submissions: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Load from an optional path; no path means defaults.
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error or fatal.",
                self.log_level
            )));
        }

        if self.submit_timeout_ms == Some(0) {
            return Err(CliError::config_error("submit_timeout_ms must be > 0"));
        }

        Ok(())
    }

    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_ms.map(Duration::from_millis)
    }
}
