//! Observable form lifecycle events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Host configuration loaded
    ConfigLoaded,

    // Schema
    /// A schema document was accepted and became active
    SchemaLoaded,
    /// A schema document was rejected; the previous schema stays active
    SchemaRejected,
    /// Values, errors and phase were cleared for a new schema
    FormReset,

    // Editing
    /// A single field was revalidated after a value change
    FieldValidated,

    // Submission
    /// Submit blocked by validation errors
    SubmitRejected,
    /// Submit ignored because one is already in flight
    SubmitIgnored,
    /// Submit effect invoked
    SubmitStarted,
    /// Submit effect reported success
    SubmitSucceeded,
    /// Submit effect reported failure
    SubmitFailed,
    /// Completion arrived for a schema that has since been replaced
    StaleCompletionIgnored,
}

impl Event {
    /// Returns the event name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::FormReset => "FORM_RESET",
            Event::FieldValidated => "FIELD_VALIDATED",
            Event::SubmitRejected => "SUBMIT_REJECTED",
            Event::SubmitIgnored => "SUBMIT_IGNORED",
            Event::SubmitStarted => "SUBMIT_STARTED",
            Event::SubmitSucceeded => "SUBMIT_SUCCEEDED",
            Event::SubmitFailed => "SUBMIT_FAILED",
            Event::StaleCompletionIgnored => "STALE_COMPLETION_IGNORED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::FieldValidated => Severity::Trace,
            Event::SchemaRejected | Event::SubmitFailed | Event::SubmitIgnored => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
