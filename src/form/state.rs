//! Submission phase state machine
//!
//! - Idle: accepting edits and submit requests
//! - Submitting: one submit in flight; edits accepted, further submits ignored
//! - Succeeded: transient, immediately acknowledged back to Idle
//!
//! Transitions are event-driven and deterministic. A schema reload forces
//! Idle from any phase and is not modelled as a transition here.

use std::fmt;

use serde::Serialize;

use super::errors::{FormError, FormResult};

/// Lifecycle stage of the current submit attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

impl SubmissionPhase {
    /// Get the phase name for observability.
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionPhase::Idle => "Idle",
            SubmissionPhase::Submitting => "Submitting",
            SubmissionPhase::Succeeded => "Succeeded",
        }
    }

    /// Whether a submit is currently in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionPhase::Submitting)
    }

    // =========================================================================
    // ALLOWED TRANSITIONS
    // =========================================================================

    /// Idle → Submitting
    pub fn begin_submit(self) -> FormResult<Self> {
        match self {
            SubmissionPhase::Idle => Ok(SubmissionPhase::Submitting),
            other => Err(FormError::forbidden_transition(other.name(), "Submitting")),
        }
    }

    /// Submitting → Succeeded
    pub fn succeed(self) -> FormResult<Self> {
        match self {
            SubmissionPhase::Submitting => Ok(SubmissionPhase::Succeeded),
            other => Err(FormError::forbidden_transition(other.name(), "Succeeded")),
        }
    }

    /// Submitting → Idle, after the submit effect failed
    pub fn fail(self) -> FormResult<Self> {
        match self {
            SubmissionPhase::Submitting => Ok(SubmissionPhase::Idle),
            other => Err(FormError::forbidden_transition(other.name(), "Idle")),
        }
    }

    /// Succeeded → Idle
    pub fn acknowledge(self) -> FormResult<Self> {
        match self {
            SubmissionPhase::Succeeded => Ok(SubmissionPhase::Idle),
            other => Err(FormError::forbidden_transition(other.name(), "Idle")),
        }
    }
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::errors::ErrorKind;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SubmissionPhase::default(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_success_path() {
        let phase = SubmissionPhase::Idle.begin_submit().unwrap();
        assert!(phase.is_submitting());
        let phase = phase.succeed().unwrap();
        assert_eq!(phase, SubmissionPhase::Succeeded);
        assert_eq!(phase.acknowledge().unwrap(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_failure_path() {
        let phase = SubmissionPhase::Idle.begin_submit().unwrap();
        assert_eq!(phase.fail().unwrap(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_forbidden_transitions() {
        let err = SubmissionPhase::Submitting.begin_submit().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ForbiddenTransition);
        assert!(err.message().contains("Submitting -> Submitting"));

        assert!(SubmissionPhase::Idle.succeed().is_err());
        assert!(SubmissionPhase::Idle.fail().is_err());
        assert!(SubmissionPhase::Succeeded.begin_submit().is_err());
        assert!(SubmissionPhase::Submitting.acknowledge().is_err());
    }
}
