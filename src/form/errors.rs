//! Form controller error types
//!
//! Validation failures are not errors here: they live as data in
//! `FieldErrors`. These errors cover misuse of the controller and
//! submit effect failures.

use std::fmt;

/// Form controller error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    /// Error kind
    pub kind: ErrorKind,
    /// Error message
    pub message: String,
}

/// Form controller error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The external submit effect signalled failure; values are kept
    SubmitFailed,

    /// A value change named a field that is not in the active schema
    UnknownField,

    /// Phase transition not allowed from the current phase
    ForbiddenTransition,
}

impl ErrorKind {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::SubmitFailed => "FORM_SUBMIT_FAILED",
            ErrorKind::UnknownField => "FORM_UNKNOWN_FIELD",
            ErrorKind::ForbiddenTransition => "FORM_FORBIDDEN_TRANSITION",
        }
    }
}

impl FormError {
    /// Create a new form error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a submit failed error.
    pub fn submit_failed(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::SubmitFailed, reason)
    }

    /// Create an unknown field error.
    pub fn unknown_field(field_id: &str) -> Self {
        Self::new(
            ErrorKind::UnknownField,
            format!("field '{}' is not part of the active schema", field_id),
        )
    }

    /// Create a forbidden transition error.
    pub fn forbidden_transition(from: &str, to: &str) -> Self {
        Self::new(
            ErrorKind::ForbiddenTransition,
            format!("forbidden transition: {} -> {}", from, to),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for FormError {}

/// Result type for controller operations
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = FormError::submit_failed("connection reset");
        assert_eq!(err.to_string(), "FORM_SUBMIT_FAILED: connection reset");
        assert_eq!(err.kind(), ErrorKind::SubmitFailed);
    }

    #[test]
    fn test_unknown_field_names_field() {
        let err = FormError::unknown_field("nickname");
        assert_eq!(err.code(), "FORM_UNKNOWN_FIELD");
        assert!(err.message().contains("nickname"));
    }
}
