//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::form::FormError;
use crate::schema::StructuralError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Schema document rejected
    SchemaRejected,
    /// Values file rejected
    InvalidValues,
    /// Form controller reported an error
    FormError,
    /// Session event could not be understood
    InvalidRequest,
    /// Async runtime could not start
    RuntimeError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FORM_CLI_CONFIG_ERROR",
            Self::IoError => "FORM_CLI_IO_ERROR",
            Self::SchemaRejected => "FORM_CLI_SCHEMA_REJECTED",
            Self::InvalidValues => "FORM_CLI_INVALID_VALUES",
            Self::FormError => "FORM_CLI_FORM_ERROR",
            Self::InvalidRequest => "FORM_CLI_INVALID_REQUEST",
            Self::RuntimeError => "FORM_CLI_RUNTIME_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Values file error
    pub fn invalid_values(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidValues, msg)
    }

    /// Malformed session event
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    /// Runtime startup error
    pub fn runtime_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RuntimeError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StructuralError> for CliError {
    fn from(e: StructuralError) -> Self {
        Self::new(CliErrorCode::SchemaRejected, format!("{} ({})", e, e.code()))
    }
}

impl From<FormError> for CliError {
    fn from(e: FormError) -> Self {
        Self::new(CliErrorCode::FormError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_conversion_keeps_code() {
        let err: CliError = StructuralError::MissingField("fields".into()).into();
        assert_eq!(err.code(), &CliErrorCode::SchemaRejected);
        assert!(err.message().contains("FORM_SCHEMA_MISSING_FIELD"));
    }

    #[test]
    fn test_display() {
        let err = CliError::config_error("bad level");
        assert_eq!(err.to_string(), "FORM_CLI_CONFIG_ERROR: bad level");
        assert_eq!(err.code_str(), "FORM_CLI_CONFIG_ERROR");
    }
}
