//! Structural errors raised while loading a schema document
//!
//! Error codes:
//! - FORM_SCHEMA_MALFORMED
//! - FORM_SCHEMA_MISSING_FIELD
//! - FORM_SCHEMA_INVALID_FIELD
//! - FORM_SCHEMA_INVALID_PATTERN
//!
//! Every structural error is fatal to the load attempt that produced it.
//! None of them ever reaches the validation engine.

use thiserror::Error;

/// Defect in the schema document itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// Document is not parseable; carries the raw parser message
    #[error("Malformed schema document: {0}")]
    MalformedDocument(String),

    /// Top-level key missing or of the wrong type
    #[error("Missing or mistyped top-level key '{0}'")]
    MissingField(String),

    /// A field entry violates a schema invariant
    #[error("Invalid field '{id}': {reason}")]
    InvalidField { id: String, reason: String },

    /// A validation pattern does not compile
    #[error("Invalid pattern on field '{field_id}': {reason}")]
    InvalidPattern { field_id: String, reason: String },
}

impl StructuralError {
    pub fn invalid_field(id: impl Into<String>, reason: impl Into<String>) -> Self {
        StructuralError::InvalidField {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_pattern(field_id: impl Into<String>, reason: impl Into<String>) -> Self {
        StructuralError::InvalidPattern {
            field_id: field_id.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StructuralError::MalformedDocument(_) => "FORM_SCHEMA_MALFORMED",
            StructuralError::MissingField(_) => "FORM_SCHEMA_MISSING_FIELD",
            StructuralError::InvalidField { .. } => "FORM_SCHEMA_INVALID_FIELD",
            StructuralError::InvalidPattern { .. } => "FORM_SCHEMA_INVALID_PATTERN",
        }
    }

    /// Returns the offending field id, if the error concerns a single field
    pub fn field_id(&self) -> Option<&str> {
        match self {
            StructuralError::InvalidField { id, .. } => Some(id),
            StructuralError::InvalidPattern { field_id, .. } => Some(field_id),
            _ => None,
        }
    }
}

/// Result type for schema loading
pub type SchemaResult<T> = Result<T, StructuralError>;
