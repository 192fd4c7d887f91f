//! Field and form validation
//!
//! Evaluation order per field (first failure wins):
//! 1. required and empty
//! 2. author pattern does not match a non-empty value
//! 3. email kind with a non-empty value of the wrong shape
//!
//! Whitespace-only values count as non-empty. Validation is pure,
//! deterministic and cheap enough to run on every keystroke.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::schema::{FieldDescriptor, FieldKind, SchemaModel};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid format";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// Current value per field id. An absent key reads as the empty string.
pub type FormValues = BTreeMap<String, String>;

/// Error message per field id; an empty message means the field passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the outcome for one field, replacing any previous entry.
    pub fn set(&mut self, field_id: impl Into<String>, outcome: Option<String>) {
        self.0.insert(field_id.into(), outcome.unwrap_or_default());
    }

    /// Returns the message for a field, or `None` when it has no error.
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0
            .get(field_id)
            .map(String::as_str)
            .filter(|message| !message.is_empty())
    }

    /// Whether every entry is the no-error sentinel
    pub fn is_valid(&self) -> bool {
        self.0.values().all(String::is_empty)
    }

    /// Number of entries, including passing ones
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.0.contains_key(field_id)
    }

    /// Iterates over failing fields only.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(id, message)| (id.as_str(), message.as_str()))
    }
}

const EMAIL_SHAPE: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Compiled once; `None` only if the constant above stops compiling.
fn email_shape() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_SHAPE).ok()).as_ref()
}

/// Checks the canonical address shape: one `@`, non-whitespace local and
/// domain parts, and a dot inside the domain.
pub fn is_email_shaped(value: &str) -> bool {
    email_shape().is_some_and(|shape| shape.is_match(value))
}

/// Validates one candidate value against its descriptor.
pub fn validate_field(descriptor: &FieldDescriptor, value: &str) -> Option<String> {
    if value.is_empty() {
        return descriptor.required.then(|| REQUIRED_MESSAGE.to_string());
    }

    if let Some(rule) = &descriptor.validation {
        if let Some(pattern) = &rule.pattern {
            if !pattern.is_match(value) {
                return Some(
                    rule.message
                        .clone()
                        .unwrap_or_else(|| INVALID_FORMAT_MESSAGE.to_string()),
                );
            }
        }
    }

    if descriptor.kind == FieldKind::Email && !is_email_shaped(value) {
        return Some(INVALID_EMAIL_MESSAGE.to_string());
    }

    None
}

/// Validates every field of the schema. The result holds exactly one entry
/// per schema field, touched or not.
pub fn validate_form(schema: &SchemaModel, values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in &schema.fields {
        let value = values.get(&field.id).map(String::as_str).unwrap_or("");
        errors.set(&field.id, validate_field(field, value));
    }

    errors
}
