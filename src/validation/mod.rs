//! Validation engine
//!
//! Stateless functions mapping (descriptor, value) to an optional message
//! and (schema, values) to a full error map. No I/O, no allocation beyond
//! the returned messages.

mod validator;

pub use validator::{
    is_email_shaped, validate_field, validate_form, FieldErrors, FormValues, INVALID_EMAIL_MESSAGE,
    INVALID_FORMAT_MESSAGE, REQUIRED_MESSAGE,
};
