//! formgen - a schema-driven form engine
//!
//! A JSON schema describes a form's fields. The engine loads it into a
//! typed model, validates values per field and per form, and drives the
//! submission lifecycle through an injected async effect.

pub mod cli;
pub mod form;
pub mod observability;
pub mod render;
pub mod schema;
pub mod validation;
