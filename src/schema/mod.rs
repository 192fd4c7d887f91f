//! Schema subsystem
//!
//! A schema is a data-only description of a form: its title, description
//! and an ordered list of field descriptors.
//!
//! # Design Principles
//!
//! - Schemas are immutable once loaded
//! - Loading checks shape only, never user values
//! - A bad document is rejected whole; nothing is partially applied
//! - Patterns are compiled at load time, so validation never sees a bad one
//! - Patterns follow the browser dialect: look-around, backreferences and
//!   ASCII-only `\d`/`\w`

mod errors;
mod loader;
mod pattern;
mod types;

pub use errors::{SchemaResult, StructuralError};
pub use loader::SchemaLoader;
pub use pattern::FieldPattern;
pub use types::{FieldDescriptor, FieldKind, FieldOption, SchemaModel, ValidationRule};
