//! Observability subsystem
//!
//! This module provides:
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Operational counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on form state
//! 3. Logging failures never surface as form errors
//!
//! # Usage
//!
//! ```ignore
//! use formgen::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::SchemaLoaded, &[("fields", "4")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
