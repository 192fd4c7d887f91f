//! Form state subsystem
//!
//! Drives a single form through edits and submissions:
//! - values and field errors are owned here and only changed through the controller
//! - field errors are always recomputed from values, never edited directly
//! - at most one submission is in flight, without any queue
//! - a schema reload resets everything and orphans any in-flight submission

mod controller;
mod errors;
mod state;
mod submit;

pub use controller::{FormSnapshot, FormStateController};
pub use errors::{ErrorKind, FormError, FormResult};
pub use state::SubmissionPhase;
pub use submit::{Completion, SubmitDecision, SubmitEffect, SubmitFailure, SubmitOutcome, SubmitTicket};
