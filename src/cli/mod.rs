//! CLI module for formgen
//!
//! Provides command-line interface for:
//! - check: Load a schema and report it or its structural error
//! - validate: Validate a values file against a schema
//! - render: Print a plain text rendering of a form
//! - submit: Run one submission through the simulated effect
//! - session: Drive a form with line-delimited JSON events

mod args;
mod commands;
mod config;
mod effect;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, render, run, run_command, run_session, session, submit, validate};
pub use config::Config;
pub use effect::{effect_from_config, SimulatedSubmit, TimeoutSubmit};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_values, read_events, write_error, write_response};
