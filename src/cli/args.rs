//! CLI argument definitions using clap
//!
//! Commands:
//! - formgen check --schema <path>
//! - formgen validate --schema <path> --values <path>
//! - formgen render --schema <path> [--values <path>]
//! - formgen submit --schema <path> --values <path> [--config <path>]
//! - formgen session [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formgen - schema-driven form validation engine
#[derive(Parser, Debug)]
#[command(name = "formgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a schema and print it back normalized, or the structural error
    Check {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,
    },

    /// Validate a values file against a schema
    Validate {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,
        /// Path to a JSON object of field id to value
        #[arg(long)]
        values: PathBuf,
    },

    /// Render a schema as plain text
    Render {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,
        /// Optional values to show in the widgets
        #[arg(long)]
        values: Option<PathBuf>,
    },

    /// Fill a form from a values file and run one submission
    Submit {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,
        /// Path to a JSON object of field id to value
        #[arg(long)]
        values: PathBuf,
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Drive a form interactively with line-delimited JSON events on stdin
    Session {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
