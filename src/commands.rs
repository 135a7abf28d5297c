//! CLI command definitions
//!
//! Defines the clap commands for the harness.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run an acceptance scenario
    Run {
        /// Path to the scenario YAML file
        scenario: PathBuf,

        /// Print located elements and extra detail
        #[arg(long, short)]
        verbose: bool,

        /// Override the bounded per-step wait, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Check a scenario file for structural problems without launching
    /// anything
    Validate {
        /// Path to the scenario YAML file
        scenario: PathBuf,
    },
}
