//! CLI command handling
//!
//! Dispatches CLI commands and maps run verdicts to exit codes. A failed
//! scenario exits non-zero; an inconclusive (setup-unavailable) run exits
//! zero, since "can't test" is not "test failed".

use colored::Colorize;

use crate::commands::Commands;
use crate::common::{config::Config, Result};
use crate::scenario::{self, Scenario, Verdict};

/// Dispatch a CLI command, returning the process exit code
pub async fn dispatch(command: Commands) -> Result<i32> {
    match command {
        Commands::Run {
            scenario,
            verbose,
            timeout_ms,
        } => {
            let config = Config::load()?;
            let report = scenario::run_scenario(&scenario, &config, verbose, timeout_ms).await?;
            scenario::print_summary(&report);

            Ok(match report.verdict() {
                Verdict::Passed | Verdict::Inconclusive => 0,
                Verdict::Failed => 1,
            })
        }

        Commands::Validate { scenario } => {
            let loaded = Scenario::load(&scenario)?;
            println!(
                "{} {} ({} steps, {} fixtures)",
                "✓".green(),
                format!("'{}' is structurally valid", loaded.name).bold(),
                loaded.steps.len(),
                loaded.fixtures.len()
            );
            Ok(0)
        }
    }
}
