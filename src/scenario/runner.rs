//! Scenario execution
//!
//! Drives the session controller and the UI driver through the ordered step
//! list. Steps run strictly in order; a setup failure short-circuits the
//! remainder of the run as inconclusive, while a failed assertion is recorded
//! and execution continues.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use crate::common::{config::Config, Error, Result};
use crate::driver::UiDriver;
use crate::session::AppSession;

use super::report::{RunReport, RunStatus};
use super::spec::{Scenario, ScenarioStep};

/// Sequencer state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    NotStarted,
    Running,
    Completed,
    Aborted,
}

/// Executes a scenario's steps against a connected driver
pub struct Sequencer<'a> {
    driver: &'a mut dyn UiDriver,
    step_timeout: Duration,
    verbose: bool,
}

impl<'a> Sequencer<'a> {
    pub fn new(driver: &'a mut dyn UiDriver, step_timeout: Duration, verbose: bool) -> Self {
        Self {
            driver,
            step_timeout,
            verbose,
        }
    }

    /// Run all steps, producing the run report
    ///
    /// Structural errors (unresolvable scope, broken scenario) propagate;
    /// everything else lands in the report.
    pub async fn run(&mut self, scenario: &Scenario) -> Result<RunReport> {
        let mut report = RunReport::new(&scenario.name, scenario.steps.len());
        let mut state = RunState::NotStarted;

        for (i, step) in scenario.steps.iter().enumerate() {
            let step_num = i + 1;

            match state {
                RunState::NotStarted => {
                    // Validation guarantees the first step is Launch.
                    debug_assert!(matches!(step, ScenarioStep::Launch));
                }
                RunState::Running => {}
                RunState::Completed | RunState::Aborted => break,
            }

            match step {
                ScenarioStep::Launch => match self.readiness_gate().await {
                    Ok(()) => {
                        state = RunState::Running;
                        report.steps_run = step_num;
                        println!("  {} Step {}: launch", "✓".green(), step_num);
                    }
                    Err(reason) => {
                        println!(
                            "  {} Step {}: launch ({})",
                            "∅".yellow(),
                            step_num,
                            reason.dimmed()
                        );
                        report.abort(reason);
                        state = RunState::Aborted;
                    }
                },

                ScenarioStep::Perform { name, args } => {
                    let label = format!("perform {}", name);
                    bounded_step(
                        &mut report,
                        step_num,
                        &label,
                        self.step_timeout,
                        self.driver.perform(name, args),
                    )
                    .await?;
                    report.steps_run = step_num;
                }

                ScenarioStep::SwitchView { view } => {
                    let label = format!("switch to {}", view);
                    bounded_step(
                        &mut report,
                        step_num,
                        &label,
                        self.step_timeout,
                        self.driver.switch_view(view),
                    )
                    .await?;
                    report.steps_run = step_num;
                }

                ScenarioStep::AssertExists { query, message } => {
                    let found = tokio::time::timeout(self.step_timeout, self.driver.find(query))
                        .await
                        .unwrap_or(Err(Error::StepTimeout(
                            self.step_timeout.as_millis() as u64
                        )));

                    match found {
                        Ok(Some(element)) => {
                            report.record(true, message);
                            println!(
                                "  {} Step {}: {}",
                                "✓".green(),
                                step_num,
                                message.dimmed()
                            );
                            if self.verbose {
                                println!(
                                    "      found {} '{}'",
                                    element.type_name.dimmed(),
                                    element.id.dimmed()
                                );
                            }
                        }
                        Ok(None) => {
                            report.record(false, message);
                            println!("  {} Step {}: {}", "✗".red(), step_num, message);
                        }
                        Err(Error::StepTimeout(ms)) => {
                            report.record(false, format!("{} (timed out after {} ms)", message, ms));
                            println!(
                                "  {} Step {}: {} (timed out)",
                                "✗".red(),
                                step_num,
                                message
                            );
                        }
                        // Unresolvable scope means the scenario is broken,
                        // not that the application misbehaved.
                        Err(e) => return Err(e),
                    }
                    report.steps_run = step_num;
                }

                ScenarioStep::Exit => {
                    let done =
                        tokio::time::timeout(self.step_timeout, self.driver.shutdown()).await;
                    match done {
                        Ok(Ok(())) => {
                            println!("  {} Step {}: exit", "✓".green(), step_num);
                        }
                        Ok(Err(e)) => {
                            tracing::warn!(error = %e, "shutdown request failed");
                            println!("  {} Step {}: exit ({})", "✗".red(), step_num, e);
                        }
                        Err(_) => {
                            tracing::warn!("shutdown request timed out");
                        }
                    }
                    report.steps_run = step_num;
                    state = RunState::Completed;
                }
            }
        }

        Ok(report)
    }

    /// Launch readiness: the application must answer and report no startup
    /// errors. Anything else is a setup failure.
    async fn readiness_gate(&mut self) -> std::result::Result<(), String> {
        let ready = tokio::time::timeout(self.step_timeout, self.driver.ready()).await;
        match ready {
            Ok(Ok(state)) if state.ready && state.plugin_errors.is_empty() => Ok(()),
            Ok(Ok(state)) if !state.plugin_errors.is_empty() => Err(format!(
                "application reported startup errors: {}",
                state.plugin_errors.join("; ")
            )),
            Ok(Ok(_)) => Err("application reported not ready".to_string()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "readiness check timed out after {} ms",
                self.step_timeout.as_millis()
            )),
        }
    }

}

/// Run an action step under the bounded wait
///
/// A timeout or an agent-side rejection is recorded as a failed outcome;
/// structural and transport errors propagate.
async fn bounded_step<F>(
    report: &mut RunReport,
    step_num: usize,
    label: &str,
    step_timeout: Duration,
    fut: F,
) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let result = tokio::time::timeout(step_timeout, fut)
        .await
        .unwrap_or(Err(Error::StepTimeout(step_timeout.as_millis() as u64)));

    match result {
        Ok(()) => {
            println!("  {} Step {}: {}", "✓".green(), step_num, label.dimmed());
            Ok(())
        }
        Err(Error::StepTimeout(ms)) => {
            report.record(false, format!("{} timed out after {} ms", label, ms));
            println!("  {} Step {}: {} (timed out)", "✗".red(), step_num, label);
            Ok(())
        }
        Err(Error::AgentRequestFailed { command, message }) => {
            report.record(false, format!("{} failed: {}", label, message));
            println!(
                "  {} Step {}: {} ({} rejected: {})",
                "✗".red(),
                step_num,
                label,
                command,
                message
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Run a scenario from a YAML file
///
/// Owns the whole lifecycle: load and validate, fixture preflight, launch,
/// sequence the steps, tear the session down, return the report.
pub async fn run_scenario(
    path: &Path,
    config: &Config,
    verbose: bool,
    timeout_override_ms: Option<u64>,
) -> Result<RunReport> {
    let scenario = Scenario::load(path)?;
    let steps_total = scenario.steps.len();

    println!(
        "\n{} {}",
        "Running Scenario:".blue().bold(),
        scenario.name.white().bold()
    );
    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    let step_timeout = Duration::from_millis(
        timeout_override_ms
            .or(scenario.settings.step_timeout_ms)
            .unwrap_or(config.timeouts.step_wait_ms),
    );

    // Fixture preflight: a missing fixture aborts before anything launches.
    let scenario_dir = path.parent().unwrap_or(Path::new("."));
    if let Err(e) = scenario.check_fixtures(scenario_dir, &config.fixtures.roots) {
        println!("\n{} {}", "∅".yellow().bold(), e.to_string().yellow());
        let mut report = RunReport::new(&scenario.name, steps_total);
        report.abort(e.to_string());
        return Ok(report);
    }

    println!("\n{}", "Steps:".cyan());

    let session = match AppSession::start(
        &scenario.application,
        Duration::from_secs(config.timeouts.launch_secs),
    )
    .await
    {
        Ok(session) => session,
        Err(e) if e.is_setup_failure() => {
            println!("\n{} {}", "∅".yellow().bold(), e.to_string().yellow());
            let mut report = RunReport::new(&scenario.name, steps_total);
            report.abort(e.to_string());
            return Ok(report);
        }
        Err(e) => return Err(e),
    };

    let mut driver = session.connect().await?;
    let report = Sequencer::new(&mut driver, step_timeout, verbose)
        .run(&scenario)
        .await;

    // Best-effort teardown even when sequencing errored: the session
    // controller is the only component allowed to leave a process behind.
    let _ = tokio::time::timeout(step_timeout, driver.shutdown()).await;
    session
        .stop(Duration::from_millis(config.timeouts.shutdown_grace_ms))
        .await?;

    report
}

/// Print the report summary in the runner's output style
pub fn print_summary(report: &RunReport) {
    use super::report::Verdict;

    match report.verdict() {
        Verdict::Passed => {
            println!(
                "\n{} {} ({} checks)\n",
                "✓".green().bold(),
                "Scenario Passed".green().bold(),
                report.outcomes.len()
            );
        }
        Verdict::Failed => {
            println!(
                "\n{} {} ({}/{} checks failed)\n",
                "✗".red().bold(),
                "Scenario Failed".red().bold(),
                report.failed_count(),
                report.outcomes.len()
            );
            for outcome in report.outcomes.iter().filter(|o| !o.passed) {
                println!("  {} {}", "✗".red(), outcome.message);
            }
        }
        Verdict::Inconclusive => {
            let reason = match &report.status {
                RunStatus::AbortedBySetupFailure(reason) => reason.as_str(),
                RunStatus::Completed => "",
            };
            println!(
                "\n{} {} ({})\n",
                "∅".yellow().bold(),
                "Scenario Inconclusive".yellow().bold(),
                reason
            );
        }
    }
}
