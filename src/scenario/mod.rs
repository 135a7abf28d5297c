//! Scenario loading, sequencing, and reporting
//!
//! A scenario is a static, ordered description of one acceptance run:
//! launch the application, drive it, assert on the resulting UI state,
//! exit. Executing it yields a report of verification outcomes.

pub mod report;
pub mod runner;
pub mod spec;

pub use report::{RunReport, RunStatus, Verdict, VerificationOutcome};
pub use runner::{print_summary, run_scenario, Sequencer};
pub use spec::{Scenario, ScenarioStep};
