//! Verification outcomes and the per-run report
//!
//! The report is the execution context for one scenario run: outcomes are
//! appended during execution and the whole report is handed back to the
//! caller, never stored globally.

/// Result of a single existence assertion
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub passed: bool,
    pub message: String,
}

/// Terminal state of a scenario run
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// Every step executed
    Completed,
    /// The environment could not support the run; remaining steps were
    /// skipped
    AbortedBySetupFailure(String),
}

/// Overall verdict derived from a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
    Inconclusive,
}

/// Report of one scenario run
#[derive(Debug)]
pub struct RunReport {
    pub scenario: String,
    pub status: RunStatus,
    pub outcomes: Vec<VerificationOutcome>,
    pub steps_run: usize,
    pub steps_total: usize,
}

impl RunReport {
    pub fn new(scenario: &str, steps_total: usize) -> Self {
        Self {
            scenario: scenario.to_string(),
            status: RunStatus::Completed,
            outcomes: Vec::new(),
            steps_run: 0,
            steps_total,
        }
    }

    /// Record an assertion outcome
    pub fn record(&mut self, passed: bool, message: impl ToString) {
        self.outcomes.push(VerificationOutcome {
            passed,
            message: message.to_string(),
        });
    }

    /// Mark the run as aborted by a setup failure
    pub fn abort(&mut self, reason: impl ToString) {
        self.status = RunStatus::AbortedBySetupFailure(reason.to_string());
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }

    /// Overall verdict: failed if any assertion failed, inconclusive if the
    /// run aborted on setup, passed otherwise
    pub fn verdict(&self) -> Verdict {
        if self.failed_count() > 0 {
            Verdict::Failed
        } else if matches!(self.status, RunStatus::AbortedBySetupFailure(_)) {
            Verdict::Inconclusive
        } else {
            Verdict::Passed
        }
    }
}
