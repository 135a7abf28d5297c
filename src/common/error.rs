//! Error types for the acceptance test harness
//!
//! The taxonomy separates three families: setup failures (the environment
//! cannot support the scenario, run is inconclusive), structural errors
//! (the scenario itself is broken and must not be reported as an application
//! defect), and transport/serialization plumbing.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Setup failures (run becomes inconclusive) ===
    #[error("Required fixture '{0}' not found")]
    FixtureMissing(PathBuf),

    #[error("Failed to launch application '{program}': {reason}")]
    Launch { program: String, reason: String },

    #[error("Application did not open its automation socket within {0} seconds")]
    LaunchTimeout(u64),

    #[error("Application started but is not ready: {0}")]
    NotReady(String),

    // === Structural scenario errors ===
    #[error("Invalid scenario: {0}")]
    Scenario(String),

    #[error("Container scope '{0}' could not be resolved in the object tree")]
    ScopeNotFound(String),

    #[error("Invalid property pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // === Driver/agent communication ===
    #[error("No automation agent listening at '{0}'")]
    AgentNotListening(String),

    #[error("Failed to connect to automation agent: {0}")]
    AgentConnectionFailed(#[source] io::Error),

    #[error("Agent communication error: {0}")]
    AgentCommunication(String),

    #[error("Agent rejected '{command}': {message}")]
    AgentRequestFailed { command: String, message: String },

    // === Timeouts ===
    #[error("Step timed out after {0} ms")]
    StepTimeout(u64),

    // === Configuration ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO / serialization ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === Internal ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error means the environment could not support the run.
    ///
    /// Setup failures abort the scenario as inconclusive instead of failing
    /// an assertion.
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Error::FixtureMissing(_)
                | Error::Launch { .. }
                | Error::LaunchTimeout(_)
                | Error::NotReady(_)
                | Error::AgentNotListening(_)
        )
    }

    /// Create a launch error
    pub fn launch(program: &str, reason: impl ToString) -> Self {
        Self::Launch {
            program: program.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an agent request failure
    pub fn agent_request_failed(command: &str, message: &str) -> Self {
        Self::AgentRequestFailed {
            command: command.to_string(),
            message: message.to_string(),
        }
    }
}

/// Wire-serializable error for agent responses
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AgentError {
    pub code: String,
    pub message: String,
}

impl AgentError {
    pub fn new(code: &str, message: impl ToString) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<&Error> for AgentError {
    fn from(e: &Error) -> Self {
        let code = match e {
            Error::ScopeNotFound(_) => "SCOPE_NOT_FOUND",
            Error::InvalidPattern { .. } => "INVALID_PATTERN",
            Error::NotReady(_) => "NOT_READY",
            Error::StepTimeout(_) => "TIMEOUT",
            Error::AgentRequestFailed { .. } => "REQUEST_REJECTED",
            _ => "INTERNAL_ERROR",
        }
        .to_string();

        Self {
            code,
            message: e.to_string(),
        }
    }
}

impl From<AgentError> for Error {
    fn from(e: AgentError) -> Self {
        // Map wire errors back to our error types where possible
        match e.code.as_str() {
            "SCOPE_NOT_FOUND" => Error::ScopeNotFound(e.message),
            "NOT_READY" => Error::NotReady(e.message),
            "REQUEST_REJECTED" => Error::AgentRequestFailed {
                command: "request".to_string(),
                message: e.message,
            },
            _ => Error::AgentCommunication(e.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_failures_are_classified() {
        assert!(Error::FixtureMissing(PathBuf::from("/missing")).is_setup_failure());
        assert!(Error::LaunchTimeout(5).is_setup_failure());
        assert!(Error::NotReady("plugin load error".into()).is_setup_failure());
        assert!(!Error::ScopeNotFound("welcome".into()).is_setup_failure());
        assert!(!Error::Scenario("empty".into()).is_setup_failure());
    }

    #[test]
    fn agent_error_round_trips_scope_not_found() {
        let err = Error::ScopeNotFound("welcome.scroll_view".into());
        let wire = AgentError::from(&err);
        assert_eq!(wire.code, "SCOPE_NOT_FOUND");
        assert!(matches!(Error::from(wire), Error::ScopeNotFound(_)));
    }
}
