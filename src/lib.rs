//! uitest - a scenario-driven GUI acceptance test harness
//!
//! Executes YAML-described acceptance scenarios against a desktop
//! application whose automation agent exposes the live UI object tree over
//! a local socket.

pub mod cli;
pub mod commands;
pub mod common;
pub mod driver;
pub mod query;
pub mod scenario;
pub mod session;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use query::{ObjectNode, PropertyMatch, UiQuery};
pub use scenario::{RunReport, Scenario, Verdict};
