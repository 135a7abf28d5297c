//! Automation protocol message types
//!
//! Defines the request/response format between the harness and the
//! application's automation agent. Uses a simple length-prefixed JSON
//! protocol.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::AgentError;
use crate::query::UiQuery;

/// Request from the harness to the automation agent
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    /// Request ID for matching responses
    pub id: u64,
    /// The command to execute
    pub command: Command,
}

/// Response from the automation agent to the harness
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    /// Request ID this response corresponds to
    pub id: u64,
    /// Whether the command succeeded
    pub success: bool,
    /// Result data on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error information on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AgentError>,
}

impl Response {
    /// Create a success response
    pub fn success(id: u64, result: serde_json::Value) -> Self {
        Self {
            id,
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: u64, error: AgentError) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(error),
        }
    }

    /// Create a success response with no data
    pub fn ok(id: u64) -> Self {
        Self {
            id,
            success: true,
            result: Some(serde_json::json!({})),
            error: None,
        }
    }
}

/// Commands understood by the automation agent
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Coarse readiness check ("started without plugin error")
    Ready,

    /// Locate an element in the live object tree
    Query { query: UiQuery },

    /// Perform a named high-level UI action
    Perform {
        name: String,
        #[serde(default)]
        args: BTreeMap<String, String>,
    },

    /// Switch the application's top-level view/mode
    SwitchView { view: String },

    /// Orderly application shutdown
    Shutdown,
}

/// Result payload for [`Command::Ready`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyState {
    pub ready: bool,
    /// Plugin-load (or equivalent startup) errors the application surfaced
    #[serde(default)]
    pub plugin_errors: Vec<String>,
}
