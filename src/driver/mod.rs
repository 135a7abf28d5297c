//! UI driver toward the application under test
//!
//! The application's live object tree is externally owned; the harness only
//! holds a capability to query it, perform named actions, and request
//! shutdown. `SocketDriver` implements this over a local socket; tests
//! substitute in-process drivers.

mod client;
pub mod protocol;
pub mod transport;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use client::SocketDriver;
pub use protocol::ReadyState;

use crate::common::Result;
use crate::query::{ElementInfo, UiQuery};

/// Capability to observe and drive the application under test
#[async_trait]
pub trait UiDriver: Send {
    /// Coarse readiness check after launch
    async fn ready(&mut self) -> Result<ReadyState>;

    /// Resolve a query against the live object tree
    ///
    /// `Ok(None)` means no element matched; scope-resolution failures are
    /// errors.
    async fn find(&mut self, query: &UiQuery) -> Result<Option<ElementInfo>>;

    /// Perform a named high-level UI action
    async fn perform(&mut self, name: &str, args: &BTreeMap<String, String>) -> Result<()>;

    /// Switch the application's top-level view/mode
    async fn switch_view(&mut self, view: &str) -> Result<()>;

    /// Request orderly application shutdown
    async fn shutdown(&mut self) -> Result<()>;
}
