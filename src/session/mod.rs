//! Application session lifecycle
//!
//! The only component that spawns or terminates the application under test.
//! Launch resolves the program, spawns it with the automation socket name in
//! its environment, then polls until the agent accepts connections or the
//! deadline passes. A session that never becomes reachable is a setup
//! failure, not a harness crash.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::{Child, Command};

use crate::common::{paths, Error, Result};
use crate::driver::{transport, SocketDriver};

/// Environment variable carrying the automation socket name to the
/// application
pub const SOCKET_ENV_VAR: &str = "UITEST_SOCKET";

/// How the application under test is launched
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchSpec {
    /// Program name (resolved on PATH) or path to the executable
    pub program: PathBuf,

    /// Arguments, e.g. a settings-path flag pointing at a scratch profile
    #[serde(default)]
    pub args: Vec<String>,
}

/// A running application under test
#[derive(Debug)]
pub struct AppSession {
    child: Child,
    socket_name: String,
}

impl AppSession {
    /// Launch the application and wait for its automation agent
    pub async fn start(launch: &LaunchSpec, launch_timeout: Duration) -> Result<Self> {
        let program = resolve_program(&launch.program)?;
        let socket_name = paths::session_socket_name(std::process::id());

        paths::ensure_socket_dir()?;
        paths::remove_socket(&socket_name)?;

        tracing::debug!(program = %program.display(), socket = %socket_name, "launching application");

        let child = Command::new(&program)
            .args(&launch.args)
            .env(SOCKET_ENV_VAR, &socket_name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::launch(&program.display().to_string(), e))?;

        let mut session = Self { child, socket_name };
        session.wait_for_agent(launch_timeout).await?;
        Ok(session)
    }

    /// Poll until the agent socket accepts a connection
    async fn wait_for_agent(&mut self, timeout: Duration) -> Result<()> {
        let deadline = std::time::Instant::now() + timeout;

        loop {
            if !self.is_alive() {
                return Err(Error::launch(
                    &self.socket_name,
                    "application exited before opening its automation socket",
                ));
            }

            if std::time::Instant::now() >= deadline {
                return Err(Error::LaunchTimeout(timeout.as_secs()));
            }

            tokio::time::sleep(Duration::from_millis(50)).await;

            if !transport::socket_exists(&self.socket_name) {
                continue;
            }

            match transport::connect(&self.socket_name).await {
                Ok(_) => {
                    tracing::debug!("automation agent is accepting connections");
                    return Ok(());
                }
                Err(_) => continue,
            }
        }
    }

    /// Connect a driver to this session's automation agent
    pub async fn connect(&self) -> Result<SocketDriver> {
        SocketDriver::connect(&self.socket_name).await
    }

    /// Whether the application process is still running
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Wait for the application to exit, killing it after the grace period
    ///
    /// Call after the driver has requested shutdown; the kill is the
    /// backstop for an application that hangs on exit.
    pub async fn stop(mut self, grace: Duration) -> Result<()> {
        let waited = tokio::time::timeout(grace, self.child.wait()).await;
        match waited {
            Ok(status) => {
                let status = status?;
                tracing::debug!(?status, "application exited");
            }
            Err(_) => {
                tracing::warn!("application did not exit within grace period, killing");
                self.child.kill().await?;
            }
        }
        paths::remove_socket(&self.socket_name)?;
        Ok(())
    }
}

/// Resolve a program name to an executable path
///
/// Bare names are looked up on PATH; anything with a path separator is used
/// as-is.
fn resolve_program(program: &PathBuf) -> Result<PathBuf> {
    if program.components().count() > 1 {
        return Ok(program.clone());
    }
    which::which(program).map_err(|e| Error::launch(&program.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_used_verbatim() {
        let p = PathBuf::from("./target/debug/mock-app");
        assert_eq!(resolve_program(&p).unwrap(), p);
    }

    #[test]
    fn unknown_bare_name_is_a_launch_error() {
        let p = PathBuf::from("definitely-not-a-real-program-xyz");
        assert!(matches!(resolve_program(&p), Err(Error::Launch { .. })));
    }

    #[tokio::test]
    async fn launch_of_missing_program_is_setup_failure() {
        let launch = LaunchSpec {
            program: PathBuf::from("/nonexistent/path/to/app"),
            args: vec![],
        };
        let err = AppSession::start(&launch, Duration::from_millis(100))
            .await
            .expect_err("launch should fail");
        assert!(err.is_setup_failure());
    }
}
