//! Configuration file handling

use serde::Deserialize;
use std::path::PathBuf;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Fixture lookup settings
    #[serde(default)]
    pub fixtures: FixtureConfig,
}

/// Timeout settings
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// How long to wait for the application to open its automation socket
    #[serde(default = "default_launch_secs")]
    pub launch_secs: u64,

    /// Default bounded wait for a single scenario step, in milliseconds
    #[serde(default = "default_step_wait_ms")]
    pub step_wait_ms: u64,

    /// Grace period before the application process is killed on exit
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            launch_secs: default_launch_secs(),
            step_wait_ms: default_step_wait_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

fn default_launch_secs() -> u64 {
    15
}
fn default_step_wait_ms() -> u64 {
    30_000
}
fn default_shutdown_grace_ms() -> u64 {
    3_000
}

/// Fixture lookup configuration
#[derive(Debug, Deserialize, Default)]
pub struct FixtureConfig {
    /// Extra roots searched when a scenario references a relative fixture
    /// path that does not resolve next to the scenario file
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }
}
