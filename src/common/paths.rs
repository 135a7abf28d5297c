//! Configuration and automation socket paths
//!
//! Unix/macOS: per-run Unix domain sockets under $XDG_RUNTIME_DIR or /tmp
//! Windows: named pipes (handled by the interprocess crate)

use std::io;
use std::path::PathBuf;

/// Name used for config directories and socket prefixes
const APP_NAME: &str = "uitest-cli";

/// Directory where per-run automation sockets live
///
/// Platform-specific:
/// - Unix: `$XDG_RUNTIME_DIR/uitest-cli/` or `/tmp/uitest-cli-<uid>/`
/// - Windows: unused; sockets are namespaced pipe names
#[cfg(unix)]
pub fn socket_dir() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join(APP_NAME);
    }

    // Fallback to /tmp scoped by uid for isolation between users
    let uid = std::env::var("UID").unwrap_or_else(|_| "0".to_string());
    PathBuf::from(format!("/tmp/{}-{}", APP_NAME, uid))
}

/// Build a per-run socket name for the automation agent
///
/// A fresh name per run keeps concurrent runs and stale sockets from
/// colliding.
#[cfg(unix)]
pub fn session_socket_name(run_id: u32) -> String {
    socket_dir()
        .join(format!("session-{}.sock", run_id))
        .to_string_lossy()
        .into_owned()
}

#[cfg(windows)]
pub fn session_socket_name(run_id: u32) -> String {
    let username = std::env::var("USERNAME").unwrap_or_else(|_| "default".to_string());
    format!("{}-{}-{}", APP_NAME, username, run_id)
}

/// Ensure the socket directory exists with owner-only permissions
#[cfg(unix)]
pub fn ensure_socket_dir() -> io::Result<PathBuf> {
    let dir = socket_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))?;
    }
    Ok(dir)
}

#[cfg(windows)]
pub fn ensure_socket_dir() -> io::Result<PathBuf> {
    // Named pipes don't need a directory on Windows
    Ok(PathBuf::new())
}

/// Remove a stale socket file if it exists
#[cfg(unix)]
pub fn remove_socket(name: &str) -> io::Result<()> {
    let path = PathBuf::from(name);
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    Ok(())
}

#[cfg(windows)]
pub fn remove_socket(_name: &str) -> io::Result<()> {
    // Named pipes are automatically cleaned up on Windows
    Ok(())
}

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/uitest-cli/`
/// - macOS: `~/Library/Application Support/uitest-cli/`
/// - Windows: `%APPDATA%\uitest-cli\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_socket_names_are_distinct() {
        assert_ne!(session_socket_name(1), session_socket_name(2));
    }

    #[test]
    fn test_config_dir_is_valid() {
        let dir = config_dir();
        assert!(dir.is_some());
    }
}
