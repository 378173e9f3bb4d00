//! Shared configuration for the inkhost shell
//!
//! This crate provides the single source of truth for the storage location,
//! log rotation threshold, and session idle timeout shared by the transfer
//! bridge and the host shell.

use std::path::PathBuf;
use std::time::Duration;

use directories::UserDirs;
use serde::{Deserialize, Serialize};

/// Default rotation threshold for the on-device log file, in bytes
pub const DEFAULT_LOG_ROTATE_BYTES: u64 = 256 * 1024;

/// Default idle timeout after which an unfinished transfer session is reaped
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 300;

/// File name of the on-device log, created inside the storage directory
pub const LOG_FILE_NAME: &str = "inkhost.log";

/// Shell configuration: where files land and how housekeeping behaves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Directory that receives saved blobs and finished transfers
    pub storage_dir: PathBuf,
    /// Log file rotation threshold in bytes
    pub log_rotate_bytes: u64,
    /// Idle timeout in seconds before an unfinished session is reaped
    pub session_idle_secs: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            log_rotate_bytes: DEFAULT_LOG_ROTATE_BYTES,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
        }
    }
}

impl ShellConfig {
    /// Create a config saving into the given directory, with default housekeeping
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the on-device log file
    pub fn log_path(&self) -> PathBuf {
        self.storage_dir.join(LOG_FILE_NAME)
    }

    /// Session idle timeout as a [`Duration`]
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

/// Platform download directory, falling back to the current directory when
/// no user profile is available (e.g. in CI).
fn default_storage_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
