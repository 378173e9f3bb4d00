//! Rotating on-device log file for content-originated log lines.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;

/// Appends structured log lines to a file, rotating at a fixed byte
/// threshold and keeping exactly one prior generation (`<name>.1`).
///
/// Appends from multiple bridge threads are serialized internally so a
/// rotation never races a write.
#[derive(Debug)]
pub struct RotatingLogFile {
    path: PathBuf,
    max_bytes: u64,
    guard: Mutex<()>,
}

impl RotatingLogFile {
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            path: path.into(),
            max_bytes,
            guard: Mutex::new(()),
        }
    }

    /// Path of the current generation.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Append one timestamped line, rotating first if the current file has
    /// reached the threshold.
    pub fn append(&self, level: &str, message: &str) -> io::Result<()> {
        let _guard = self.guard.lock().expect("RotatingLogFile lock poisoned");
        self.rotate_if_needed()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{} [{}] {}",
            Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            level,
            message
        )
    }

    fn rotate_if_needed(&self) -> io::Result<()> {
        let size = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        if size < self.max_bytes {
            return Ok(());
        }

        let mut rotated = self.path.as_os_str().to_owned();
        rotated.push(".1");
        let rotated = PathBuf::from(rotated);
        // Drop the previous generation; rename is not atomic-over-existing
        // everywhere.
        match fs::remove_file(&rotated) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::rename(&self.path, &rotated)
    }
}
