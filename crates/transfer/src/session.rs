//! Session-keyed chunked file writes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::TransferError;
use crate::naming::resolve_unique_name;

/// One in-flight chunked write: an open sink plus bookkeeping.
struct TransferSession {
    sink: BufWriter<File>,
    resolved_name: String,
    bytes_written: u64,
    last_activity: Instant,
}

/// Session map for chunked file transfers.
///
/// Sessions are keyed by a caller-chosen identifier. Distinct sessions may
/// be driven from different bridge threads concurrently; calls for one
/// session arrive serially from one logical caller. The map lock also
/// serializes name resolution against sink creation, so two concurrent
/// starts can never resolve to the same destination.
///
/// A session identifier maps to at most one open sink: starting with an
/// identifier that is already in flight is rejected rather than silently
/// overwriting (and leaking) the previous sink.
pub struct TransferManager {
    dir: PathBuf,
    sessions: Mutex<HashMap<String, TransferSession>>,
}

impl std::fmt::Debug for TransferManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open = self
            .sessions
            .lock()
            .map(|s| s.len())
            .unwrap_or(0);
        f.debug_struct("TransferManager")
            .field("dir", &self.dir)
            .field("open_sessions", &open)
            .finish()
    }
}

impl TransferManager {
    /// Create a manager writing into `dir`. The directory must exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Destination directory for finished transfers.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Open a session: resolve a collision-free destination name, create the
    /// sink, and register it under `session_id`.
    ///
    /// Returns the resolved filename. Fails without registering anything if
    /// `session_id` is already in flight or the sink cannot be created.
    pub fn start_session(&self, filename: &str, session_id: &str) -> Result<String, TransferError> {
        let mut sessions = self.sessions.lock().expect("TransferManager lock poisoned");
        if sessions.contains_key(session_id) {
            return Err(TransferError::DuplicateSession(session_id.to_string()));
        }

        let resolved_name = resolve_unique_name(&self.dir, filename);
        let file = File::create_new(self.dir.join(&resolved_name))?;
        debug!(session_id, file = %resolved_name, "transfer session started");

        sessions.insert(
            session_id.to_string(),
            TransferSession {
                sink: BufWriter::new(file),
                resolved_name: resolved_name.clone(),
                bytes_written: 0,
                last_activity: Instant::now(),
            },
        );
        Ok(resolved_name)
    }

    /// Write one chunk to the session's sink, in call order.
    ///
    /// An unknown `session_id` is an error; it never disturbs other
    /// sessions.
    pub fn append_chunk(&self, session_id: &str, bytes: &[u8]) -> Result<(), TransferError> {
        let mut sessions = self.sessions.lock().expect("TransferManager lock poisoned");
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| TransferError::UnknownSession(session_id.to_string()))?;

        session.sink.write_all(bytes)?;
        session.bytes_written += bytes.len() as u64;
        session.last_activity = Instant::now();
        Ok(())
    }

    /// Flush, close, and deregister a session. Returns the resolved
    /// filename of the completed file.
    pub fn finish_session(&self, session_id: &str) -> Result<String, TransferError> {
        let session = {
            let mut sessions = self.sessions.lock().expect("TransferManager lock poisoned");
            sessions
                .remove(session_id)
                .ok_or_else(|| TransferError::UnknownSession(session_id.to_string()))?
        };

        let file = session
            .sink
            .into_inner()
            .map_err(|e| TransferError::Io(e.into_error()))?;
        file.sync_all()?;
        debug!(
            session_id,
            file = %session.resolved_name,
            bytes = session.bytes_written,
            "transfer session finished"
        );
        Ok(session.resolved_name)
    }

    /// Close and deregister every session idle for longer than `max_idle`.
    ///
    /// A started session that is never finished would otherwise hold its
    /// sink until process teardown. Partial files stay on disk. Returns the
    /// number of sessions reaped.
    pub fn reap_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.lock().expect("TransferManager lock poisoned");
        let before = sessions.len();
        sessions.retain(|session_id, session| {
            if session.last_activity.elapsed() > max_idle {
                warn!(
                    session_id,
                    file = %session.resolved_name,
                    bytes = session.bytes_written,
                    "reaping idle transfer session; partial file left on disk"
                );
                false
            } else {
                true
            }
        });
        before - sessions.len()
    }

    /// Number of sessions currently in flight.
    pub fn open_sessions(&self) -> usize {
        self.sessions.lock().expect("TransferManager lock poisoned").len()
    }
}
