//! The host shell: request dispatch, input sanitizing, notifications.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use tracing::{debug, error, info, warn};

use inkhost_config::ShellConfig;
use inkhost_ipc::{Base64Payload, ContentToHost, ErrorCode, HostReply, HostToContent, LogLevel};
use inkhost_stylus::{ButtonEdge, InputEvent, Outcome, StylusSanitizer};
use inkhost_transfer::{RotatingLogFile, TransferError, TransferManager};

use crate::intent::SharedPayload;

/// The native shell around the hosted drawing content.
///
/// Owns the stylus sanitizer, the transfer bridge, and the on-device log
/// file. Bridge requests arrive on whatever thread the hosting runtime
/// dispatches them from; touch events arrive on the input thread. Each
/// subsystem guards its own state, so the shell itself is `Sync`.
pub struct HostShell {
    config: ShellConfig,
    sanitizer: Mutex<StylusSanitizer>,
    transfers: TransferManager,
    log_file: RotatingLogFile,
    content_ready: AtomicBool,
    #[allow(clippy::type_complexity)]
    listeners: RwLock<Vec<Box<dyn Fn(HostToContent) + Send + Sync>>>,
}

impl std::fmt::Debug for HostShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostShell")
            .field("storage_dir", &self.config.storage_dir)
            .field("content_ready", &self.content_ready.load(Ordering::Relaxed))
            .field("open_sessions", &self.transfers.open_sessions())
            .finish()
    }
}

impl HostShell {
    /// Build a shell for the given configuration, creating the storage
    /// directory if needed.
    pub fn new(config: ShellConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.storage_dir)?;
        let transfers = TransferManager::new(&config.storage_dir);
        let log_file = RotatingLogFile::new(config.log_path(), config.log_rotate_bytes);
        info!(storage_dir = %config.storage_dir.display(), "host shell ready");
        Ok(Self {
            config,
            sanitizer: Mutex::new(StylusSanitizer::new()),
            transfers,
            log_file,
            content_ready: AtomicBool::new(false),
            listeners: RwLock::new(Vec::new()),
        })
    }

    /// Register a listener for host-to-content notifications.
    ///
    /// Listeners receive cloned notifications in registration order.
    pub fn add_content_listener<F>(&self, listener: F)
    where
        F: Fn(HostToContent) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.write().expect("HostShell lock poisoned");
        listeners.push(Box::new(listener));
    }

    /// Mark the content runtime as ready (or not) to receive notifications.
    /// While not ready, notifications are dropped, not queued.
    pub fn set_content_ready(&self, ready: bool) {
        self.content_ready.store(ready, Ordering::Relaxed);
    }

    // ------------------------------------------------------------------
    // Bridge request dispatch
    // ------------------------------------------------------------------

    /// Handle one bridge request. No request is fatal: every failure maps
    /// to [`HostReply::Error`].
    pub fn dispatch(&self, request: ContentToHost) -> HostReply {
        match request {
            ContentToHost::SaveBlob {
                data,
                filename,
                mime_type,
            } => self.save_blob(&data, &filename, &mime_type),
            ContentToHost::StartFile {
                filename,
                session_id,
            } => self.start_file(&filename, &session_id),
            ContentToHost::AppendFile { chunk, session_id } => {
                self.append_file(&chunk, &session_id)
            }
            ContentToHost::FinishFile {
                session_id,
                mime_type,
            } => self.finish_file(&session_id, &mime_type),
            ContentToHost::ReadContentUri { uri } => self.read_content_uri(&uri),
            ContentToHost::WriteLog { level, message } => {
                self.write_log(level, &message);
                HostReply::LogWritten
            }
        }
    }

    fn save_blob(&self, data: &Base64Payload, filename: &str, mime_type: &str) -> HostReply {
        let bytes = match data.decode() {
            Ok(bytes) => bytes,
            Err(e) => return bad_payload("saveBlob", e),
        };
        match inkhost_transfer::save_blob(&self.config.storage_dir, filename, &bytes) {
            Ok(resolved) => {
                debug!(file = %resolved, mime_type, "blob saved via bridge");
                HostReply::BlobSaved { filename: resolved }
            }
            Err(e) => transfer_error("saveBlob", e),
        }
    }

    fn start_file(&self, filename: &str, session_id: &str) -> HostReply {
        match self.transfers.start_session(filename, session_id) {
            Ok(resolved) => HostReply::FileStarted {
                session_id: session_id.to_string(),
                filename: resolved,
            },
            Err(e) => transfer_error("startFile", e),
        }
    }

    fn append_file(&self, chunk: &Base64Payload, session_id: &str) -> HostReply {
        let bytes = match chunk.decode() {
            Ok(bytes) => bytes,
            Err(e) => return bad_payload("appendFile", e),
        };
        match self.transfers.append_chunk(session_id, &bytes) {
            Ok(()) => HostReply::ChunkAppended {
                session_id: session_id.to_string(),
            },
            Err(e) => transfer_error("appendFile", e),
        }
    }

    fn finish_file(&self, session_id: &str, mime_type: &str) -> HostReply {
        match self.transfers.finish_session(session_id) {
            Ok(resolved) => {
                debug!(session_id, file = %resolved, mime_type, "file finished via bridge");
                HostReply::FileFinished {
                    session_id: session_id.to_string(),
                    filename: resolved,
                }
            }
            Err(e) => transfer_error("finishFile", e),
        }
    }

    fn read_content_uri(&self, uri: &str) -> HostReply {
        let data = resolve_uri(uri)
            .and_then(|path| inkhost_transfer::read_content(&path))
            .map(|bytes| Base64Payload::from_bytes(&bytes));
        HostReply::Content { data }
    }

    /// Emit a content-originated log line to tracing and mirror it into the
    /// rotating on-device log file. File write failures are logged and
    /// swallowed; the bridge call itself never fails.
    pub fn write_log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!(target: "content", "{message}"),
            LogLevel::Warn => warn!(target: "content", "{message}"),
            LogLevel::Info => info!(target: "content", "{message}"),
            LogLevel::Debug => debug!(target: "content", "{message}"),
        }
        if let Err(e) = self.log_file.append(level.as_str(), message) {
            warn!(error = %e, "failed to persist content log line");
        }
    }

    // ------------------------------------------------------------------
    // Host-side entry points
    // ------------------------------------------------------------------

    /// Run one raw touch event through the sanitizer.
    ///
    /// Returns the event to hand to the platform's touch dispatch, exactly
    /// once. Side-button edges are raised to the content as notifications.
    pub fn handle_touch(&self, event: InputEvent) -> InputEvent {
        let result = {
            let mut sanitizer = self.sanitizer.lock().expect("HostShell lock poisoned");
            sanitizer.sanitize(&event)
        };
        if let Some(edge) = result.edge {
            self.notify(match edge {
                ButtonEdge::Pressed => HostToContent::SpenButtonDown,
                ButtonEdge::Released => HostToContent::SpenButtonUp,
            });
        }
        match result.outcome {
            Outcome::Passthrough => event,
            Outcome::Rewritten(rewritten) => rewritten,
        }
    }

    /// Forward a shared-intent payload to the content runtime.
    pub fn handle_shared_intent(&self, payload: SharedPayload) {
        self.notify(payload.into());
    }

    /// Discrete button event from the vendor stylus SDK. Only presses are
    /// surfaced; the SDK reports releases unreliably across devices.
    pub fn handle_remote_button(&self, pressed: bool) {
        if pressed {
            self.notify(HostToContent::SpenRemoteClick);
        }
    }

    /// Close transfer sessions idle beyond the configured timeout. Returns
    /// the number reaped.
    pub fn reap_idle_sessions(&self) -> usize {
        self.transfers.reap_idle(self.config.session_idle())
    }

    /// Best-effort delivery of one notification to the content runtime.
    fn notify(&self, notification: HostToContent) {
        if !self.content_ready.load(Ordering::Relaxed) {
            debug!(event = notification.event_name(), "content not ready, notification dropped");
            return;
        }
        let listeners = self.listeners.read().expect("HostShell lock poisoned");
        for listener in listeners.iter() {
            listener(notification.clone());
        }
    }
}

/// Map a bridge URI to a local filesystem path. Only `file://` URIs and
/// absolute paths are resolvable here; anything else is the platform
/// resolver's job and reads as a failed lookup.
fn resolve_uri(uri: &str) -> Option<PathBuf> {
    if let Some(path) = uri.strip_prefix("file://") {
        return Some(PathBuf::from(path));
    }
    if uri.starts_with('/') {
        return Some(PathBuf::from(uri));
    }
    warn!(uri, "unsupported content uri scheme");
    None
}

fn transfer_error(operation: &str, e: TransferError) -> HostReply {
    let code = match &e {
        TransferError::Io(_) => ErrorCode::Io,
        TransferError::DuplicateSession(_) => ErrorCode::DuplicateSession,
        TransferError::UnknownSession(_) => ErrorCode::UnknownSession,
    };
    // Unknown sessions are commonly retried finishes; keep those visible
    // but quiet.
    match code {
        ErrorCode::UnknownSession => warn!(operation, error = %e, "bridge request failed"),
        _ => error!(operation, error = %e, "bridge request failed"),
    }
    HostReply::Error {
        code,
        message: e.to_string(),
    }
}

fn bad_payload(operation: &str, e: inkhost_ipc::IpcError) -> HostReply {
    warn!(operation, error = %e, "bridge payload rejected");
    HostReply::Error {
        code: ErrorCode::BadPayload,
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;

    use inkhost_stylus::event::{buttons, Action, PointerSample, ToolType};

    fn shell_in(dir: &std::path::Path) -> HostShell {
        HostShell::new(ShellConfig::new(dir)).unwrap()
    }

    fn recorded(shell: &HostShell) -> Arc<StdMutex<Vec<HostToContent>>> {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        shell.add_content_listener(move |n| sink.lock().unwrap().push(n));
        seen
    }

    fn stylus_event(action: Action, button_state: u32) -> InputEvent {
        InputEvent {
            pointers: vec![PointerSample {
                id: 0,
                x: 1.0,
                y: 2.0,
                pressure: 0.8,
                size: 0.1,
                orientation: 0.0,
            }],
            tool_type: ToolType::Stylus,
            action,
            down_time_ms: 0,
            event_time_ms: 1,
            button_state,
            meta_state: 0,
            device_id: 1,
            source: 0x4002,
            flags: 0,
            x_precision: 1.0,
            y_precision: 1.0,
        }
    }

    #[test]
    fn test_save_blob_dispatch_resolves_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell_in(dir.path());
        fs::write(dir.path().join("drawing.png"), b"existing").unwrap();

        let reply = shell.dispatch(ContentToHost::SaveBlob {
            data: Base64Payload::from_bytes(b"png-bytes"),
            filename: "drawing.png".into(),
            mime_type: "image/png".into(),
        });
        assert_eq!(
            match reply {
                HostReply::BlobSaved { filename } => filename,
                other => panic!("unexpected reply: {other:?}"),
            },
            "drawing(1).png"
        );
        assert_eq!(
            fs::read(dir.path().join("drawing(1).png")).unwrap(),
            b"png-bytes"
        );
    }

    #[test]
    fn test_chunked_transfer_through_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell_in(dir.path());

        let reply = shell.dispatch(ContentToHost::StartFile {
            filename: "export.png".into(),
            session_id: "s1".into(),
        });
        let resolved = match reply {
            HostReply::FileStarted { filename, .. } => filename,
            other => panic!("unexpected reply: {other:?}"),
        };

        for chunk in [b"head".as_slice(), b"-body", b"-tail"] {
            let reply = shell.dispatch(ContentToHost::AppendFile {
                chunk: Base64Payload::from_bytes(chunk),
                session_id: "s1".into(),
            });
            assert!(matches!(reply, HostReply::ChunkAppended { .. }));
        }

        let reply = shell.dispatch(ContentToHost::FinishFile {
            session_id: "s1".into(),
            mime_type: "image/png".into(),
        });
        assert!(matches!(reply, HostReply::FileFinished { .. }));
        assert_eq!(
            fs::read(dir.path().join(&resolved)).unwrap(),
            b"head-body-tail"
        );
    }

    #[test]
    fn test_unknown_and_duplicate_sessions_reported() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell_in(dir.path());

        let reply = shell.dispatch(ContentToHost::AppendFile {
            chunk: Base64Payload::from_bytes(b"lost"),
            session_id: "ghost".into(),
        });
        assert!(matches!(
            reply,
            HostReply::Error {
                code: ErrorCode::UnknownSession,
                ..
            }
        ));

        shell.dispatch(ContentToHost::StartFile {
            filename: "a.bin".into(),
            session_id: "s1".into(),
        });
        let reply = shell.dispatch(ContentToHost::StartFile {
            filename: "b.bin".into(),
            session_id: "s1".into(),
        });
        assert!(matches!(
            reply,
            HostReply::Error {
                code: ErrorCode::DuplicateSession,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_base64_payload_rejected_session_survives() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell_in(dir.path());

        shell.dispatch(ContentToHost::StartFile {
            filename: "export.bin".into(),
            session_id: "s1".into(),
        });
        let reply = shell.dispatch(ContentToHost::AppendFile {
            chunk: Base64Payload::from_encoded("@@not-base64@@"),
            session_id: "s1".into(),
        });
        assert!(matches!(
            reply,
            HostReply::Error {
                code: ErrorCode::BadPayload,
                ..
            }
        ));

        // The rejected chunk wrote nothing; the session is still good.
        let reply = shell.dispatch(ContentToHost::AppendFile {
            chunk: Base64Payload::from_bytes(b"good"),
            session_id: "s1".into(),
        });
        assert!(matches!(reply, HostReply::ChunkAppended { .. }));
    }

    #[test]
    fn test_read_content_uri_file_scheme_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell_in(dir.path());
        let path = dir.path().join("shared.bin");
        fs::write(&path, b"shared-bytes").unwrap();

        let reply = shell.dispatch(ContentToHost::ReadContentUri {
            uri: format!("file://{}", path.display()),
        });
        match reply {
            HostReply::Content { data: Some(data) } => {
                assert_eq!(data.decode().unwrap(), b"shared-bytes");
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        let reply = shell.dispatch(ContentToHost::ReadContentUri {
            uri: "content://provider/item/1".into(),
        });
        assert!(matches!(reply, HostReply::Content { data: None }));
    }

    #[test]
    fn test_write_log_persists_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell_in(dir.path());

        let reply = shell.dispatch(ContentToHost::WriteLog {
            level: LogLevel::Warn,
            message: "slow frame".into(),
        });
        assert!(matches!(reply, HostReply::LogWritten));

        let contents =
            fs::read_to_string(dir.path().join(inkhost_config::LOG_FILE_NAME)).unwrap();
        assert!(contents.contains("[warn] slow frame"));
    }

    #[test]
    fn test_notifications_dropped_until_content_ready() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell_in(dir.path());
        let seen = recorded(&shell);

        shell.handle_remote_button(true);
        assert!(seen.lock().unwrap().is_empty());

        shell.set_content_ready(true);
        shell.handle_remote_button(true);
        shell.handle_remote_button(false);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![HostToContent::SpenRemoteClick]
        );
    }

    #[test]
    fn test_touch_edges_reach_content_and_event_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell_in(dir.path());
        shell.set_content_ready(true);
        let seen = recorded(&shell);

        let forwarded = shell.handle_touch(stylus_event(Action::Down, buttons::STYLUS_PRIMARY));
        assert_eq!(forwarded.button_state, buttons::PRIMARY);

        let forwarded = shell.handle_touch(stylus_event(Action::Up, 0));
        assert_eq!(forwarded.button_state, 0);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![HostToContent::SpenButtonDown, HostToContent::SpenButtonUp]
        );
    }

    #[test]
    fn test_shared_intent_forwarded_to_content() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell_in(dir.path());
        shell.set_content_ready(true);
        let seen = recorded(&shell);

        shell.handle_shared_intent(SharedPayload::Text {
            text: "look at this sketch".into(),
        });
        assert_eq!(
            *seen.lock().unwrap(),
            vec![HostToContent::SharedText {
                text: "look at this sketch".into()
            }]
        );
    }

    #[test]
    fn test_reap_idle_sessions_uses_configured_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ShellConfig::new(dir.path());
        config.session_idle_secs = 0;
        let shell = HostShell::new(config).unwrap();

        shell.dispatch(ContentToHost::StartFile {
            filename: "stale.bin".into(),
            session_id: "s1".into(),
        });
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(shell.reap_idle_sessions(), 1);
    }
}
