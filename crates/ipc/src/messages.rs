//! Request, reply, and notification types for the host<->content bridge.

use serde::{Deserialize, Serialize};

use crate::payload::Base64Payload;

/// Requests from the hosted web content to the native shell.
///
/// An explicit tagged protocol: every operation is a variant, every reply
/// a [`HostReply`]. Nothing here depends on any particular dispatch
/// mechanism in the hosting runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ContentToHost {
    /// One-shot small-file save with collision-free naming
    SaveBlob {
        data: Base64Payload,
        filename: String,
        mime_type: String,
    },

    /// Open a chunked transfer session for a large export
    StartFile {
        filename: String,
        session_id: String,
    },

    /// Append one chunk to an open session, in caller order
    AppendFile {
        chunk: Base64Payload,
        session_id: String,
    },

    /// Flush, close, and deregister a session
    FinishFile {
        session_id: String,
        mime_type: String,
    },

    /// Read an externally-provided file reference fully into memory
    ReadContentUri { uri: String },

    /// Structured log line, mirrored into the on-device log file
    WriteLog { level: LogLevel, message: String },
}

/// Replies from the native shell to the hosted content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostReply {
    /// Blob written; `filename` is the collision-resolved name
    BlobSaved { filename: String },

    /// Session opened; `filename` is the collision-resolved name
    FileStarted {
        session_id: String,
        filename: String,
    },

    /// Chunk written to the session sink
    ChunkAppended { session_id: String },

    /// Session closed; the file is complete on disk
    FileFinished {
        session_id: String,
        filename: String,
    },

    /// Content read result; `None` when the read failed
    Content { data: Option<Base64Payload> },

    /// Log line accepted
    LogWritten,

    /// Request failed; never fatal to the shell
    Error { code: ErrorCode, message: String },
}

/// Fire-and-forget notifications from the shell to the hosted content.
///
/// Delivery is best-effort: notifications raised before the content runtime
/// is ready are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostToContent {
    /// Stylus side button physical press edge
    SpenButtonDown,

    /// Stylus side button physical release edge
    SpenButtonUp,

    /// Discrete click from the vendor stylus SDK (air-button remote)
    SpenRemoteClick,

    /// A file was shared into the app from another application
    SharedFile {
        uri: String,
        mime_type: Option<String>,
    },

    /// Text was shared into the app from another application
    SharedText { text: String },
}

impl HostToContent {
    /// DOM event name the hosted content listens for.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::SpenButtonDown => "spen-button-down",
            Self::SpenButtonUp => "spen-button-up",
            Self::SpenRemoteClick => "spen-remote-click",
            Self::SharedFile { .. } => "shared-file",
            Self::SharedText { .. } => "shared-text",
        }
    }
}

/// Stable failure taxonomy for [`HostReply::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    /// Sink open/write/close failure
    Io,
    /// `StartFile` with a session id that is already in flight
    DuplicateSession,
    /// `AppendFile`/`FinishFile` with no registered session
    UnknownSession,
    /// Payload failed to base64-decode
    BadPayload,
}

/// Severity of a content-originated log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}
