//! Shared-intent payloads arriving from the platform.

use inkhost_ipc::HostToContent;

/// A share target payload handed to the shell by the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedPayload {
    /// A file reference shared from another application
    File {
        uri: String,
        mime_type: Option<String>,
    },
    /// Plain text shared from another application
    Text { text: String },
}

impl From<SharedPayload> for HostToContent {
    fn from(payload: SharedPayload) -> Self {
        match payload {
            SharedPayload::File { uri, mime_type } => HostToContent::SharedFile { uri, mime_type },
            SharedPayload::Text { text } => HostToContent::SharedText { text },
        }
    }
}
