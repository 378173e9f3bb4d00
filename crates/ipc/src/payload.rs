//! Base64 payload wrapper for binary data crossing the text-only bridge.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::IpcError;

/// An opaque byte buffer in its bridge wire form.
///
/// The bridge channel is text-only, so binary payloads (exported drawings,
/// file chunks, content reads) travel as standard base64. The wrapper keeps
/// the encoded form until a consumer actually needs the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Base64Payload(String);

impl Base64Payload {
    /// Encode raw bytes into their wire form.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Wrap an already-encoded string without validating it.
    ///
    /// Validation happens at [`decode`](Self::decode) time.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Decode back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, IpcError> {
        Ok(STANDARD.decode(&self.0)?)
    }

    /// The encoded wire string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
