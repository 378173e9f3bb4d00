//! Bridge message protocol for inkhost
//!
//! Defines all message types exchanged between the native host shell and the
//! hosted drawing web content. The bridge transport is text-only, so requests
//! and replies serialize as tagged JSON and binary payloads travel base64
//! encoded.

pub mod error;
pub mod messages;
pub mod payload;

pub use error::IpcError;
pub use messages::{ContentToHost, ErrorCode, HostReply, HostToContent, LogLevel};
pub use payload::Base64Payload;

/// Serialize a bridge message to its wire form.
pub fn encode<T: serde::Serialize>(message: &T) -> Result<String, IpcError> {
    Ok(serde_json::to_string(message)?)
}

/// Parse a bridge message from its wire form.
pub fn decode<'a, T: serde::Deserialize<'a>>(raw: &'a str) -> Result<T, IpcError> {
    Ok(serde_json::from_str(raw)?)
}
