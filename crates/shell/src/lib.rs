//! inkhost - native host shell core for a collaborative drawing webview app
//!
//! Ties the stylus sanitizer and the storage bridge together behind the
//! typed bridge protocol: content requests come in as
//! [`ContentToHost`](inkhost_ipc::ContentToHost) and are answered with a
//! [`HostReply`](inkhost_ipc::HostReply); host-side happenings (button
//! edges, shared intents) flow out as best-effort
//! [`HostToContent`](inkhost_ipc::HostToContent) notifications.

pub mod intent;
pub mod logging;
pub mod shell;

pub use intent::SharedPayload;
pub use shell::HostShell;
