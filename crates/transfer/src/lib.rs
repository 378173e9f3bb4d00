//! Device storage bridge for the inkhost shell.
//!
//! Persists exported drawings to device storage: one-shot blob saves,
//! session-keyed chunked writes for large exports, content reads, and the
//! rotating on-device log file. All destination names are resolved
//! collision-free with a numeric disambiguator.

pub mod blob;
pub mod error;
pub mod logfile;
pub mod naming;
pub mod session;

pub use blob::{read_content, save_blob};
pub use error::TransferError;
pub use logfile::RotatingLogFile;
pub use naming::resolve_unique_name;
pub use session::TransferManager;
