//! Error type for storage bridge operations.

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer session {0:?} is already in flight")]
    DuplicateSession(String),

    #[error("no transfer session registered under {0:?}")]
    UnknownSession(String),
}
