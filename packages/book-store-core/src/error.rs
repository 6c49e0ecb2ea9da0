//! Store error types.

use thiserror::Error;

/// Book store operation errors.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Book not found
    #[error("Book '{id}' not found")]
    BookNotFound { id: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,

    /// Data corruption detected
    #[error("Data corruption detected: {0}")]
    DataCorruption(String),

    /// Disk full error during persistence
    #[error("Disk full: {0}")]
    DiskFull(String),

    /// I/O error during persistence
    #[error("I/O error: {0}")]
    IoError(String),

    /// Transient I/O error that may succeed on retry
    #[error("Transient I/O error: {0}")]
    TransientIoError(String),
}

impl StoreError {
    /// Wraps an I/O failure met while touching a snapshot file.
    ///
    /// Timeouts and interrupted or would-block calls become
    /// `TransientIoError` so the write can be retried.
    pub fn io(context: &str, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let message = format!("{}: {}", context, error);
        match error.kind() {
            ErrorKind::StorageFull => StoreError::DiskFull(message),
            ErrorKind::TimedOut | ErrorKind::Interrupted | ErrorKind::WouldBlock => {
                StoreError::TransientIoError(message)
            }
            _ => StoreError::IoError(message),
        }
    }

    /// Whether retrying the failed operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::TransientIoError(_))
    }
}
