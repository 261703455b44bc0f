//! Store error types
//!
//! Error codes:
//! - USER_STORE_DUPLICATE_KEY
//! - USER_STORE_MISSING_RECORD
//! - USER_STORE_IO_ERROR
//! - USER_STORE_CORRUPTION
//! - USER_STORE_CODEC_ERROR
//! - USER_STORE_POISONED
//! - USER_STORE_TASK_FAILED

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store failures. None of these are recovered by the dispatcher.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert of a key that already has a live record
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Replace or remove of a key with no live record
    #[error("No record for key: {0}")]
    MissingRecord(String),

    /// Disk I/O failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Record log failed verification
    #[error("Corrupted record log at byte offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// Stored body could not be encoded or decoded
    #[error("Record codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A writer panicked while holding the store lock
    #[error("Store lock poisoned")]
    Poisoned,

    /// Blocking store task did not complete
    #[error("Store task failed: {0}")]
    TaskFailed(String),
}

impl StoreError {
    /// I/O failure with context
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }

    /// Corruption detected at `offset`
    pub fn corruption(offset: u64, reason: impl Into<String>) -> Self {
        StoreError::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateKey(_) => "USER_STORE_DUPLICATE_KEY",
            StoreError::MissingRecord(_) => "USER_STORE_MISSING_RECORD",
            StoreError::Io { .. } => "USER_STORE_IO_ERROR",
            StoreError::Corruption { .. } => "USER_STORE_CORRUPTION",
            StoreError::Codec(_) => "USER_STORE_CODEC_ERROR",
            StoreError::Poisoned => "USER_STORE_POISONED",
            StoreError::TaskFailed(_) => "USER_STORE_TASK_FAILED",
        }
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::TaskFailed(err.to_string())
    }
}
