//! Storage error types

use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate record: {0}")]
    DuplicateRecord(String),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),
}

impl From<StorageError> for lenskit_core::Error {
    fn from(err: StorageError) -> Self {
        lenskit_core::Error::Storage(err.to_string())
    }
}
