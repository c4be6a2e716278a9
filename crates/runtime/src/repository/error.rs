//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by key-value store implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("key-value store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error for key {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupted entry file name: {0}")]
    CorruptedKey(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
