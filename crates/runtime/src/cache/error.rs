use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("network request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// Network unavailable and nothing cached for the request.
    #[error("{url} is not available offline")]
    Offline { url: String },

    #[error("precaching {url} into {cache} failed with status {status}")]
    InstallFailed {
        cache: String,
        url: String,
        status: u16,
    },

    #[error("invalid cache name: {0}")]
    InvalidCacheName(String),

    #[error("cache storage lock was poisoned")]
    LockPoisoned,

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;
