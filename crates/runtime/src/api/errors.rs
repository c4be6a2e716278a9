//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, storage, the network and the
//! cache layer so clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::cache::CacheError;
pub use crate::offline::TransportError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("worker command channel closed")]
    CommandChannelClosed,

    #[error("worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    /// Sync was requested while the device is offline.
    #[error("device is offline")]
    Offline,

    #[error("{action} produced an unexpected output")]
    UnexpectedOutput { action: &'static str },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
