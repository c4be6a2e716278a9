//! Offline-first plumbing: the pending action queue, per-kind snapshots,
//! downloadable content and the server transport.
//!
//! Every record here is written through a [`crate::repository::KeyValueStore`]
//! so it survives restarts; nothing in this module spawns tasks. The sync
//! and persistence workers drive it.

mod action;
mod connectivity;
mod library;
mod queue;
mod snapshot;
mod transport;

pub use action::{
    DEFAULT_MAX_RETRIES, DeadLetter, OfflineAction, OfflineStats, SyncReport, action_id,
};
pub use connectivity::Connectivity;
pub use library::{LessonProgress, OfflineLesson, OfflineLibrary};
pub use queue::{FailureOutcome, MAX_DEAD_LETTERS, SyncQueue};
pub use snapshot::{
    DEFAULT_SNAPSHOT_CAP, OfflineGameState, SNAPSHOT_SCHEMA_VERSION, SnapshotStore, sub_state_json,
};
pub use transport::{HttpSyncApi, SyncApi, SyncRequest, TransportError, endpoint};
