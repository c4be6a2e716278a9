//! Repository layer for durable device storage.
//!
//! Everything the runtime must remember across restarts goes through a
//! [`KeyValueStore`]: the pending sync queue, dead letters, per-kind state
//! snapshots, the full game state and downloaded lessons.
//!
//! Static learning content (quests, skills, rewards) is loaded by
//! `arise-content`, not stored here.

mod error;
pub mod file;
pub mod keys;
pub mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
pub use traits::{KeyValueStore, KeyValueStoreExt};
