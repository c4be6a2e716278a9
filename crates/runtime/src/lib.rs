//! Offline-first runtime for the AriseEDU learning game.
//!
//! This crate wires the deterministic rules of `arise-core` to durable device
//! storage, a retrying server sync queue and an offline asset cache.
//! Consumers embed [`Runtime`] and interact with the game through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`offline`] holds the sync queue, snapshots, library and transport
//! - [`cache`] answers asset requests cache-first
//! - [`repository`] provides the key-value storage adapters
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod cache;
pub mod clock;
pub mod events;
pub mod offline;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use cache::{
    AssetCache, AssetFetcher, AssetRequest, AssetResponse, BACKGROUND_SYNC_TAG, CacheError,
    CacheManifest, CacheStorage,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{CacheEvent, Event, EventBus, GameStateEvent, SyncEvent, Topic};
pub use offline::{
    DeadLetter, OfflineAction, OfflineGameState, OfflineLesson, OfflineStats, SyncApi,
    SyncReport, SyncRequest, TransportError,
};
pub use repository::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, KeyValueStoreExt, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::SyncSettings;
