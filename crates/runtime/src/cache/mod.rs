//! Asset cache layer.
//!
//! Precaches the app shell and game assets on install, reclaims outdated
//! caches on activate and answers requests cache-first so the app keeps
//! working without a network.

mod error;
mod fetcher;
mod layer;
mod storage;
mod types;

pub use error::CacheError;
pub use fetcher::{AssetFetcher, HttpAssetFetcher};
pub use layer::{
    AssetCache, BACKGROUND_SYNC_TAG, BackgroundSync, CacheManifest, GAME_CACHE_NAME,
    STATIC_CACHE_NAME,
};
pub use storage::{CacheStorage, FileCacheStorage, MemoryCacheStorage};
pub use types::{AssetRequest, AssetResponse, RequestDestination, ResponseKind};
