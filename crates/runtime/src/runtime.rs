//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the game offline-first.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arise_content::GameContent;
use arise_core::GameState;
use directories::ProjectDirs;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::cache::{
    AssetCache, AssetFetcher, CacheManifest, CacheStorage, FileCacheStorage, HttpAssetFetcher,
    MemoryCacheStorage,
};
use crate::clock::{Clock, SystemClock};
use crate::events::EventBus;
use crate::offline::{
    Connectivity, DEFAULT_MAX_RETRIES, DEFAULT_SNAPSHOT_CAP, HttpSyncApi, OfflineLibrary,
    SnapshotStore, SyncApi, SyncQueue,
};
use crate::repository::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, KeyValueStoreExt, keys,
};
use crate::workers::{
    PersistenceCommand, PersistenceWorker, StoreCommand, StoreWorker, SyncCommand, SyncSettings,
    SyncWorker,
};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Base URL of the progress API, e.g. `https://arise.example.org`.
    pub api_base_url: String,
    /// Origin the asset cache treats as same-origin.
    pub origin: String,
    /// Root for durable records and cached assets. `None` keeps everything
    /// in memory.
    pub data_dir: Option<PathBuf>,
    pub sync_interval: Duration,
    pub sync_timeout: Duration,
    pub max_retries: u32,
    pub snapshot_cap: usize,
    pub growth_interval: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub start_online: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_owned(),
            origin: "http://localhost:5000".to_owned(),
            data_dir: None,
            sync_interval: Duration::from_secs(30),
            sync_timeout: Duration::from_secs(10),
            max_retries: DEFAULT_MAX_RETRIES,
            snapshot_cap: DEFAULT_SNAPSHOT_CAP,
            growth_interval: Duration::from_secs(15 * 60),
            event_buffer_size: 100,
            command_buffer_size: 32,
            start_online: true,
        }
    }
}

impl RuntimeConfig {
    /// Platform data directory, e.g. `~/.local/share/arise` on Linux.
    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from("org", "arise", "arise").map(|dirs| dirs.data_dir().to_path_buf())
    }

    fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            interval: self.sync_interval,
            request_timeout: self.sync_timeout,
            max_retries: self.max_retries,
        }
    }
}

/// Main runtime that orchestrates the offline-first game.
///
/// Runtime owns the workers; [`RuntimeHandle`] provides a cloneable façade
/// for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    asset_cache: Arc<AssetCache>,

    store_worker_handle: JoinHandle<()>,
    persistence_worker_handle: JoinHandle<()>,
    sync_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Offline asset cache; its background-sync tag flushes this runtime's
    /// queue.
    pub fn asset_cache(&self) -> Arc<AssetCache> {
        Arc::clone(&self.asset_cache)
    }

    /// Shutdown the runtime gracefully.
    ///
    /// Workers stop in dependency order: the store first, then persistence
    /// once it has recorded every applied action, then the sync worker with
    /// whatever persistence queued.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown_store().await?;
        self.store_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        self.handle.shutdown_persistence().await?;
        self.persistence_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        self.handle.shutdown_sync().await?;
        self.sync_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!("runtime stopped");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
///
/// Every collaborator has a production default: file-backed storage under
/// `data_dir` (in memory without one), the HTTP sync API and asset fetcher,
/// and the system clock.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    content: GameContent,
    store: Option<Arc<dyn KeyValueStore>>,
    sync_api: Option<Arc<dyn SyncApi>>,
    clock: Option<Arc<dyn Clock>>,
    cache_storage: Option<Arc<dyn CacheStorage>>,
    asset_fetcher: Option<Arc<dyn AssetFetcher>>,
    manifest: Option<CacheManifest>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: GameContent::default(),
            store: None,
            sync_api: None,
            clock: None,
            cache_storage: None,
            asset_fetcher: None,
            manifest: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Catalogs and rules used to seed a new game.
    pub fn content(mut self, content: GameContent) -> Self {
        self.content = content;
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sync_api(mut self, api: Arc<dyn SyncApi>) -> Self {
        self.sync_api = Some(api);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn cache_storage(mut self, storage: Arc<dyn CacheStorage>) -> Self {
        self.cache_storage = Some(storage);
        self
    }

    pub fn asset_fetcher(mut self, fetcher: Arc<dyn AssetFetcher>) -> Self {
        self.asset_fetcher = Some(fetcher);
        self
    }

    /// Replace the cache names and precache lists.
    pub fn manifest(mut self, manifest: CacheManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Build the runtime and spawn its workers.
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;

        let store: Arc<dyn KeyValueStore> = match (self.store, &config.data_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(FileKeyValueStore::new(dir.join("store"))?),
            (None, None) => Arc::new(InMemoryKeyValueStore::new()),
        };
        let cache_storage: Arc<dyn CacheStorage> = match (self.cache_storage, &config.data_dir) {
            (Some(storage), _) => storage,
            (None, Some(dir)) => Arc::new(FileCacheStorage::new(dir.join("cache"))?),
            (None, None) => Arc::new(MemoryCacheStorage::new()),
        };
        let sync_api = self.sync_api.unwrap_or_else(|| {
            Arc::new(HttpSyncApi::new(
                config.api_base_url.clone(),
                Arc::clone(&store),
            ))
        });
        let asset_fetcher = self
            .asset_fetcher
            .unwrap_or_else(|| Arc::new(HttpAssetFetcher::new(config.origin.clone())));
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let manifest = self
            .manifest
            .unwrap_or_else(|| CacheManifest::new(config.origin.clone()));

        let initial_state = restore_state(store.as_ref(), &self.content);

        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let connectivity = Connectivity::new(config.start_online);
        let snapshots = SnapshotStore::new(Arc::clone(&store), config.snapshot_cap);
        let queue = SyncQueue::load(Arc::clone(&store))?;
        let library = Arc::new(OfflineLibrary::new(Arc::clone(&store), Arc::clone(&sync_api)));

        let (store_tx, store_rx) = mpsc::channel::<StoreCommand>(config.command_buffer_size);
        let (sync_tx, sync_rx) = mpsc::channel::<SyncCommand>(config.command_buffer_size);
        let (persistence_tx, persistence_rx) =
            mpsc::channel::<PersistenceCommand>(config.command_buffer_size);

        let handle = RuntimeHandle::new(
            store_tx,
            sync_tx.clone(),
            persistence_tx.clone(),
            event_bus.clone(),
            connectivity.clone(),
            snapshots.clone(),
            library,
            Arc::clone(&store),
            Arc::clone(&clock),
        );

        let sync_worker = SyncWorker::new(
            queue,
            sync_api,
            Arc::clone(&clock),
            config.sync_settings(),
            connectivity.clone(),
            sync_rx,
            event_bus.clone(),
        );
        let sync_worker_handle = tokio::spawn(async move {
            sync_worker.run().await;
        });

        let persistence_worker = PersistenceWorker::new(
            Arc::clone(&store),
            snapshots,
            connectivity.clone(),
            Arc::clone(&clock),
            persistence_rx,
            sync_tx,
        );
        let persistence_worker_handle = tokio::spawn(async move {
            persistence_worker.run().await;
        });

        let store_worker = StoreWorker::new(
            initial_state,
            self.content.config.clone(),
            self.content.skills.clone(),
            Arc::clone(&clock),
            config.growth_interval,
            store_rx,
            persistence_tx,
            event_bus.clone(),
        );
        let store_worker_handle = tokio::spawn(async move {
            store_worker.run().await;
        });

        let asset_cache = Arc::new(
            AssetCache::new(manifest, cache_storage, asset_fetcher, event_bus)
                .with_connectivity(connectivity)
                .with_background_sync(Arc::new(handle.clone())),
        );

        info!(
            online = config.start_online,
            data_dir = ?config.data_dir,
            "runtime started"
        );

        Ok(Runtime {
            handle,
            asset_cache,
            store_worker_handle,
            persistence_worker_handle,
            sync_worker_handle,
        })
    }
}

/// Saved game state, or a fresh one seeded from `content`.
///
/// An unreadable saved state is logged and replaced rather than blocking
/// start-up.
fn restore_state(store: &dyn KeyValueStore, content: &GameContent) -> GameState {
    match store.get_json::<GameState>(keys::GAME_STATE) {
        Ok(Some(state)) => {
            info!(nonce = state.nonce, "restored saved game state");
            state
        }
        Ok(None) => content.initial_state(),
        Err(error) => {
            warn!(%error, "saved game state unreadable, starting fresh");
            content.initial_state()
        }
    }
}
