//! Cache-first request handling for the learning app shell and game assets.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use super::error::{CacheError, Result};
use super::fetcher::AssetFetcher;
use super::storage::CacheStorage;
use super::types::{AssetRequest, AssetResponse, RequestDestination};
use crate::events::{CacheEvent, EventBus};
use crate::offline::{Connectivity, SyncReport};

pub const STATIC_CACHE_NAME: &str = "arise-learning-v2";
pub const GAME_CACHE_NAME: &str = "arise-games-v1";

/// Sync tag that flushes the offline action queue.
pub const BACKGROUND_SYNC_TAG: &str = "background-sync";

const STATIC_ASSETS: &[&str] = &["/", "/manifest.json", "/src/main.tsx", "/src/index.css"];

const GAME_ASSETS: &[&str] = &[
    "/src/components/mini-games/",
    "/src/components/village/",
    "/src/components/skills/",
    "/src/components/farming/",
    "/src/components/festivals/",
    "/src/components/community/",
    "/src/components/ar/",
    "/src/lib/game-engine.ts",
];

/// Cache names and precache lists of one app version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    /// Scheme and host that count as same-origin, without a trailing slash.
    pub origin: String,
    pub static_cache: String,
    pub game_cache: String,
    pub static_assets: Vec<String>,
    pub game_assets: Vec<String>,
}

impl CacheManifest {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_owned(),
            static_cache: STATIC_CACHE_NAME.to_owned(),
            game_cache: GAME_CACHE_NAME.to_owned(),
            static_assets: STATIC_ASSETS.iter().map(|path| path.to_string()).collect(),
            game_assets: GAME_ASSETS.iter().map(|path| path.to_string()).collect(),
        }
    }

    /// Absolute URL of an origin-relative path.
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    pub fn is_same_origin(&self, url: &str) -> bool {
        url.strip_prefix(&self.origin)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    fn is_current(&self, cache: &str) -> bool {
        cache == self.static_cache || cache == self.game_cache
    }
}

/// Flushes the offline queue when a background sync fires.
#[async_trait]
pub trait BackgroundSync: Send + Sync {
    async fn flush(&self) -> crate::api::Result<SyncReport>;
}

/// Offline cache in front of the network.
pub struct AssetCache {
    manifest: CacheManifest,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn AssetFetcher>,
    event_bus: EventBus,
    connectivity: Option<Connectivity>,
    background_sync: Option<Arc<dyn BackgroundSync>>,
}

impl AssetCache {
    pub fn new(
        manifest: CacheManifest,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn AssetFetcher>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            manifest,
            storage,
            fetcher,
            event_bus,
            connectivity: None,
            background_sync: None,
        }
    }

    /// Skip the network entirely while `connectivity` reports offline.
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    pub fn with_background_sync(mut self, sync: Arc<dyn BackgroundSync>) -> Self {
        self.background_sync = Some(sync);
        self
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    /// Precaches the static shell and the game assets, then activates.
    ///
    /// Each cache is filled all-or-nothing: one failed download leaves that
    /// cache untouched and aborts the install.
    pub async fn install(&self) -> Result<()> {
        self.precache(&self.manifest.static_cache, &self.manifest.static_assets)
            .await?;
        self.precache(&self.manifest.game_cache, &self.manifest.game_assets)
            .await?;
        self.activate()?;
        Ok(())
    }

    async fn precache(&self, cache: &str, paths: &[String]) -> Result<usize> {
        let mut fetched = Vec::with_capacity(paths.len());
        for path in paths {
            let url = self.manifest.resolve(path);
            let response = self.network(&AssetRequest::get(url.clone())).await?;
            if !response.is_success() {
                return Err(CacheError::InstallFailed {
                    cache: cache.to_owned(),
                    url,
                    status: response.status,
                });
            }
            fetched.push((url, response));
        }

        for (url, response) in &fetched {
            self.storage.put(cache, url, response)?;
        }

        tracing::info!(cache, entries = fetched.len(), "precached assets");
        self.event_bus.publish(CacheEvent::Installed {
            cache: cache.to_owned(),
            entries: fetched.len(),
        });
        Ok(fetched.len())
    }

    /// Deletes every cache that belongs to neither current cache name.
    pub fn activate(&self) -> Result<Vec<String>> {
        let mut deleted = Vec::new();
        for cache in self.storage.cache_names()? {
            if self.manifest.is_current(&cache) {
                continue;
            }
            if self.storage.delete_cache(&cache)? {
                tracing::info!(cache = %cache, "deleted outdated cache");
                deleted.push(cache);
            }
        }

        self.event_bus.publish(CacheEvent::Activated {
            deleted: deleted.clone(),
        });
        Ok(deleted)
    }

    /// Answers a request cache-first.
    ///
    /// Non-GET and cross-origin requests bypass the cache. Successful
    /// same-origin responses are stored in the static cache. When the
    /// network fails, page navigations fall back to the cached `/`.
    pub async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        if request.method != Method::GET || !self.manifest.is_same_origin(&request.url) {
            return self.network(request).await;
        }

        if let Some(cached) = self.storage.match_any(&request.url)? {
            tracing::trace!(url = %request.url, "cache hit");
            return Ok(cached);
        }

        match self.network(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    self.storage
                        .put(&self.manifest.static_cache, &request.url, &response)?;
                    self.event_bus.publish(CacheEvent::Stored {
                        cache: self.manifest.static_cache.clone(),
                        url: request.url.clone(),
                    });
                }
                Ok(response)
            }
            Err(error) => {
                tracing::debug!(url = %request.url, %error, "network unavailable");
                if request.destination == RequestDestination::Document {
                    let shell_url = self.manifest.resolve("/");
                    if let Some(shell) = self.storage.match_any(&shell_url)? {
                        self.event_bus.publish(CacheEvent::Fallback {
                            url: request.url.clone(),
                        });
                        return Ok(shell);
                    }
                }
                Err(CacheError::Offline {
                    url: request.url.clone(),
                })
            }
        }
    }

    /// Handles a background sync event.
    ///
    /// Only [`BACKGROUND_SYNC_TAG`] does anything; it flushes the offline
    /// action queue and returns the pass report.
    pub async fn sync(&self, tag: &str) -> crate::api::Result<Option<SyncReport>> {
        if tag != BACKGROUND_SYNC_TAG {
            tracing::debug!(tag, "ignoring unknown sync tag");
            return Ok(None);
        }
        match &self.background_sync {
            Some(sync) => sync.flush().await.map(Some),
            None => Ok(None),
        }
    }

    async fn network(&self, request: &AssetRequest) -> Result<AssetResponse> {
        let offline = self
            .connectivity
            .as_ref()
            .is_some_and(|connectivity| !connectivity.is_online());
        if offline {
            return Err(CacheError::Offline {
                url: request.url.clone(),
            });
        }
        self.fetcher.fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_origin_requires_a_path_boundary() {
        let manifest = CacheManifest::new("https://arise.example/");

        assert!(manifest.is_same_origin("https://arise.example/"));
        assert!(manifest.is_same_origin("https://arise.example"));
        assert!(manifest.is_same_origin("https://arise.example/src/main.tsx"));
        assert!(!manifest.is_same_origin("https://arise.example.evil/"));
        assert!(!manifest.is_same_origin("https://cdn.example/font.woff"));
    }

    #[test]
    fn default_manifest_lists_shell_and_games() {
        let manifest = CacheManifest::new("http://localhost");

        assert_eq!(manifest.static_assets.len(), 4);
        assert_eq!(manifest.game_assets.len(), 8);
        assert_eq!(manifest.resolve("/"), "http://localhost/");
        assert!(manifest.is_current(GAME_CACHE_NAME));
        assert!(!manifest.is_current("arise-learning-v1"));
    }
}
