//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arise_core::Timestamp;
use arise_runtime::cache::{AssetFetcher, AssetRequest, AssetResponse, CacheError};
use arise_runtime::{
    InMemoryKeyValueStore, KeyValueStore, ManualClock, Runtime, RuntimeConfig, SyncApi,
    SyncRequest, TransportError,
};
use async_trait::async_trait;

/// 2024-01-01T00:00:00Z
pub const START: Timestamp = Timestamp::from_millis(1_704_067_200_000);

/// Sync API that records every request and can be switched to failing or
/// made slow.
#[derive(Default)]
pub struct ScriptedSyncApi {
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    requests: Mutex<Vec<SyncRequest>>,
    documents: Mutex<HashMap<String, serde_json::Value>>,
}

impl ScriptedSyncApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every push sleeps this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn serve(&self, path: &str, document: serde_json::Value) {
        self.documents
            .lock()
            .unwrap()
            .insert(path.to_owned(), document);
    }

    pub fn requests(&self) -> Vec<SyncRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SyncApi for ScriptedSyncApi {
    async fn push(&self, request: &SyncRequest) -> Result<(), TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Status {
                url: "mock://sync".into(),
                status: 503,
            });
        }
        Ok(())
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, TransportError> {
        self.documents
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                url: path.to_owned(),
                status: 404,
            })
    }
}

/// Asset fetcher serving a fixed table of same-origin responses.
#[derive(Default)]
pub struct StaticFetcher {
    responses: Mutex<HashMap<String, AssetResponse>>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn serve(&self, url: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_owned(), AssetResponse::basic(200, body));
    }

    pub fn serve_response(&self, url: &str, response: AssetResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_owned(), response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetFetcher for StaticFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| CacheError::Network {
                url: request.url.clone(),
                reason: "no route".into(),
            })
    }
}

pub struct Harness {
    pub runtime: Runtime,
    pub store: Arc<dyn KeyValueStore>,
    pub api: Arc<ScriptedSyncApi>,
    pub clock: Arc<ManualClock>,
}

pub fn test_config(online: bool) -> RuntimeConfig {
    RuntimeConfig {
        start_online: online,
        // Keep background timers out of the way of the assertions.
        sync_interval: Duration::from_secs(3600),
        growth_interval: Duration::from_secs(3600),
        ..RuntimeConfig::default()
    }
}

pub async fn start(online: bool) -> Harness {
    start_with(test_config(online), Arc::new(InMemoryKeyValueStore::new())).await
}

pub async fn start_with(config: RuntimeConfig, store: Arc<dyn KeyValueStore>) -> Harness {
    let api = ScriptedSyncApi::new();
    let clock = Arc::new(ManualClock::new(START));

    let runtime = Runtime::builder()
        .config(config)
        .store(Arc::clone(&store))
        .sync_api(api.clone())
        .clock(clock.clone())
        .asset_fetcher(StaticFetcher::new())
        .build()
        .await
        .expect("runtime should start");

    Harness {
        runtime,
        store,
        api,
        clock,
    }
}
