//! Asset cache lifecycle and offline library downloads.
mod common;

use std::sync::Arc;

use arise_runtime::cache::{
    AssetCache, AssetRequest, CacheError, CacheManifest, CacheStorage, MemoryCacheStorage,
    ResponseKind,
};
use arise_runtime::{BACKGROUND_SYNC_TAG, CacheEvent, Event, EventBus, RuntimeError, Topic};
use arise_core::SyncKind;
use serde_json::json;

use common::{StaticFetcher, start};

const ORIGIN: &str = "https://arise.test";

fn manifest() -> CacheManifest {
    CacheManifest {
        static_assets: vec!["/".into(), "/manifest.json".into()],
        game_assets: vec!["/src/lib/game-engine.ts".into()],
        ..CacheManifest::new(ORIGIN)
    }
}

fn serving_fetcher() -> Arc<StaticFetcher> {
    let fetcher = StaticFetcher::new();
    fetcher.serve("https://arise.test/", "<html>shell</html>");
    fetcher.serve("https://arise.test/manifest.json", "{}");
    fetcher.serve("https://arise.test/src/lib/game-engine.ts", "export {}");
    fetcher
}

#[tokio::test]
async fn install_precaches_and_drops_outdated_caches() {
    let storage = Arc::new(MemoryCacheStorage::new());
    let stale = arise_runtime::AssetResponse::basic(200, "old");
    storage.put("arise-games-v0", "https://arise.test/old.js", &stale).unwrap();

    let bus = EventBus::new();
    let mut cache_rx = bus.subscribe(Topic::Cache);
    let cache = AssetCache::new(manifest(), storage.clone(), serving_fetcher(), bus);

    cache.install().await.unwrap();

    let mut names = storage.cache_names().unwrap();
    names.sort();
    assert_eq!(names, vec!["arise-games-v1", "arise-learning-v2"]);
    assert_eq!(storage.entry_count("arise-learning-v2").unwrap(), 2);
    assert_eq!(storage.entry_count("arise-games-v1").unwrap(), 1);

    let mut deleted = None;
    while let Ok(event) = cache_rx.try_recv() {
        if let Event::Cache(CacheEvent::Activated { deleted: names }) = event {
            deleted = Some(names);
        }
    }
    assert_eq!(deleted, Some(vec!["arise-games-v0".to_owned()]));
}

#[tokio::test]
async fn failed_download_leaves_the_cache_empty() {
    let storage = Arc::new(MemoryCacheStorage::new());
    let fetcher = StaticFetcher::new();
    fetcher.serve("https://arise.test/", "<html>shell</html>");
    let cache = AssetCache::new(manifest(), storage.clone(), fetcher, EventBus::new());

    let error = cache.install().await.unwrap_err();

    assert!(matches!(error, CacheError::Network { .. }));
    assert!(storage.cache_names().unwrap().is_empty());
}

#[tokio::test]
async fn fetch_is_cache_first_with_shell_fallback() {
    let harness = start(true).await;
    let handle = harness.runtime.handle();
    let storage = Arc::new(MemoryCacheStorage::new());
    let fetcher = serving_fetcher();
    fetcher.serve("https://arise.test/lessons/1", "<html>lesson</html>");
    let cache = AssetCache::new(manifest(), storage.clone(), fetcher.clone(), EventBus::new())
        .with_connectivity(handle.connectivity());

    cache.install().await.unwrap();
    let installed_calls = fetcher.calls();

    let shell = cache
        .fetch(&AssetRequest::get("https://arise.test/"))
        .await
        .unwrap();
    assert_eq!(shell.body, b"<html>shell</html>");
    assert_eq!(fetcher.calls(), installed_calls);

    // A miss goes to the network once and is then served from the cache.
    cache
        .fetch(&AssetRequest::document("https://arise.test/lessons/1"))
        .await
        .unwrap();
    assert_eq!(fetcher.calls(), installed_calls + 1);
    assert!(storage
        .get("arise-learning-v2", "https://arise.test/lessons/1")
        .unwrap()
        .is_some());

    handle.set_online(false);
    let page = cache
        .fetch(&AssetRequest::document("https://arise.test/lessons/2"))
        .await
        .unwrap();
    assert_eq!(page.body, b"<html>shell</html>");

    let script = cache
        .fetch(&AssetRequest::get("https://arise.test/src/unknown.js"))
        .await;
    assert!(matches!(script, Err(CacheError::Offline { .. })));

    harness.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn cross_origin_and_opaque_responses_are_not_stored() {
    let storage = Arc::new(MemoryCacheStorage::new());
    let fetcher = StaticFetcher::new();
    let mut font = arise_runtime::AssetResponse::basic(200, "font");
    font.kind = ResponseKind::Cors;
    fetcher.serve_response("https://fonts.test/inter.woff2", font);
    let mut opaque = arise_runtime::AssetResponse::basic(200, "img");
    opaque.kind = ResponseKind::Opaque;
    fetcher.serve_response("https://arise.test/logo.png", opaque);
    let cache = AssetCache::new(manifest(), storage.clone(), fetcher.clone(), EventBus::new());

    cache
        .fetch(&AssetRequest::get("https://fonts.test/inter.woff2"))
        .await
        .unwrap();
    cache
        .fetch(&AssetRequest::get("https://arise.test/logo.png"))
        .await
        .unwrap();

    assert!(storage.cache_names().unwrap().is_empty());
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn background_sync_tag_flushes_the_queue() {
    let harness = start(false).await;
    let handle = harness.runtime.handle();
    let cache = harness.runtime.asset_cache();

    handle
        .queue_action(SyncKind::AchievementUnlock, json!({ "badge": "first-harvest" }))
        .await
        .unwrap();

    assert!(cache.sync("periodic-refresh").await.unwrap().is_none());
    assert!(matches!(
        cache.sync(BACKGROUND_SYNC_TAG).await,
        Err(RuntimeError::Offline)
    ));

    handle.set_online(true);
    let report = cache.sync(BACKGROUND_SYNC_TAG).await.unwrap().unwrap();
    assert_eq!(report.remaining, 0);
    assert_eq!(harness.api.requests().len(), 1);

    harness.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn lessons_are_downloaded_for_offline_reading() {
    let harness = start(true).await;
    let handle = harness.runtime.handle();
    harness.api.serve(
        "/api/lessons/fractions",
        json!({ "title": "Fractions", "content": { "sections": 3 } }),
    );
    harness
        .api
        .serve("/api/games/quiz/assets", json!({ "questions": 20 }));

    let lesson = handle.download_lesson("fractions").await.unwrap();
    assert_eq!(lesson.id, "fractions");
    assert_eq!(lesson.title, "Fractions");
    assert_eq!(lesson.downloaded_at, common::START);

    let assets = handle.download_game_assets("quiz").await.unwrap();
    assert_eq!(assets["questions"], 20);

    handle.set_online(false);
    assert!(matches!(
        handle.download_lesson("decimals").await,
        Err(RuntimeError::Offline)
    ));
    assert_eq!(handle.offline_lesson("fractions").unwrap(), Some(lesson));
    assert_eq!(handle.downloaded_lessons().unwrap().len(), 1);
    assert_eq!(
        handle.offline_game_assets("quiz").unwrap(),
        Some(json!({ "questions": 20 }))
    );

    assert!(handle.remove_lesson("fractions").unwrap());
    assert!(!handle.remove_lesson("fractions").unwrap());
    assert!(handle.downloaded_lessons().unwrap().is_empty());

    harness.runtime.shutdown().await.unwrap();
}
