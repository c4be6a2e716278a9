//! Offline action queue behaviour through the runtime handle.
mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use arise_core::{SnapshotKind, SyncKind};
use arise_runtime::{
    Event, InMemoryKeyValueStore, OfflineAction, RuntimeError, RuntimeHandle, SyncEvent, Topic,
    repository::keys,
};
use serde_json::json;

use common::{start, start_with, test_config};

/// Polls until the queue is empty, failing after a few seconds.
async fn wait_for_empty_queue(handle: &RuntimeHandle) {
    let drained = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if handle.pending_actions().await.unwrap().is_empty() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(drained.is_ok(), "offline queue was never flushed");
}

#[tokio::test]
async fn queued_offline_action_waits_until_online() {
    let harness = start(false).await;
    let handle = harness.runtime.handle();

    let action = handle
        .queue_action(SyncKind::ProgressUpdate, json!({ "lessonId": "math-1" }))
        .await
        .unwrap();

    assert_eq!(action.retry_count, 0);
    assert!(action.id.starts_with("action_"));
    assert_eq!(handle.pending_actions().await.unwrap().len(), 1);
    assert!(harness.api.requests().is_empty());
    assert!(matches!(
        handle.force_sync().await,
        Err(RuntimeError::Offline)
    ));

    // Coming online is enough; no explicit sync.
    handle.set_online(true);
    wait_for_empty_queue(&handle).await;

    let requests = harness.api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].action_id, action.id);
    assert_eq!(requests[0].kind, SyncKind::ProgressUpdate);

    let stats = handle.offline_stats().await.unwrap();
    assert_eq!(stats.pending_actions, 0);
    assert_eq!(stats.last_sync, Some(common::START));

    harness.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn action_is_abandoned_after_three_failures() {
    let harness = start(true).await;
    let handle = harness.runtime.handle();
    let mut sync_rx = handle.subscribe(Topic::Sync);
    harness.api.set_failing(true);

    // Queuing while online runs the first attempt immediately.
    let action = handle
        .queue_action(SyncKind::RewardClaim, json!({ "rewardId": "notebook" }))
        .await
        .unwrap();

    let second = handle.force_sync().await.unwrap();
    assert_eq!(second.retried, vec![action.id.clone()]);
    assert_eq!(handle.pending_actions().await.unwrap()[0].retry_count, 2);

    let third = handle.force_sync().await.unwrap();
    assert!(third.retried.is_empty());
    assert_eq!(third.abandoned.len(), 1);
    assert_eq!(third.abandoned[0].action.id, action.id);
    assert_eq!(third.remaining, 0);

    assert!(handle.pending_actions().await.unwrap().is_empty());
    let letters = handle.dead_letters().await.unwrap();
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].action.retry_count, 3);
    assert_eq!(harness.api.requests().len(), 3);

    let mut abandoned = None;
    while let Ok(event) = sync_rx.try_recv() {
        if let Event::Sync(SyncEvent::Abandoned(letter)) = event {
            abandoned = Some(letter);
        }
    }
    assert_eq!(abandoned.map(|letter| letter.action.id), Some(action.id));

    // A failed pass never counts as a sync.
    assert_eq!(handle.offline_stats().await.unwrap().last_sync, None);

    harness.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn pending_queue_is_written_through() {
    let harness = start(false).await;
    let handle = harness.runtime.handle();
    handle.set_user_id("student-7").unwrap();

    handle
        .queue_action(SyncKind::SkillUnlock, json!({ "skillId": "algebra" }))
        .await
        .unwrap();

    let raw = harness.store.get(keys::OFFLINE_PROGRESS).unwrap().unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["userId"], "student-7");
    assert_eq!(record["pendingActions"][0]["type"], "skill_unlock");
    assert_eq!(record["pendingActions"][0]["data"]["skillId"], "algebra");
    assert_eq!(record["pendingActions"][0]["retryCount"], 0);

    let stats = handle.offline_stats().await.unwrap();
    assert_eq!(stats.pending_actions, 1);
    assert_eq!(stats.storage_used, raw.len());

    handle.clear_offline_data().await.unwrap();
    assert!(handle.pending_actions().await.unwrap().is_empty());
    assert!(!harness.store.contains(keys::OFFLINE_PROGRESS).unwrap());

    harness.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn lesson_progress_shares_the_queue() {
    let harness = start(false).await;
    let handle = harness.runtime.handle();

    let queued = handle
        .record_lesson_progress("fractions", true, Some(90))
        .await
        .unwrap();

    assert_eq!(queued.kind, SyncKind::ProgressUpdate);
    assert_eq!(
        queued.payload,
        json!({ "lessonId": "fractions", "completed": true, "score": 90 })
    );
    assert_eq!(handle.pending_actions().await.unwrap(), vec![queued]);

    harness.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn interval_flushes_actions_left_by_a_failed_pass() {
    let config = arise_runtime::RuntimeConfig {
        sync_interval: Duration::from_millis(50),
        max_retries: 10,
        ..test_config(true)
    };
    let harness = start_with(config, Arc::new(InMemoryKeyValueStore::new())).await;
    let handle = harness.runtime.handle();
    harness.api.set_failing(true);

    let action = handle
        .queue_action(SyncKind::AchievementUnlock, json!({ "modelId": "solar-system" }))
        .await
        .unwrap();
    // Answered after the immediate attempt has failed.
    assert_eq!(handle.pending_actions().await.unwrap()[0].retry_count, 1);

    harness.api.set_failing(false);
    wait_for_empty_queue(&handle).await;

    let requests = harness.api.requests();
    assert!(requests.len() >= 2);
    assert!(requests.iter().all(|request| request.action_id == action.id));
    assert!(handle.offline_stats().await.unwrap().last_sync.is_some());

    harness.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn request_timeout_counts_as_a_failed_attempt() {
    let config = arise_runtime::RuntimeConfig {
        sync_timeout: Duration::from_millis(50),
        ..test_config(true)
    };
    let harness = start_with(config, Arc::new(InMemoryKeyValueStore::new())).await;
    let handle = harness.runtime.handle();
    harness.api.set_delay(Duration::from_secs(30));

    let action = handle
        .queue_action(SyncKind::SkillUnlock, json!({ "skillId": "geometry" }))
        .await
        .unwrap();
    let pending = handle.pending_actions().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].retry_count, 1);

    let report = handle.force_sync().await.unwrap();
    assert_eq!(report.retried, vec![action.id.clone()]);
    assert!(report.acknowledged.is_empty());
    assert_eq!(handle.pending_actions().await.unwrap()[0].retry_count, 2);
    assert_eq!(handle.offline_stats().await.unwrap().last_sync, None);

    harness.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn slow_server_does_not_lose_game_actions() {
    const SCORES: u64 = 40;
    let config = arise_runtime::RuntimeConfig {
        event_buffer_size: 4,
        command_buffer_size: 2,
        ..test_config(true)
    };
    let harness = start_with(config, Arc::new(InMemoryKeyValueStore::new())).await;
    let handle = harness.runtime.handle();
    harness.api.set_delay(Duration::from_millis(5));

    // Each score beats the last, so every action changes the mini-games.
    for round in 1..=SCORES {
        handle
            .record_game_score("quiz", u32::try_from(round).unwrap() * 10)
            .await
            .unwrap();
    }
    handle.flush_persistence().await.unwrap();

    let pending: Vec<OfflineAction> = handle.pending_actions().await.unwrap();
    let nonces: BTreeSet<u64> = harness
        .api
        .requests()
        .iter()
        .map(|request| request.data["nonce"].as_u64().unwrap())
        .chain(
            pending
                .iter()
                .map(|action| action.payload["nonce"].as_u64().unwrap()),
        )
        .collect();
    assert_eq!(nonces, (1..=SCORES).collect());

    assert_eq!(handle.query_state().await.unwrap().nonce, SCORES);
    assert_eq!(
        handle.load_game_state(SnapshotKind::MiniGame).unwrap().len(),
        usize::try_from(SCORES).unwrap()
    );

    harness.runtime.shutdown().await.unwrap();
}
