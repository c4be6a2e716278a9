//! Per-kind snapshot history of the game sub-states.

use std::sync::Arc;

use arise_core::{GameState, SnapshotKind, Timestamp};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::repository::{KeyValueStore, KeyValueStoreExt, RepositoryError, Result, keys};

/// Schema version written into every snapshot.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Snapshots kept per kind before the oldest are evicted.
pub const DEFAULT_SNAPSHOT_CAP: usize = 50;

/// A stored copy of one sub-state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineGameState {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SnapshotKind,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
    pub sync_required: bool,
    pub version: u32,
}

/// Extracts the JSON of the sub-state a snapshot kind covers.
pub fn sub_state_json(state: &GameState, kind: SnapshotKind) -> Result<serde_json::Value> {
    let value = match kind {
        SnapshotKind::Village => serde_json::to_value(&state.village),
        SnapshotKind::Skill => serde_json::to_value(&state.skills),
        SnapshotKind::Farm => serde_json::to_value(&state.farm),
        SnapshotKind::MiniGame => serde_json::to_value(&state.mini_games),
        SnapshotKind::Festival => serde_json::to_value(&state.festivals),
        SnapshotKind::Community => serde_json::to_value(&state.community),
        SnapshotKind::Ar => serde_json::to_value(&state.ar),
        SnapshotKind::Rewards => serde_json::to_value(&state.rewards),
    };
    value.map_err(|source| RepositoryError::Json {
        key: keys::snapshots(kind),
        source,
    })
}

/// Capped, FIFO-evicting snapshot lists stored under `arise-game-<kind>`.
#[derive(Clone)]
pub struct SnapshotStore {
    store: Arc<dyn KeyValueStore>,
    cap: usize,
}

impl SnapshotStore {
    pub fn new(store: Arc<dyn KeyValueStore>, cap: usize) -> Self {
        Self {
            store,
            cap: cap.max(1),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Appends a snapshot, evicting the oldest beyond the cap.
    pub fn save(
        &self,
        kind: SnapshotKind,
        data: serde_json::Value,
        now: Timestamp,
        sync_required: bool,
    ) -> Result<OfflineGameState> {
        let key = keys::snapshots(kind);
        let mut states: Vec<OfflineGameState> = self.store.get_json(&key)?.unwrap_or_default();

        let snapshot = OfflineGameState {
            id: format!("{}_{}", kind, now.as_millis()),
            kind,
            data,
            timestamp: now,
            sync_required,
            version: SNAPSHOT_SCHEMA_VERSION,
        };
        states.push(snapshot.clone());

        if states.len() > self.cap {
            let overflow = states.len() - self.cap;
            states.drain(..overflow);
        }

        self.store.set_json(&key, &states)?;
        tracing::debug!(%kind, kept = states.len(), "saved snapshot");
        Ok(snapshot)
    }

    /// Snapshots of `kind`, oldest first.
    ///
    /// Entries written by a newer schema are skipped.
    pub fn load(&self, kind: SnapshotKind) -> Result<Vec<OfflineGameState>> {
        let states: Vec<OfflineGameState> = self
            .store
            .get_json(&keys::snapshots(kind))?
            .unwrap_or_default();

        Ok(states
            .into_iter()
            .filter(|state| {
                let readable = state.version <= SNAPSHOT_SCHEMA_VERSION;
                if !readable {
                    tracing::warn!(
                        id = %state.id,
                        version = state.version,
                        "skipping snapshot from a newer schema"
                    );
                }
                readable
            })
            .collect())
    }

    pub fn latest(&self, kind: SnapshotKind) -> Result<Option<OfflineGameState>> {
        Ok(self.load(kind)?.pop())
    }

    /// Whether any snapshot of `kind` was ever stored.
    pub fn is_available(&self, kind: SnapshotKind) -> Result<bool> {
        self.store.contains(&keys::snapshots(kind))
    }

    /// Number of snapshots across all kinds.
    pub fn total(&self) -> Result<usize> {
        SnapshotKind::iter().try_fold(0, |total, kind| Ok(total + self.load(kind)?.len()))
    }

    pub fn clear(&self) -> Result<()> {
        for kind in SnapshotKind::iter() {
            self.store.remove(&keys::snapshots(kind))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryKeyValueStore;

    fn snapshots(cap: usize) -> (Arc<dyn KeyValueStore>, SnapshotStore) {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        (Arc::clone(&store), SnapshotStore::new(store, cap))
    }

    #[test]
    fn keeps_only_the_most_recent_snapshots() {
        let (_, snapshots) = snapshots(DEFAULT_SNAPSHOT_CAP);

        for millis in 0..55 {
            snapshots
                .save(
                    SnapshotKind::Farm,
                    serde_json::json!({ "n": millis }),
                    Timestamp::from_millis(millis),
                    false,
                )
                .unwrap();
        }

        let stored = snapshots.load(SnapshotKind::Farm).unwrap();
        assert_eq!(stored.len(), 50);
        assert_eq!(stored[0].id, "farm_5");
        assert_eq!(stored[49].id, "farm_54");
        assert_eq!(snapshots.total().unwrap(), 50);
    }

    #[test]
    fn newer_schema_entries_are_skipped() {
        let (store, snapshots) = snapshots(10);
        let future = OfflineGameState {
            id: "ar_1".into(),
            kind: SnapshotKind::Ar,
            data: serde_json::Value::Null,
            timestamp: Timestamp::from_millis(1),
            sync_required: true,
            version: SNAPSHOT_SCHEMA_VERSION + 1,
        };
        store
            .set_json(&keys::snapshots(SnapshotKind::Ar), &vec![future])
            .unwrap();

        snapshots
            .save(
                SnapshotKind::Ar,
                serde_json::json!({}),
                Timestamp::from_millis(2),
                true,
            )
            .unwrap();

        let loaded = snapshots.load(SnapshotKind::Ar).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "ar_2");
        assert!(snapshots.is_available(SnapshotKind::Ar).unwrap());
        assert!(!snapshots.is_available(SnapshotKind::Village).unwrap());
    }

    #[test]
    fn sub_state_json_selects_the_matching_field() {
        let mut state = GameState::new();
        state.rewards.points = 120;

        let json = sub_state_json(&state, SnapshotKind::Rewards).unwrap();

        assert_eq!(json["points"], 120);
    }
}
