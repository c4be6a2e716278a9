//! Durable pending-action queue.

use std::sync::Arc;

use arise_core::Timestamp;
use serde::{Deserialize, Serialize};

use super::action::{DeadLetter, OfflineAction};
use crate::repository::{KeyValueStore, KeyValueStoreExt, Result, keys};

/// Most recent abandoned actions kept under [`keys::DEAD_LETTERS`].
pub const MAX_DEAD_LETTERS: usize = 100;

/// Record stored under [`keys::OFFLINE_PROGRESS`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueRecord {
    user_id: String,
    #[serde(default)]
    last_sync: Option<Timestamp>,
    #[serde(default)]
    pending_actions: Vec<OfflineAction>,
}

/// What happened to an action whose request failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureOutcome {
    /// Kept in the queue with the new retry count.
    Retry(u32),
    Abandoned(DeadLetter),
}

/// Ordered queue of actions waiting to reach the server.
///
/// Every mutation is written through to the store so pending actions survive
/// restarts. The queue itself never talks to the network; the sync worker
/// drives passes over it.
pub struct SyncQueue {
    store: Arc<dyn KeyValueStore>,
    pending: Vec<OfflineAction>,
    last_sync: Option<Timestamp>,
}

impl SyncQueue {
    /// Restores the queue from `store`, starting empty when nothing is stored.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let record: QueueRecord = store.get_json(keys::OFFLINE_PROGRESS)?.unwrap_or_default();

        if !record.pending_actions.is_empty() {
            tracing::info!(
                pending = record.pending_actions.len(),
                "restored offline queue"
            );
        }

        Ok(Self {
            store,
            pending: record.pending_actions,
            last_sync: record.last_sync,
        })
    }

    pub fn pending(&self) -> &[OfflineAction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn last_sync(&self) -> Option<Timestamp> {
        self.last_sync
    }

    pub fn push(&mut self, action: OfflineAction) -> Result<()> {
        self.pending.push(action);
        self.persist().map(|_| ())
    }

    /// Drops an action the server accepted. Returns whether it was queued.
    pub fn acknowledge(&mut self, action_id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|action| action.id != action_id);
        self.pending.len() != before
    }

    /// Counts a failed attempt, moving the action to the dead letters once
    /// it has used up its retries.
    ///
    /// An exhausted action leaves the queue only after its dead letter is
    /// stored; if that write fails it stays pending and is retried.
    pub fn record_failure(
        &mut self,
        action_id: &str,
        reason: impl Into<String>,
        now: Timestamp,
    ) -> Result<Option<FailureOutcome>> {
        let Some(index) = self.pending.iter().position(|action| action.id == action_id) else {
            return Ok(None);
        };

        self.pending[index].retry_count += 1;
        if !self.pending[index].is_exhausted() {
            return Ok(Some(FailureOutcome::Retry(self.pending[index].retry_count)));
        }

        let letter = DeadLetter {
            action: self.pending[index].clone(),
            reason: reason.into(),
            abandoned_at: now,
        };
        let mut letters = self.dead_letters()?;
        letters.push(letter.clone());
        if letters.len() > MAX_DEAD_LETTERS {
            let excess = letters.len() - MAX_DEAD_LETTERS;
            letters.drain(..excess);
        }
        self.store.set_json(keys::DEAD_LETTERS, &letters)?;
        self.pending.remove(index);

        Ok(Some(FailureOutcome::Abandoned(letter)))
    }

    pub fn mark_synced(&mut self, now: Timestamp) {
        self.last_sync = Some(now);
    }

    /// Writes the queue record, returning its size in bytes.
    pub fn persist(&self) -> Result<usize> {
        let user_id = self
            .store
            .get(keys::USER_ID)?
            .unwrap_or_else(|| keys::ANONYMOUS_USER.to_owned());

        let record = QueueRecord {
            user_id,
            last_sync: self.last_sync,
            pending_actions: self.pending.clone(),
        };
        self.store.set_json(keys::OFFLINE_PROGRESS, &record)
    }

    pub fn dead_letters(&self) -> Result<Vec<DeadLetter>> {
        Ok(self.store.get_json(keys::DEAD_LETTERS)?.unwrap_or_default())
    }

    /// Size of the stored queue record in bytes.
    pub fn storage_used(&self) -> Result<usize> {
        Ok(self
            .store
            .get(keys::OFFLINE_PROGRESS)?
            .map_or(0, |raw| raw.len()))
    }

    /// Forgets pending actions, dead letters and the last sync time.
    pub fn clear(&mut self) -> Result<()> {
        self.pending.clear();
        self.last_sync = None;
        self.store.remove(keys::OFFLINE_PROGRESS)?;
        self.store.remove(keys::DEAD_LETTERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryKeyValueStore;
    use arise_core::SyncKind;

    fn queued(store: &Arc<dyn KeyValueStore>, count: usize) -> SyncQueue {
        let mut queue = SyncQueue::load(Arc::clone(store)).unwrap();
        for index in 0..count {
            let mut action = OfflineAction::new(
                SyncKind::ProgressUpdate,
                serde_json::json!({ "index": index }),
                Timestamp::from_millis(index as u64),
                3,
            );
            action.id = format!("action_{index}");
            queue.push(action).unwrap();
        }
        queue
    }

    #[test]
    fn pending_actions_survive_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        queued(&store, 2);

        let reloaded = SyncQueue::load(Arc::clone(&store)).unwrap();

        let ids: Vec<_> = reloaded.pending().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["action_0", "action_1"]);
        assert!(reloaded.storage_used().unwrap() > 0);
    }

    #[test]
    fn third_failure_moves_action_to_dead_letters() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let mut queue = queued(&store, 1);
        let now = Timestamp::from_millis(99);

        assert_eq!(
            queue.record_failure("action_0", "503", now).unwrap(),
            Some(FailureOutcome::Retry(1))
        );
        assert_eq!(
            queue.record_failure("action_0", "503", now).unwrap(),
            Some(FailureOutcome::Retry(2))
        );
        let outcome = queue.record_failure("action_0", "503", now).unwrap();

        assert!(matches!(outcome, Some(FailureOutcome::Abandoned(ref letter)) if letter.action.retry_count == 3));
        assert!(queue.is_empty());
        assert_eq!(queue.dead_letters().unwrap().len(), 1);
        assert_eq!(queue.record_failure("action_0", "503", now).unwrap(), None);
    }

    #[test]
    fn unwritable_dead_letters_keep_the_action_pending() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        store.set(keys::DEAD_LETTERS, "not json").unwrap();
        let mut queue = queued(&store, 1);
        let now = Timestamp::from_millis(99);

        queue.record_failure("action_0", "503", now).unwrap();
        queue.record_failure("action_0", "503", now).unwrap();
        assert!(queue.record_failure("action_0", "503", now).is_err());

        assert_eq!(queue.len(), 1);
        queue.persist().unwrap();
        let reloaded = SyncQueue::load(Arc::clone(&store)).unwrap();
        assert_eq!(reloaded.pending()[0].id, "action_0");
        assert_eq!(reloaded.pending()[0].retry_count, 3);
    }

    #[test]
    fn dead_letters_keep_only_the_most_recent() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let mut queue = queued(&store, MAX_DEAD_LETTERS + 5);
        for index in 0..MAX_DEAD_LETTERS + 5 {
            let id = format!("action_{index}");
            for _ in 0..3 {
                queue.record_failure(&id, "503", Timestamp::ZERO).unwrap();
            }
        }

        let letters = queue.dead_letters().unwrap();
        assert_eq!(letters.len(), MAX_DEAD_LETTERS);
        assert_eq!(letters[0].action.id, "action_5");
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_removes_queue_and_dead_letters() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let mut queue = queued(&store, 1);
        for _ in 0..3 {
            queue
                .record_failure("action_0", "timeout", Timestamp::ZERO)
                .unwrap();
        }

        queue.clear().unwrap();

        assert!(store.get(keys::OFFLINE_PROGRESS).unwrap().is_none());
        assert!(queue.dead_letters().unwrap().is_empty());
        assert_eq!(queue.storage_used().unwrap(), 0);
    }
}
