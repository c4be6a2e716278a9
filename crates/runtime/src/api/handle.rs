//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! every store mutation, the offline queue, snapshots, downloads and event
//! streams. Store helpers keep the result shapes players see: a rejected
//! mutation is logged and reported as "nothing happened" rather than an
//! error.

use std::collections::HashMap;
use std::sync::Arc;

use arise_content::Language;
use arise_core::{Action, ActionOutput, GameState, Outcome, SnapshotKind, SyncKind};
use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use super::errors::{Result, RuntimeError};
use crate::cache::BackgroundSync;
use crate::clock::Clock;
use crate::events::{Event, EventBus, Topic};
use crate::offline::{
    Connectivity, DeadLetter, LessonProgress, OfflineAction, OfflineGameState, OfflineLesson,
    OfflineLibrary, OfflineStats, SnapshotStore, SyncReport,
};
use crate::repository::{KeyValueStore, KeyValueStoreExt, keys};
use crate::workers::{PersistenceCommand, StoreCommand, SyncCommand};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    store_tx: mpsc::Sender<StoreCommand>,
    sync_tx: mpsc::Sender<SyncCommand>,
    persistence_tx: mpsc::Sender<PersistenceCommand>,
    event_bus: EventBus,
    connectivity: Connectivity,
    snapshots: SnapshotStore,
    library: Arc<OfflineLibrary>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

/// Sends a command carrying a oneshot reply and awaits the answer.
async fn request<C, T>(
    tx: &mpsc::Sender<C>,
    command: impl FnOnce(oneshot::Sender<T>) -> C,
) -> Result<T> {
    let (reply_tx, reply_rx) = oneshot::channel();

    tx.send(command(reply_tx))
        .await
        .map_err(|_| RuntimeError::CommandChannelClosed)?;

    reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
}

impl RuntimeHandle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        store_tx: mpsc::Sender<StoreCommand>,
        sync_tx: mpsc::Sender<SyncCommand>,
        persistence_tx: mpsc::Sender<PersistenceCommand>,
        event_bus: EventBus,
        connectivity: Connectivity,
        snapshots: SnapshotStore,
        library: Arc<OfflineLibrary>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store_tx,
            sync_tx,
            persistence_tx,
            event_bus,
            connectivity,
            snapshots,
            library,
            store,
            clock,
        }
    }

    // ------------------------------------------------------------------
    // Game state store
    // ------------------------------------------------------------------

    /// Execute an action against the store.
    ///
    /// Returns `None` when the action was rejected; the state is unchanged.
    pub async fn execute(&self, action: Action) -> Result<Option<Outcome>> {
        let name = action.name();
        let result = request(&self.store_tx, |reply| StoreCommand::Execute { action, reply }).await?;

        match result {
            Ok(outcome) => Ok(Some(outcome)),
            Err(error) => {
                debug!(action = name, %error, "mutation had no effect");
                Ok(None)
            }
        }
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        request(&self.store_tx, |reply| StoreCommand::QueryState { reply }).await
    }

    pub async fn unlock_building(&self, building_id: impl Into<String>) -> Result<()> {
        self.execute(Action::unlock_building(building_id)).await?;
        Ok(())
    }

    pub async fn complete_quest(&self, quest_id: impl Into<String>) -> Result<()> {
        self.execute(Action::complete_quest(quest_id)).await?;
        Ok(())
    }

    /// Returns whether the skill was unlocked (or levelled up).
    pub async fn unlock_skill(&self, skill_id: impl Into<String>) -> Result<bool> {
        Ok(self.execute(Action::unlock_skill(skill_id)).await?.is_some())
    }

    /// Plants a crop now and returns its id.
    pub async fn plant_crop(
        &self,
        subject_id: impl Into<String>,
        crop_type: impl Into<String>,
    ) -> Result<String> {
        let action = Action::plant_crop(subject_id, crop_type, self.clock.now());
        match self.execute(action).await?.map(|outcome| outcome.output) {
            Some(ActionOutput::CropPlanted { crop_id }) => Ok(crop_id),
            _ => Err(RuntimeError::UnexpectedOutput {
                action: "plant_crop",
            }),
        }
    }

    pub async fn water_crop(&self, crop_id: impl Into<String>) -> Result<()> {
        self.execute(Action::water_crop(crop_id)).await?;
        Ok(())
    }

    pub async fn decay_crop(&self, crop_id: impl Into<String>, amount: u8) -> Result<()> {
        self.execute(Action::decay_crop(crop_id, amount)).await?;
        Ok(())
    }

    /// Harvests a crop and returns the points it was worth; 0 when the crop
    /// does not exist.
    pub async fn harvest_crop(&self, crop_id: impl Into<String>) -> Result<u32> {
        match self.execute(Action::harvest_crop(crop_id)).await? {
            Some(Outcome {
                output: ActionOutput::Harvested { value },
                ..
            }) => Ok(value),
            _ => Ok(0),
        }
    }

    /// Runs a growth tick at the current time.
    pub async fn update_crop_growth(&self) -> Result<()> {
        self.execute(Action::update_crop_growth(self.clock.now()))
            .await?;
        Ok(())
    }

    pub async fn contribute_to_challenge(
        &self,
        challenge_id: impl Into<String>,
        contribution: u32,
    ) -> Result<()> {
        self.execute(Action::contribute_to_challenge(challenge_id, contribution))
            .await?;
        Ok(())
    }

    pub async fn record_game_score(&self, game_id: impl Into<String>, score: u32) -> Result<()> {
        self.execute(Action::record_game_score(game_id, score))
            .await?;
        Ok(())
    }

    pub async fn participate_in_festival(
        &self,
        event_id: impl Into<String>,
        progress: u32,
    ) -> Result<()> {
        self.execute(Action::participate_in_festival(event_id, progress))
            .await?;
        Ok(())
    }

    pub async fn unlock_ar_model(&self, model_id: impl Into<String>) -> Result<()> {
        self.execute(Action::unlock_ar_model(model_id)).await?;
        Ok(())
    }

    /// Redeems a reward for the stored user. Returns whether it went through.
    pub async fn redeem_reward(&self, reward_id: impl Into<String>) -> Result<bool> {
        let user_id = self.user_id()?;
        let action = Action::redeem_reward(reward_id, user_id, self.clock.now());
        Ok(self.execute(action).await?.is_some())
    }

    pub async fn update_daily_streak(&self) -> Result<()> {
        self.execute(Action::update_daily_streak(self.clock.now()))
            .await?;
        Ok(())
    }

    pub async fn check_level_up(&self) -> Result<()> {
        self.execute(Action::check_level_up()).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::GameState` - applied and rejected mutations
    /// - `Topic::Sync` - queue, connectivity and sync pass events
    /// - `Topic::Cache` - asset cache lifecycle
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use arise_runtime::{Event, GameStateEvent, Topic};
    ///
    /// let mut game_rx = handle.subscribe(Topic::GameState);
    /// while let Ok(Event::GameState(GameStateEvent::ActionApplied { state, .. })) =
    ///     game_rx.recv().await
    /// {
    ///     render(&state);
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    // ------------------------------------------------------------------
    // Connectivity and offline queue
    // ------------------------------------------------------------------

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Shared connectivity flag, for components such as the asset cache.
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity.clone()
    }

    /// Reports a connectivity change. Going online triggers a sync pass.
    pub fn set_online(&self, online: bool) {
        self.connectivity.set_online(online);
    }

    /// Queues a server notification; it is flushed immediately when online.
    pub async fn queue_action(
        &self,
        kind: SyncKind,
        payload: serde_json::Value,
    ) -> Result<OfflineAction> {
        request(&self.sync_tx, |reply| SyncCommand::Queue {
            kind,
            payload,
            reply: Some(reply),
        })
        .await?
    }

    /// Runs a sync pass now. Fails with [`RuntimeError::Offline`] when offline.
    pub async fn force_sync(&self) -> Result<SyncReport> {
        request(&self.sync_tx, |reply| SyncCommand::Sync { reply }).await?
    }

    pub async fn pending_actions(&self) -> Result<Vec<OfflineAction>> {
        request(&self.sync_tx, |reply| SyncCommand::Pending { reply }).await
    }

    /// Actions abandoned after exhausting their retries.
    pub async fn dead_letters(&self) -> Result<Vec<DeadLetter>> {
        request(&self.sync_tx, |reply| SyncCommand::DeadLetters { reply }).await?
    }

    pub async fn offline_stats(&self) -> Result<OfflineStats> {
        let mut stats = request(&self.sync_tx, |reply| SyncCommand::Stats { reply }).await??;
        stats.total_snapshots = self.snapshots.total()?;
        Ok(stats)
    }

    /// Removes the pending queue, dead letters and every snapshot.
    pub async fn clear_offline_data(&self) -> Result<()> {
        request(&self.sync_tx, |reply| SyncCommand::Clear { reply }).await??;
        request(&self.persistence_tx, |reply| PersistenceCommand::ClearSnapshots {
            reply,
        })
        .await?
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Appends a snapshot of `kind`, marked for sync when offline.
    pub async fn save_game_state(
        &self,
        kind: SnapshotKind,
        data: serde_json::Value,
    ) -> Result<OfflineGameState> {
        request(&self.persistence_tx, |reply| PersistenceCommand::SaveSnapshot {
            kind,
            data,
            reply,
        })
        .await?
    }

    /// Stored snapshots of `kind`, oldest first.
    pub fn load_game_state(&self, kind: SnapshotKind) -> Result<Vec<OfflineGameState>> {
        Ok(self.snapshots.load(kind)?)
    }

    pub fn is_game_available_offline(&self, kind: SnapshotKind) -> Result<bool> {
        Ok(self.snapshots.is_available(kind)?)
    }

    /// Waits until every action applied so far has been persisted and
    /// handed to the sync queue.
    pub async fn flush_persistence(&self) -> Result<()> {
        request(&self.persistence_tx, |reply| PersistenceCommand::Flush { reply }).await
    }

    // ------------------------------------------------------------------
    // Offline library
    // ------------------------------------------------------------------

    pub async fn download_lesson(&self, lesson_id: &str) -> Result<OfflineLesson> {
        if !self.is_online() {
            return Err(RuntimeError::Offline);
        }
        self.library.download_lesson(lesson_id, self.clock.now()).await
    }

    pub fn offline_lesson(&self, lesson_id: &str) -> Result<Option<OfflineLesson>> {
        self.library.offline_lesson(lesson_id)
    }

    pub fn downloaded_lessons(&self) -> Result<Vec<OfflineLesson>> {
        self.library.downloaded_lessons()
    }

    pub fn remove_lesson(&self, lesson_id: &str) -> Result<bool> {
        self.library.remove_lesson(lesson_id)
    }

    /// Records lesson progress as a `progress_update` offline action, so it
    /// shares the retry policy of game progress.
    pub async fn record_lesson_progress(
        &self,
        lesson_id: impl Into<String>,
        completed: bool,
        score: Option<u32>,
    ) -> Result<OfflineAction> {
        let progress = LessonProgress {
            lesson_id: lesson_id.into(),
            completed,
            score,
        };
        let payload = serde_json::to_value(&progress)?;
        self.queue_action(SyncKind::ProgressUpdate, payload).await
    }

    pub async fn download_game_assets(&self, game_type: &str) -> Result<serde_json::Value> {
        if !self.is_online() {
            return Err(RuntimeError::Offline);
        }
        self.library.download_game_assets(game_type).await
    }

    pub fn offline_game_assets(&self, game_type: &str) -> Result<Option<serde_json::Value>> {
        self.library.offline_game_assets(game_type)
    }

    // ------------------------------------------------------------------
    // Device preferences
    // ------------------------------------------------------------------

    pub fn user_id(&self) -> Result<String> {
        Ok(self
            .store
            .get(keys::USER_ID)?
            .unwrap_or_else(|| keys::ANONYMOUS_USER.to_owned()))
    }

    pub fn set_user_id(&self, user_id: &str) -> Result<()> {
        Ok(self.store.set(keys::USER_ID, user_id)?)
    }

    pub fn set_auth_token(&self, token: &str) -> Result<()> {
        Ok(self.store.set(keys::AUTH_TOKEN, token)?)
    }

    pub fn preferred_language(&self) -> Result<Option<Language>> {
        Ok(self.store.get_json(keys::LANGUAGE)?)
    }

    pub fn set_preferred_language(&self, language: Language) -> Result<()> {
        self.store.set_json(keys::LANGUAGE, &language)?;
        Ok(())
    }

    pub(crate) async fn shutdown_store(&self) -> Result<()> {
        self.store_tx
            .send(StoreCommand::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    pub(crate) async fn shutdown_persistence(&self) -> Result<()> {
        self.persistence_tx
            .send(PersistenceCommand::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    pub(crate) async fn shutdown_sync(&self) -> Result<()> {
        self.sync_tx
            .send(SyncCommand::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}

#[async_trait]
impl BackgroundSync for RuntimeHandle {
    async fn flush(&self) -> Result<SyncReport> {
        self.force_sync().await
    }
}
