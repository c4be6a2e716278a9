//! Persistence worker for snapshots, the durable game state and sync fan-out.
//!
//! The store worker hands over every applied action through
//! [`Command::Record`] on this worker's bounded command channel, so a slow
//! sync pass applies backpressure instead of dropping actions. For each one
//! it:
//! 1. Appends a snapshot for each changed sub-state (`arise-game-<kind>`)
//! 2. Writes the full state under `arise-game-state`, restored at start-up
//! 3. Queues the action's offline kind, if any, with the sync worker
//!
//! Storage failures are logged and skipped; the in-memory game keeps running.

use std::sync::Arc;

use arise_core::{Action, ActionOutput, GameState, SnapshotKind, StateChanges};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use super::sync::Command as SyncCommand;
use crate::api::{Result, RuntimeError};
use crate::clock::Clock;
use crate::offline::{Connectivity, OfflineGameState, SnapshotStore, sub_state_json};
use crate::repository::{KeyValueStore, KeyValueStoreExt, keys};

/// Commands that can be sent to the persistence worker
pub enum Command {
    /// Persist an action the store worker just applied.
    Record(Box<AppliedAction>),
    /// Append a caller-provided snapshot.
    SaveSnapshot {
        kind: SnapshotKind,
        data: serde_json::Value,
        reply: oneshot::Sender<Result<OfflineGameState>>,
    },
    ClearSnapshots { reply: oneshot::Sender<Result<()>> },
    /// Replies once every command sent before it has been handled.
    Flush { reply: oneshot::Sender<()> },
    /// Stop after the commands already received.
    Shutdown,
}

/// An applied action with the complete state it produced.
pub struct AppliedAction {
    pub nonce: u64,
    pub action: Action,
    pub output: ActionOutput,
    pub changes: StateChanges,
    pub state: GameState,
}

/// Body of the offline action queued for a synced game action.
#[derive(Serialize)]
struct ActionPayload<'a> {
    nonce: u64,
    action: &'a Action,
    output: &'a ActionOutput,
}

pub struct PersistenceWorker {
    store: Arc<dyn KeyValueStore>,
    snapshots: SnapshotStore,
    connectivity: Connectivity,
    clock: Arc<dyn Clock>,
    command_rx: mpsc::Receiver<Command>,
    sync_tx: mpsc::Sender<SyncCommand>,
}

impl PersistenceWorker {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        snapshots: SnapshotStore,
        connectivity: Connectivity,
        clock: Arc<dyn Clock>,
        command_rx: mpsc::Receiver<Command>,
        sync_tx: mpsc::Sender<SyncCommand>,
    ) -> Self {
        Self {
            store,
            snapshots,
            connectivity,
            clock,
            command_rx,
            sync_tx,
        }
    }

    pub async fn run(mut self) {
        info!(cap = self.snapshots.cap(), "persistence worker started");

        while let Some(command) = self.command_rx.recv().await {
            if matches!(command, Command::Shutdown) {
                break;
            }
            self.handle_command(command).await;
        }

        info!("persistence worker stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Record(applied) => self.record(*applied).await,
            Command::SaveSnapshot { kind, data, reply } => {
                let result = self
                    .snapshots
                    .save(kind, data, self.clock.now(), !self.connectivity.is_online())
                    .map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::ClearSnapshots { reply } => {
                let _ = reply.send(self.snapshots.clear().map_err(RuntimeError::from));
            }
            Command::Flush { reply } => {
                let _ = reply.send(());
            }
            Command::Shutdown => {}
        }
    }

    async fn record(&mut self, applied: AppliedAction) {
        let AppliedAction {
            nonce,
            action,
            output,
            changes,
            state,
        } = applied;

        self.save_snapshots(&state, changes);

        if let Err(error) = self.store.set_json(keys::GAME_STATE, &state) {
            warn!(nonce, %error, "failed to persist game state");
        }

        if let Some(kind) = action.sync_kind() {
            let payload = ActionPayload {
                nonce,
                action: &action,
                output: &output,
            };
            match serde_json::to_value(&payload) {
                Ok(payload) => self.queue_sync(kind, payload).await,
                Err(error) => warn!(nonce, %error, "failed to encode sync payload"),
            }
        }
    }

    fn save_snapshots(&self, state: &GameState, changes: StateChanges) {
        let now = self.clock.now();
        let sync_required = !self.connectivity.is_online();

        for kind in changes.kinds() {
            let saved = sub_state_json(state, kind)
                .and_then(|data| self.snapshots.save(kind, data, now, sync_required));
            if let Err(error) = saved {
                warn!(%kind, %error, "failed to save snapshot");
            }
        }
    }

    /// Hands the action to the sync worker without waiting for it to be
    /// written; the sync worker logs its own failures.
    async fn queue_sync(&self, kind: arise_core::SyncKind, payload: serde_json::Value) {
        let command = SyncCommand::Queue {
            kind,
            payload,
            reply: None,
        };
        if self.sync_tx.send(command).await.is_err() {
            warn!(%kind, "sync worker gone, dropping offline action");
        }
    }
}
