//! Event types for different topics.

use arise_core::{Action, ActionOutput, GameState, StateChanges, SyncKind, TransitionPhase};
use serde::{Deserialize, Serialize};

use crate::offline::{DeadLetter, SyncReport};

/// Events related to game state changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// An action was applied; `state` is the complete state afterwards.
    ActionApplied {
        nonce: u64,
        action: Action,
        output: ActionOutput,
        changes: StateChanges,
        state: Box<GameState>,
    },

    /// An action was ignored because a transition phase rejected it.
    ActionRejected {
        action: Action,
        phase: TransitionPhase,
        error: String,
    },
}

/// Events emitted by the offline sync queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SyncEvent {
    Queued { action_id: String, kind: SyncKind },
    Online,
    Offline,
    Started { pending: usize },
    Acknowledged { action_id: String },
    RetryScheduled { action_id: String, retry_count: u32 },
    /// The action exhausted its retries and was moved to the dead letters.
    Abandoned(DeadLetter),
    Completed(SyncReport),
}

/// Events emitted by the asset cache layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CacheEvent {
    Installed { cache: String, entries: usize },
    Activated { deleted: Vec<String> },
    Stored { cache: String, url: String },
    /// A document request was answered with the cached app shell.
    Fallback { url: String },
}
