//! Store worker that owns the authoritative [`arise_core::GameState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], executes actions via
//! [`arise_core::GameEngine`] one at a time, and publishes a
//! [`GameStateEvent`] after every attempt. Applied actions are also handed
//! to the persistence worker before the caller gets its reply.

use std::sync::Arc;
use std::time::Duration;

use arise_content::SkillCatalog;
use arise_core::{Action, ExecuteError, GameConfig, GameEngine, GameEnv, GameState, Outcome};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::persistence::{AppliedAction, Command as PersistenceCommand};
use crate::clock::Clock;
use crate::events::{EventBus, GameStateEvent};

/// Commands that can be sent to the store worker
pub enum Command {
    /// Execute an action. Rejections come back as `Err` with the state untouched.
    Execute {
        action: Action,
        reply: oneshot::Sender<Result<Outcome, ExecuteError>>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    /// Stop after the commands already received.
    Shutdown,
}

/// Background task that serializes every game state mutation.
pub struct StoreWorker {
    state: GameState,
    config: GameConfig,
    skills: SkillCatalog,
    clock: Arc<dyn Clock>,
    growth_interval: Duration,
    command_rx: mpsc::Receiver<Command>,
    persistence_tx: mpsc::Sender<PersistenceCommand>,
    event_bus: EventBus,
}

impl StoreWorker {
    pub fn new(
        state: GameState,
        config: GameConfig,
        skills: SkillCatalog,
        clock: Arc<dyn Clock>,
        growth_interval: Duration,
        command_rx: mpsc::Receiver<Command>,
        persistence_tx: mpsc::Sender<PersistenceCommand>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            state,
            config,
            skills,
            clock,
            growth_interval,
            command_rx,
            persistence_tx,
            event_bus,
        }
    }

    /// Main worker loop.
    ///
    /// Crops are grown once on start-up and then every `growth_interval`.
    pub async fn run(mut self) {
        info!(nonce = self.state.nonce, "store worker started");
        self.grow_crops().await;

        let period = self.growth_interval.max(Duration::from_millis(1));
        let mut growth = tokio::time::interval_at(Instant::now() + period, period);
        growth.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },
                _ = growth.tick() => self.grow_crops().await,
            }
        }

        info!(nonce = self.state.nonce, "store worker stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Execute { action, reply } => {
                let result = self.execute(action).await;
                let _ = reply.send(result);
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.state.clone());
            }
            Command::Shutdown => {}
        }
    }

    async fn execute(&mut self, action: Action) -> Result<Outcome, ExecuteError> {
        let env = GameEnv::new(&self.config).with_skills(&self.skills);
        let result = GameEngine::new(&mut self.state).execute(env, &action);

        match &result {
            Ok(outcome) => {
                debug!(
                    action = action.name(),
                    nonce = outcome.nonce,
                    changes = ?outcome.changes,
                    "action applied"
                );
                self.event_bus.publish(GameStateEvent::ActionApplied {
                    nonce: outcome.nonce,
                    action: action.clone(),
                    output: outcome.output.clone(),
                    changes: outcome.changes,
                    state: Box::new(self.state.clone()),
                });

                let applied = AppliedAction {
                    nonce: outcome.nonce,
                    action,
                    output: outcome.output.clone(),
                    changes: outcome.changes,
                    state: self.state.clone(),
                };
                if self
                    .persistence_tx
                    .send(PersistenceCommand::Record(Box::new(applied)))
                    .await
                    .is_err()
                {
                    warn!(nonce = outcome.nonce, "persistence worker gone, action not persisted");
                }
            }
            Err(error) => {
                if error.is_rejection() {
                    debug!(%error, "action ignored");
                } else {
                    warn!(%error, "action rolled back");
                }
                self.event_bus.publish(GameStateEvent::ActionRejected {
                    action,
                    phase: error.phase_error().phase,
                    error: error.to_string(),
                });
            }
        }

        result
    }

    async fn grow_crops(&mut self) {
        if self.state.farm.crops.is_empty() {
            return;
        }
        let now = self.clock.now();
        // Growth ticks never fail pre-validation; a rollback is already logged.
        let _ = self.execute(Action::update_crop_growth(now)).await;
    }
}
