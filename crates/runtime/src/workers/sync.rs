//! Sync worker that owns the offline action queue.
//!
//! Flushes the queue when the device comes online, on a fixed interval while
//! online and non-empty, right after an action is queued online, and on
//! explicit request. Passes run one at a time on this task, so two triggers
//! can never sync the same action concurrently.

use std::sync::Arc;
use std::time::Duration;

use arise_core::SyncKind;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError};
use crate::clock::Clock;
use crate::events::{EventBus, SyncEvent};
use crate::offline::{
    Connectivity, DEFAULT_MAX_RETRIES, DeadLetter, FailureOutcome, OfflineAction, OfflineStats,
    SyncApi, SyncQueue, SyncReport, SyncRequest, TransportError,
};

/// Commands that can be sent to the sync worker
pub enum Command {
    /// Append an action. Without a reply channel, failures are only logged.
    Queue {
        kind: SyncKind,
        payload: serde_json::Value,
        reply: Option<oneshot::Sender<Result<OfflineAction>>>,
    },
    /// Run a pass now; fails with [`RuntimeError::Offline`] when offline.
    Sync {
        reply: oneshot::Sender<Result<SyncReport>>,
    },
    Pending {
        reply: oneshot::Sender<Vec<OfflineAction>>,
    },
    DeadLetters {
        reply: oneshot::Sender<Result<Vec<DeadLetter>>>,
    },
    /// Queue statistics; `total_snapshots` is left at zero.
    Stats {
        reply: oneshot::Sender<Result<OfflineStats>>,
    },
    Clear {
        reply: oneshot::Sender<Result<()>>,
    },
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Period of the background flush while online.
    pub interval: Duration,
    /// Upper bound on a single request.
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

pub struct SyncWorker {
    queue: SyncQueue,
    api: Arc<dyn SyncApi>,
    clock: Arc<dyn Clock>,
    settings: SyncSettings,
    connectivity: Connectivity,
    online_rx: watch::Receiver<bool>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SyncWorker {
    pub fn new(
        queue: SyncQueue,
        api: Arc<dyn SyncApi>,
        clock: Arc<dyn Clock>,
        settings: SyncSettings,
        connectivity: Connectivity,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        let online_rx = connectivity.subscribe();
        Self {
            queue,
            api,
            clock,
            settings,
            connectivity,
            online_rx,
            command_rx,
            event_bus,
        }
    }

    pub async fn run(mut self) {
        info!(
            pending = self.queue.len(),
            online = self.connectivity.is_online(),
            "sync worker started"
        );
        self.run_pass().await;

        let period = self.settings.interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut watching = true;

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },
                changed = self.online_rx.changed(), if watching => match changed {
                    Ok(()) => {
                        let online = *self.online_rx.borrow_and_update();
                        self.on_connectivity(online).await;
                    }
                    Err(_) => watching = false,
                },
                _ = ticker.tick() => {
                    if self.connectivity.is_online() && !self.queue.is_empty() {
                        self.run_pass().await;
                    }
                }
            }
        }

        if let Err(error) = self.queue.persist() {
            warn!(%error, "failed to persist offline queue on shutdown");
        }
        info!(pending = self.queue.len(), "sync worker stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Queue {
                kind,
                payload,
                reply,
            } => {
                let result = self.queue_action(kind, payload);
                let queued = result.is_ok();
                match (reply, result) {
                    (Some(reply), result) => {
                        let _ = reply.send(result);
                    }
                    (None, Err(error)) => warn!(%kind, %error, "failed to queue offline action"),
                    (None, Ok(_)) => {}
                }
                if queued && self.connectivity.is_online() {
                    self.run_pass().await;
                }
            }
            Command::Sync { reply } => {
                let result = if self.connectivity.is_online() {
                    Ok(self.run_pass().await)
                } else {
                    Err(RuntimeError::Offline)
                };
                let _ = reply.send(result);
            }
            Command::Pending { reply } => {
                let _ = reply.send(self.queue.pending().to_vec());
            }
            Command::DeadLetters { reply } => {
                let _ = reply.send(self.queue.dead_letters().map_err(Into::into));
            }
            Command::Stats { reply } => {
                let _ = reply.send(self.stats());
            }
            Command::Clear { reply } => {
                let result = self.queue.clear().map_err(Into::into);
                if result.is_ok() {
                    info!("offline queue cleared");
                }
                let _ = reply.send(result);
            }
            Command::Shutdown => {}
        }
    }

    fn queue_action(&mut self, kind: SyncKind, payload: serde_json::Value) -> Result<OfflineAction> {
        let action = OfflineAction::new(kind, payload, self.clock.now(), self.settings.max_retries);
        self.queue.push(action.clone())?;

        debug!(action_id = %action.id, %kind, "queued offline action");
        self.event_bus.publish(SyncEvent::Queued {
            action_id: action.id.clone(),
            kind,
        });
        Ok(action)
    }

    fn stats(&self) -> Result<OfflineStats> {
        Ok(OfflineStats {
            total_snapshots: 0,
            pending_actions: self.queue.len(),
            last_sync: self.queue.last_sync(),
            storage_used: self.queue.storage_used()?,
        })
    }

    async fn on_connectivity(&mut self, online: bool) {
        if online {
            info!(pending = self.queue.len(), "device online");
            self.event_bus.publish(SyncEvent::Online);
            self.run_pass().await;
        } else {
            info!("device offline");
            self.event_bus.publish(SyncEvent::Offline);
        }
    }

    /// One pass over a snapshot of the queue, one request per action, in
    /// queue order. A no-op while offline or when nothing is pending.
    async fn run_pass(&mut self) -> SyncReport {
        if !self.connectivity.is_online() || self.queue.is_empty() {
            return SyncReport {
                remaining: self.queue.len(),
                ..SyncReport::default()
            };
        }

        let batch = self.queue.pending().to_vec();
        info!(pending = batch.len(), "sync pass started");
        self.event_bus.publish(SyncEvent::Started {
            pending: batch.len(),
        });

        let mut report = SyncReport {
            attempted: batch.len(),
            ..SyncReport::default()
        };

        for action in &batch {
            match self.push(action).await {
                Ok(()) => {
                    self.queue.acknowledge(&action.id);
                    debug!(action_id = %action.id, "action acknowledged");
                    self.event_bus.publish(SyncEvent::Acknowledged {
                        action_id: action.id.clone(),
                    });
                    report.acknowledged.push(action.id.clone());
                }
                Err(error) => {
                    warn!(action_id = %action.id, %error, "sync attempt failed");
                    self.record_failure(action, &error, &mut report);
                }
            }
        }

        if !report.acknowledged.is_empty() {
            self.queue.mark_synced(self.clock.now());
        }
        if let Err(error) = self.queue.persist() {
            warn!(%error, "failed to persist offline queue");
        }

        report.remaining = self.queue.len();
        info!(
            acknowledged = report.acknowledged.len(),
            retried = report.retried.len(),
            abandoned = report.abandoned.len(),
            remaining = report.remaining,
            "sync pass finished"
        );
        self.event_bus.publish(SyncEvent::Completed(report.clone()));
        report
    }

    async fn push(&self, action: &OfflineAction) -> std::result::Result<(), TransportError> {
        let request = SyncRequest::from(action);
        match tokio::time::timeout(self.settings.request_timeout, self.api.push(&request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.settings.request_timeout)),
        }
    }

    fn record_failure(
        &mut self,
        action: &OfflineAction,
        error: &TransportError,
        report: &mut SyncReport,
    ) {
        match self
            .queue
            .record_failure(&action.id, error.to_string(), self.clock.now())
        {
            Ok(Some(FailureOutcome::Retry(retry_count))) => {
                self.event_bus.publish(SyncEvent::RetryScheduled {
                    action_id: action.id.clone(),
                    retry_count,
                });
                report.retried.push(action.id.clone());
            }
            Ok(Some(FailureOutcome::Abandoned(letter))) => {
                warn!(
                    action_id = %action.id,
                    kind = %action.kind,
                    "action exceeded max retries, moved to dead letters"
                );
                self.event_bus.publish(SyncEvent::Abandoned(letter.clone()));
                report.abandoned.push(letter);
            }
            Ok(None) => {}
            Err(error) => {
                // Still pending; the next pass tries it again.
                warn!(action_id = %action.id, %error, "failed to record sync failure");
                report.retried.push(action.id.clone());
            }
        }
    }
}
