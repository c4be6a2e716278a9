//! Worker tasks that back the runtime orchestration.
//!
//! The store worker executes gameplay commands, the persistence worker turns
//! applied actions into durable records, and the sync worker delivers queued
//! actions to the server.

mod persistence;
mod store;
mod sync;

pub use persistence::{AppliedAction, Command as PersistenceCommand, PersistenceWorker};
pub use store::{Command as StoreCommand, StoreWorker};
pub use sync::{Command as SyncCommand, SyncSettings, SyncWorker};
