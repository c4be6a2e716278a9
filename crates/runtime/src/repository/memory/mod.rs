//! In-memory repository implementations for tests and ephemeral runs.

mod store;

pub use store::InMemoryKeyValueStore;
