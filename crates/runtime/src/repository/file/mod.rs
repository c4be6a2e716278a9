//! File-backed repository implementations.

mod store;

pub use store::FileKeyValueStore;
