//! Key-value contract for durable device storage.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{RepositoryError, Result};

/// String-valued key-value store that survives restarts.
///
/// Every durable record (pending queue, snapshots, the full game state,
/// downloaded lessons) lives under a well-known key, see [`super::keys`].
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// List all stored keys in ascending order.
    fn keys(&self) -> Result<Vec<String>>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// JSON helpers layered over any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| RepositoryError::Json {
                    key: key.to_owned(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Serialize `value` and store it, returning the stored byte length.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<usize> {
        let raw = serde_json::to_string(value).map_err(|source| RepositoryError::Json {
            key: key.to_owned(),
            source,
        })?;
        self.set(key, &raw)?;
        Ok(raw.len())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
