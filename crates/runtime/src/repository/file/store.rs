//! File-based KeyValueStore implementation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::repository::{KeyValueStore, RepositoryError, Result};

const ENTRY_EXTENSION: &str = "json";

/// File-based implementation of KeyValueStore.
///
/// Each key is stored as its own file `{hex(key)}.json` under `base_dir`.
/// Hex-encoding keeps arbitrary keys (game types come from the server) safe
/// as file names and lets [`KeyValueStore::keys`] recover them.
///
/// Writes go to a temp file first and are then atomically renamed, so a crash
/// mid-write leaves the previous value intact.
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", hex::encode(key), ENTRY_EXTENSION))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(key, bytes = value.len(), "stored entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => {
                tracing::debug!(key, "removed entry");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let bytes =
                hex::decode(stem).map_err(|_| RepositoryError::CorruptedKey(stem.to_owned()))?;
            let key =
                String::from_utf8(bytes).map_err(|_| RepositoryError::CorruptedKey(stem.to_owned()))?;
            keys.push(key);
        }

        keys.sort_unstable();
        Ok(keys)
    }
}
