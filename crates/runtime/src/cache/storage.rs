//! Named response caches.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::{CacheError, Result};
use super::types::AssetResponse;

/// Storage of named caches, each mapping a URL to a response.
pub trait CacheStorage: Send + Sync {
    /// Names of every existing cache, sorted.
    fn cache_names(&self) -> Result<Vec<String>>;

    fn get(&self, cache: &str, url: &str) -> Result<Option<AssetResponse>>;

    /// Stores `response`, creating the cache if needed.
    fn put(&self, cache: &str, url: &str, response: &AssetResponse) -> Result<()>;

    /// Deletes a whole cache. Returns whether it existed.
    fn delete_cache(&self, cache: &str) -> Result<bool>;

    fn entry_count(&self, cache: &str) -> Result<usize>;

    /// Looks `url` up in every cache, in name order.
    fn match_any(&self, url: &str) -> Result<Option<AssetResponse>> {
        for cache in self.cache_names()? {
            if let Some(response) = self.get(&cache, url)? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}

type Entries = BTreeMap<String, AssetResponse>;

/// In-memory [`CacheStorage`].
#[derive(Default)]
pub struct MemoryCacheStorage {
    caches: RwLock<BTreeMap<String, Entries>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn cache_names(&self) -> Result<Vec<String>> {
        let caches = self.caches.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(caches.keys().cloned().collect())
    }

    fn get(&self, cache: &str, url: &str) -> Result<Option<AssetResponse>> {
        let caches = self.caches.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(caches.get(cache).and_then(|entries| entries.get(url)).cloned())
    }

    fn put(&self, cache: &str, url: &str, response: &AssetResponse) -> Result<()> {
        let mut caches = self.caches.write().map_err(|_| CacheError::LockPoisoned)?;
        caches
            .entry(cache.to_owned())
            .or_default()
            .insert(url.to_owned(), response.clone());
        Ok(())
    }

    fn delete_cache(&self, cache: &str) -> Result<bool> {
        let mut caches = self.caches.write().map_err(|_| CacheError::LockPoisoned)?;
        Ok(caches.remove(cache).is_some())
    }

    fn entry_count(&self, cache: &str) -> Result<usize> {
        let caches = self.caches.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(caches.get(cache).map_or(0, BTreeMap::len))
    }
}

#[derive(Serialize, Deserialize)]
struct CachedEntry {
    url: String,
    response: AssetResponse,
}

/// File-backed [`CacheStorage`].
///
/// Layout: `{root}/{cache name}/{sha256(url)}.json`.
pub struct FileCacheStorage {
    root: PathBuf,
}

impl FileCacheStorage {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn cache_dir(&self, cache: &str) -> Result<PathBuf> {
        let valid = !cache.is_empty()
            && cache
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && cache != "."
            && cache != "..";
        if !valid {
            return Err(CacheError::InvalidCacheName(cache.to_owned()));
        }
        Ok(self.root.join(cache))
    }

    fn entry_path(&self, cache: &str, url: &str) -> Result<PathBuf> {
        let digest = hex::encode(Sha256::digest(url.as_bytes()));
        Ok(self.cache_dir(cache)?.join(format!("{digest}.json")))
    }
}

impl CacheStorage for FileCacheStorage {
    fn cache_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                names.push(name.to_owned());
            }
        }
        names.sort_unstable();
        Ok(names)
    }

    fn get(&self, cache: &str, url: &str) -> Result<Option<AssetResponse>> {
        let raw = match fs::read_to_string(self.entry_path(cache, url)?) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let entry: CachedEntry = serde_json::from_str(&raw)?;
        // Never serve a response stored for a different URL.
        Ok((entry.url == url).then_some(entry.response))
    }

    fn put(&self, cache: &str, url: &str, response: &AssetResponse) -> Result<()> {
        let path = self.entry_path(cache, url)?;
        fs::create_dir_all(self.cache_dir(cache)?)?;

        let raw = serde_json::to_string(&CachedEntry {
            url: url.to_owned(),
            response: response.clone(),
        })?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, raw)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn delete_cache(&self, cache: &str) -> Result<bool> {
        match fs::remove_dir_all(self.cache_dir(cache)?) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    fn entry_count(&self, cache: &str) -> Result<usize> {
        let dir = self.cache_dir(cache)?;
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(error.into()),
        };

        let mut count = 0;
        for entry in entries {
            if entry?.path().extension().and_then(|ext| ext.to_str()) == Some("json") {
                count += 1;
            }
        }
        Ok(count)
    }
}
