//! Generic key-value cache for persisted state.
//!
//! The update tracker stores its snapshot through this abstraction so the
//! storage medium stays swappable: production uses [`JsonFileCache`] under
//! the config directory, tests use [`MemoryCache`]. Values are exchanged as
//! [`serde_json::Value`]; each caller owns the shape of its own entries.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Error reading or writing a cache entry.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading or writing the backing store failed.
    #[error("failed to access cache entry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The entry could not be encoded or decoded as JSON.
    #[error("invalid cache entry: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value cache abstraction.
///
/// Writes replace the whole value under the key atomically; there is no
/// partial update. Implementations must be safe to share across tasks.
pub trait KeyValueCache: Send + Sync {
    /// Get the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), CacheError>;
}

/// File-backed cache with one JSON document per key.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// reader never observes a half-written entry. Keys are expected to be
/// plain identifiers; they are used as file names directly.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    directory: PathBuf,
}

impl JsonFileCache {
    /// Create a cache rooted at the given directory.
    ///
    /// The directory is created on first write, not here.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory holding the cache files.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

impl KeyValueCache for JsonFileCache {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        let path = self.entry_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e,
        })?;

        let value = serde_json::from_str(&content)?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), CacheError> {
        if !self.directory.is_dir() {
            fs::create_dir_all(&self.directory).map_err(|e| CacheError::Io {
                path: self.directory.clone(),
                source: e,
            })?;
        }

        let path = self.entry_path(key);
        let staging = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&value)?;

        fs::write(&staging, content).map_err(|e| CacheError::Io {
            path: staging.clone(),
            source: e,
        })?;

        fs::rename(&staging, &path).map_err(|e| CacheError::Io { path, source: e })
    }
}

/// In-memory cache for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryCache {
    /// Create an empty in-memory cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), CacheError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value);
        Ok(())
    }
}
