//! Persistence of the buffer contents
//!
//! A tiny key-value string store. The playground only uses one key,
//! [`SOURCE_CODE_KEY`], read once at startup and rewritten on every
//! debounced save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Key holding the last buffer contents
pub const SOURCE_CODE_KEY: &str = "sourceCode";

/// Document shown when nothing was persisted yet
pub const SAMPLE_SOURCE: &str = include_str!("../samples/caesar.rs");

/// Key-value string storage
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Initial buffer text: the persisted source, or the sample document
pub fn load_source(store: &impl StateStore) -> String {
    match store.get(SOURCE_CODE_KEY) {
        Some(source) if !source.is_empty() => {
            tracing::info!("Restored {} bytes of persisted source", source.len());
            source
        }
        _ => {
            tracing::debug!("No persisted source, using the sample document");
            SAMPLE_SOURCE.to_string()
        }
    }
}

/// Store backed by a JSON object on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store; an unreadable or corrupt one is
    /// logged and treated as empty too.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt state file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read state file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    /// Open the store in the config directory
    pub fn open_default() -> Result<Self> {
        let path = crate::config_paths::state_file().context("No config directory available")?;
        Ok(Self::open(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write state to {}", self.path.display()))?;
        tracing::debug!("Saved {} ({} bytes) to {}", key, value.len(), self.path.display());
        Ok(())
    }
}

/// In-memory store that counts writes
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a persisted source
    pub fn with_source(source: &str) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(SOURCE_CODE_KEY.to_string(), source.to_string());
        Self { entries, writes: 0 }
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_falls_back_to_sample() {
        assert_eq!(load_source(&MemoryStore::new()), SAMPLE_SOURCE);
        assert_eq!(load_source(&MemoryStore::with_source("")), SAMPLE_SOURCE);
    }

    #[test]
    fn test_persisted_source_wins() {
        assert_eq!(load_source(&MemoryStore::with_source("fn x() {}")), "fn x() {}");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("state.json");

        let mut store = FileStore::open(&path);
        assert_eq!(store.get(SOURCE_CODE_KEY), None);
        store.set(SOURCE_CODE_KEY, "let a = 1;").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(SOURCE_CODE_KEY).as_deref(), Some("let a = 1;"));
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get(SOURCE_CODE_KEY), None);
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.writes(), 2);
        assert_eq!(store.get("a").as_deref(), Some("2"));
    }
}
