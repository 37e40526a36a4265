use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Persistence failure reported by [`crate::dashboard::DashboardStore::save`]
/// and [`crate::datasource::DataSourceRegistry::save`]. Writes are
/// best-effort; the in-memory state stays authoritative either way.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write state: {0}")]
    Write(#[from] io::Error),
}

/// Storage adapter for store state. Each store serializes its whole state
/// under a fixed key; the adapter decides where the payload lives.
pub trait StateStore: Send {
    /// Return the payload stored under `key`, or `None` when nothing
    /// usable is stored there.
    fn load(&self, key: &str) -> Option<String>;

    /// Replace the payload stored under `key`.
    fn store(&self, key: &str, payload: &str) -> io::Result<()>;
}

/// Stores each state payload as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct DirStateStore {
    dir: PathBuf,
}

impl DirStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for DirStateStore {
    fn load(&self, key: &str) -> Option<String> {
        let content = std::fs::read_to_string(self.path_for(key)).unwrap_or_default();
        if content.trim().is_empty() {
            None
        } else {
            Some(content)
        }
    }

    fn store(&self, key: &str, payload: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), payload)
    }
}

/// In-memory adapter. Clones share the same backing map, which lets tests
/// hand the same storage to several store instances.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: &str, payload: &str) -> io::Result<()> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), payload.to_string());
        }
        Ok(())
    }
}

/// Convenience for callers that keep state next to other app files.
pub fn dir_store(base: impl AsRef<Path>) -> DirStateStore {
    DirStateStore::new(base.as_ref())
}
