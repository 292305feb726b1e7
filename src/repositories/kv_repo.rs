use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing::warn;

/// Key-value blob store backing the favorites collection. Writes are
/// synchronous best-effort; the caller decides what to do with a failure.
pub trait KeyValueRepo: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Store living in a single JSON object file on disk, so favorites survive
/// process restarts.
pub struct FileKvRepo {
    path: PathBuf,
}

impl FileKvRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> HashMap<String, String> {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Discarding unreadable key-value store at {} due to: {}",
                    self.path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }
}

impl KeyValueRepo for FileKvRepo {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.read_entries();
        entries.insert(key.to_string(), value.to_string());
        let contents = serde_json::to_string(&entries)
            .context("Error serializing key-value entries")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Error writing key-value store at {}", self.path.display()))
    }
}

pub struct InMemoryKvRepo {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKvRepo {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryKvRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueRepo for InMemoryKvRepo {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("kv entries lock").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .lock()
            .expect("kv entries lock")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
