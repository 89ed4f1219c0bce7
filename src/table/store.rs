//! Persisted key-value store for table layout preferences.
//!
//! Every implementation is best effort: a read that fails yields `None`
//! (callers fall back to defaults) and a write that fails is logged and
//! dropped. Nothing here returns an error to the table.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

pub trait LayoutStore: Send + Sync {
    /// Stored value for `key`, or `None` if absent or unreadable
    fn get(&self, key: &str) -> Option<Value>;

    /// Best-effort durable write
    fn set(&self, key: &str, value: Value);
}

/// Read `key` and decode it, falling back to `V::default()` on any failure
pub fn load_or_default<V>(store: &dyn LayoutStore, key: &str) -> V
where
    V: DeserializeOwned + Default,
{
    match store.get(key) {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(target: "store", "Ignoring malformed layout entry '{}': {}", key, e);
            V::default()
        }),
        None => V::default(),
    }
}

/// Encode `value` and write it under `key`
pub fn save<V: Serialize>(store: &dyn LayoutStore, key: &str, value: &V) {
    match serde_json::to_value(value) {
        Ok(encoded) => store.set(key, encoded),
        Err(e) => warn!(target: "store", "Could not encode layout entry '{}': {}", key, e),
    }
}

/// In-memory store, shared between table instances in one process
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
        }
    }
}

/// Store used when no durable location is available.
///
/// Reads always miss and writes vanish, so tables stay on the default
/// layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl LayoutStore for UnavailableStore {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set(&self, key: &str, _value: Value) {
        debug!(target: "store", "Layout store unavailable, dropping write to '{}'", key);
    }
}

/// JSON file backed store.
///
/// The whole file is one JSON object; it is read once on open and
/// rewritten on every `set`. Concurrent writers race last-write-wins.
#[derive(Debug)]
pub struct FileLayoutStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl FileLayoutStore {
    /// Open the store at `path`. A missing or corrupt file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::read_entries(&path);
        debug!(
            target: "store",
            "Opened layout store {:?} with {} entries",
            path,
            entries.len()
        );
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> BTreeMap<String, Value> {
        if !path.exists() {
            return BTreeMap::new();
        }

        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(target: "store", "Layout file {:?} is corrupt, starting empty: {}", path, e);
                BTreeMap::new()
            }),
            Err(e) => {
                warn!(target: "store", "Cannot read layout file {:?}: {}", path, e);
                BTreeMap::new()
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl LayoutStore for FileLayoutStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        let Ok(mut entries) = self.entries.lock() else {
            warn!(target: "store", "Layout store lock poisoned, dropping write to '{}'", key);
            return;
        };
        entries.insert(key.to_string(), value);

        if let Err(e) = self.write_entries(&entries) {
            warn!(target: "store", "Failed to persist layout to {:?}: {}", self.path, e);
        }
    }
}
