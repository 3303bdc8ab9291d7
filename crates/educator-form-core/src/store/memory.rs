//! In-memory store.

use std::collections::HashMap;

use super::{SnapshotStore, StoreError, StoreResult};

/// `HashMap`-backed store. Can be switched offline to simulate a store that
/// refuses every operation.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    offline: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry.
    pub fn with_entry(key: &str, blob: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), blob.to_string());
        store
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline {
            return Err(StoreError::Unavailable("store is offline".into()));
        }
        Ok(())
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_online()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, blob: &str) -> StoreResult<()> {
        self.check_online()?;
        self.entries.insert(key.to_string(), blob.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.check_online()?;
        self.entries.remove(key);
        Ok(())
    }
}
