//! In-memory snapshot store

use super::{SnapshotStore, StoreValue};
use crate::error::Result;
use crate::sync::RwLockExt;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory snapshot store (not persisted)
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, StoreValue>>,
}

impl MemoryStore {
    /// Create an empty memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read_recovered().len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.values.read_recovered().is_empty()
    }

    /// Copy of every stored entry, sorted by key
    pub fn snapshot(&self) -> BTreeMap<String, StoreValue> {
        self.values.read_recovered().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        Ok(self.values.read_recovered().get(key).cloned())
    }

    fn set(&self, key: &str, value: StoreValue) -> Result<()> {
        self.values
            .write_recovered()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.write_recovered().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.values.read_recovered().keys().cloned().collect())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
