//! Durable store contract and the in-memory implementation.
//!
//! The engine is store-agnostic: anything implementing [`MemoryStore`] can
//! mirror the in-memory index. [`InMemoryStore`] backs tests and ephemeral
//! sessions; [`crate::db::SqliteStore`] is the durable implementation.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;

use super::types::StoredMemory;

/// Minimal repository contract for persisted memories, keyed by record id.
pub trait MemoryStore: Send + Sync {
    /// Load every record. Called once at engine initialization.
    fn get_all(&self) -> Result<Vec<StoredMemory>>;

    /// Insert or replace a record.
    fn put(&self, record: &StoredMemory) -> Result<()>;

    /// Remove a record. Removing an absent id is not an error.
    fn delete(&self, id: &str) -> Result<()>;

    /// Remove every record.
    fn clear(&self) -> Result<()>;
}

/// A store that keeps records in a mutex-guarded map. Nothing survives the
/// process; useful for tests and for callers that opt out of persistence.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<HashMap<String, StoredMemory>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MemoryStore for InMemoryStore {
    fn get_all(&self) -> Result<Vec<StoredMemory>> {
        let records = self.records.lock().expect("store mutex poisoned");
        Ok(records.values().cloned().collect())
    }

    fn put(&self, record: &StoredMemory) -> Result<()> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        records.remove(id);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        records.clear();
        Ok(())
    }
}
