//! In-memory key-value store

use std::{collections::HashMap, sync::Mutex};

use super::KvStore;

/// Key-value store held entirely in memory
///
/// Backs ephemeral runs and serves as the test double for the state layer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self.entries.lock()
            .map_err(|e| format!("Failed to lock store entries: {}", e))?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock()
            .map_err(|e| format!("Failed to lock store entries: {}", e))?;

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
