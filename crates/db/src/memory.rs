use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{DbError, Result};
use crate::kv::KeyValueStore;

/// Process-local store, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        let entries = self.entries.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn put(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| DbError::LockPoisoned)?;
        entries.insert(
            (namespace.to_string(), key.to_string()),
            value.to_string(),
        );
        Ok(())
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| DbError::LockPoisoned)?;
        entries.remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }
}
