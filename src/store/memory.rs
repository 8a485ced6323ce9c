use std::collections::HashMap;
use std::sync::RwLock;

use super::{KvStore, StoreError};

/// In-memory key-value store for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
