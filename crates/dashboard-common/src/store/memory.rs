//! In-process store used by tests and dry runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult};

/// Hash-of-hashes kept in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    hashes: RwLock<HashMap<String, HashMap<String, String>>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field names currently stored under `key`, sorted
    pub async fn fields(&self, key: &str) -> Vec<String> {
        let hashes = self.hashes.read().await;
        let mut fields: Vec<String> = hashes
            .get(key)
            .map(|hash| hash.keys().cloned().collect())
            .unwrap_or_default();
        fields.sort();
        fields
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str, field: &str) -> StoreResult<String> {
        self.ensure_open()?;
        self.hashes
            .read()
            .await
            .get(key)
            .and_then(|hash| hash.get(field))
            .cloned()
            .ok_or_else(|| StoreError::not_found(key, field))
    }

    async fn set(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        self.ensure_open()?;
        self.hashes
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str, fields: &[&str]) -> StoreResult<()> {
        self.ensure_open()?;
        let mut hashes = self.hashes.write().await;
        if let Some(hash) = hashes.get_mut(key) {
            for field in fields {
                hash.remove(*field);
            }
            if hash.is_empty() {
                hashes.remove(key);
            }
        }
        Ok(())
    }

    async fn exists(&self, key: &str, field: &str) -> bool {
        if self.ensure_open().is_err() {
            return false;
        }
        self.hashes
            .read()
            .await
            .get(key)
            .is_some_and(|hash| hash.contains_key(field))
    }

    async fn close(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
