//! Redis-backed store
//!
//! Writes go to the master, reads to the slave. Each field is a Redis hash
//! field (`HSET`/`HGET`/`HDEL`/`HEXISTS`) under the organism key.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{Store, StoreConfig, StoreError, StoreResult};

/// Store backed by a Redis primary/replica pair
#[derive(Clone)]
pub struct RedisStore {
    primary: ConnectionManager,
    replica: ConnectionManager,
    closed: Arc<AtomicBool>,
}

impl RedisStore {
    /// Open managed connections to both servers.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        debug!(
            primary = %config.primary_url(),
            replica = %config.replica_url(),
            "Connecting to redis"
        );

        let primary = ConnectionManager::new(redis::Client::open(config.primary_url())?).await?;
        let replica = ConnectionManager::new(redis::Client::open(config.replica_url())?).await?;

        info!(
            "Redis store ready (primary {}:{}, replica {}:{})",
            config.primary_host, config.primary_port, config.replica_host, config.replica_port
        );

        Ok(Self {
            primary,
            replica,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Delete every key starting with `prefix` on the primary.
    ///
    /// Returns the number of keys removed.
    #[instrument(skip(self))]
    pub async fn clear_all(&self, prefix: &str) -> StoreResult<usize> {
        self.ensure_open()?;
        let mut conn = self.primary.clone();

        let keys: Vec<String> = {
            let mut iter = conn.scan_match::<_, String>(format!("{}*", prefix)).await?;
            let mut keys = Vec::new();
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
            keys
        };

        for key in &keys {
            conn.del::<_, ()>(key).await?;
        }

        info!(prefix, removed = keys.len(), "Cleared keys");
        Ok(keys.len())
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str, field: &str) -> StoreResult<String> {
        self.ensure_open()?;
        let mut conn = self.replica.clone();
        let value: Option<String> = conn.hget(key, field).await?;
        value.ok_or_else(|| StoreError::not_found(key, field))
    }

    async fn set(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        self.ensure_open()?;
        let mut conn = self.primary.clone();
        conn.hset::<_, _, _, ()>(key, field, value).await?;
        debug!(key, field, bytes = value.len(), "HSET");
        Ok(())
    }

    async fn delete(&self, key: &str, fields: &[&str]) -> StoreResult<()> {
        self.ensure_open()?;
        if fields.is_empty() {
            return Ok(());
        }
        let mut conn = self.primary.clone();
        conn.hdel::<_, _, ()>(key, fields.to_vec()).await?;
        Ok(())
    }

    async fn exists(&self, key: &str, field: &str) -> bool {
        if self.ensure_open().is_err() {
            return false;
        }
        let mut conn = self.replica.clone();
        match conn.hexists::<_, _, bool>(key, field).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key, field, error = %e, "HEXISTS failed on replica");
                false
            },
        }
    }

    async fn close(&self) -> StoreResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("Redis store closed");
        }
        Ok(())
    }
}
