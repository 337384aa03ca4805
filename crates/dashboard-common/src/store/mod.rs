//! Key-value hash store
//!
//! Ingested envelopes live in a hash-of-fields store: one hash per organism
//! key (`dashboard-<taxon id>`), one field per feature type (`genes`,
//! `chromosomes`, ...) plus the `organism` metadata field. The ingest pipeline
//! only ever writes, the read API only ever reads, and each writer owns an
//! exclusive `(key, field)` pair.
//!
//! Reads may be served from a replica while writes go to the primary, so a
//! freshly written field can briefly be invisible to `get`/`exists`.

use async_trait::async_trait;

pub mod config;
pub mod memory;
pub mod redis;

pub use self::config::StoreConfig;
pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;
pub use crate::error::StoreError;

/// Prefix shared by every organism key
pub const KEY_PREFIX: &str = "dashboard";

/// Store key holding everything known about one organism
pub fn record_key(taxon_id: &str) -> String {
    format!("{}-{}", KEY_PREFIX, taxon_id)
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read/write contract of the hash store
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch a field, failing with [`StoreError::NotFound`] when it is absent
    async fn get(&self, key: &str, field: &str) -> StoreResult<String>;

    /// Write a field, replacing any previous value
    async fn set(&self, key: &str, field: &str, value: &str) -> StoreResult<()>;

    /// Remove fields from a key; absent fields are ignored
    async fn delete(&self, key: &str, fields: &[&str]) -> StoreResult<()>;

    /// Whether the field is present. Backend failures report `false`.
    async fn exists(&self, key: &str, field: &str) -> bool;

    /// Release the backend. Every later call fails with [`StoreError::Closed`].
    async fn close(&self) -> StoreResult<()>;
}
