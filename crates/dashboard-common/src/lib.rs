//! Genome Dashboard Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the genome dashboard.
//!
//! # Overview
//!
//! This crate provides common functionality used across all workspace members:
//!
//! - **Error Handling**: Shared error types and result aliases
//! - **Logging**: Centralized `tracing` subscriber setup
//! - **Store**: The hash-of-fields key-value contract the ingest pipeline
//!   writes into and the read API serves from, with in-memory and Redis
//!   implementations
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dashboard_common::store::{MemoryStore, Store};
//!
//! # async fn demo() -> dashboard_common::store::StoreResult<()> {
//! let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//! store.set("dashboard-44689", "genes", r#"{"data":[]}"#).await?;
//! assert!(store.exists("dashboard-44689", "genes").await);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use error::{DashboardError, Result, StoreError};
