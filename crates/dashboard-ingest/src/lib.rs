//! Genome Dashboard Ingest Library
//!
//! Turns a GFF3 genome annotation into per-feature-type JSON documents in the
//! dashboard's key-value store.
//!
//! # Modules
//!
//! - **gff3**: the concurrent streaming pipeline (line producer, broadcaster,
//!   feature consumers, pipeline join)
//! - **organism**: whole-genome ingestion with organism metadata
//! - **config**: ingestion settings from the environment
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dashboard_common::store::{RedisStore, StoreConfig};
//! use dashboard_ingest::{config::IngestConfig, organism::{ingest_genome, OrganismMetadata}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(RedisStore::connect(&StoreConfig::from_env()?).await?);
//!     let file = tokio::fs::File::open("dicty.gff3").await?;
//!     let metadata = OrganismMetadata::new("44689", "dicty.gff3");
//!     ingest_genome(file, store, &metadata, &IngestConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod gff3;
pub mod organism;
