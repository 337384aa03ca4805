//! Genome Dashboard Server Library
//!
//! HTTP API serving the per-organism genome documents produced by
//! `dashboard-ingest`.
//!
//! # Endpoints
//!
//! - `GET /dashboard/genomes/:taxon_id/:biotype`: the stored envelope for one
//!   feature type (`chromosomes`, `genes`, ...) or the `organism` metadata
//! - `GET /health`: liveness check
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dashboard_common::store::{RedisStore, StoreConfig};
//! use dashboard_server::{config::Config, routes::create_router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let store = Arc::new(RedisStore::connect(&StoreConfig::from_env()?).await?);
//!     let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//!     axum::serve(listener, create_router(store, &config)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod serve;

pub use error::AppError;
