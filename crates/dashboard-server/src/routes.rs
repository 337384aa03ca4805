//! Genome routes
//!
//! Read-only access to the envelopes written by the ingest tool. Payloads are
//! returned exactly as stored.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dashboard_common::store::{record_key, Store};
use serde_json::json;
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::middleware;

/// Media type of the stored envelopes
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

/// Routes without middleware
pub fn genome_routes(store: Arc<dyn Store>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/dashboard/genomes/:taxon_id/:biotype", get(get_genome_field))
        .with_state(AppState { store })
}

/// Create the application router with all routes and middleware
pub fn create_router(store: Arc<dyn Store>, config: &Config) -> Router {
    genome_routes(store)
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// Fetch one stored field of an organism
///
/// GET /dashboard/genomes/:taxon_id/:biotype
async fn get_genome_field(
    State(state): State<AppState>,
    Path((taxon_id, biotype)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let key = record_key(&taxon_id);

    if !state.store.exists(&key, &biotype).await {
        tracing::debug!(key = %key, field = %biotype, "Requested field is absent");
        return Err(AppError::NotFound(format!("key {} does not exist", key)));
    }

    let payload = state
        .store
        .get(&key, &biotype)
        .await
        .map_err(|source| AppError::Retrieval {
            key: key.clone(),
            source,
        })?;

    Ok(([(header::CONTENT_TYPE, JSON_API_CONTENT_TYPE)], payload).into_response())
}
