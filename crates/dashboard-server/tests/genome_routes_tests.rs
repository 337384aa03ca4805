//! Integration tests for the genome routes
//!
//! These tests verify the read API against an in-memory store.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use dashboard_common::store::{MemoryStore, Store, StoreError, StoreResult};
use dashboard_server::config::Config;
use dashboard_server::routes::{create_router, genome_routes, JSON_API_CONTENT_TYPE};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const GENES: &str = r#"{"data":[{"type":"genes","id":"DDB_G0267178","attributes":{"seqid":"DDB0232428","block_id":"DDB0232428","source":"dictyBase","start":8430,"end":9560,"strand":"-"}}]}"#;

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.set("dashboard-44689", "genes", GENES).await.unwrap();
    store
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_stored_field_is_returned_verbatim() {
    let app = genome_routes(seeded_store().await);

    let (status, content_type, body) = get(app, "/dashboard/genomes/44689/genes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(JSON_API_CONTENT_TYPE));
    assert_eq!(body, GENES);
}

#[tokio::test]
async fn test_absent_field_is_not_found() {
    let app = genome_routes(seeded_store().await);

    let (status, _, body) = get(app, "/dashboard/genomes/44689/chromosomes").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"]["message"], "key dashboard-44689 does not exist");
    assert_eq!(error["error"]["status"], 404);
}

#[tokio::test]
async fn test_unknown_organism_is_not_found() {
    let app = genome_routes(seeded_store().await);

    let (status, _, _) = get(app, "/dashboard/genomes/9606/genes").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_closed_store_reports_absent_field() {
    let store = seeded_store().await;
    store.close().await.unwrap();
    let app = genome_routes(store);

    // exists() swallows backend failures, so a closed store reads as empty
    let (status, _, _) = get(app, "/dashboard/genomes/44689/genes").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Reports every field as present but cannot read any of them
struct UnreadableStore;

#[async_trait]
impl Store for UnreadableStore {
    async fn get(&self, _key: &str, _field: &str) -> StoreResult<String> {
        Err(StoreError::Closed)
    }

    async fn set(&self, _key: &str, _field: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Closed)
    }

    async fn delete(&self, _key: &str, _fields: &[&str]) -> StoreResult<()> {
        Err(StoreError::Closed)
    }

    async fn exists(&self, _key: &str, _field: &str) -> bool {
        true
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_read_failure_is_internal_error() {
    let app = genome_routes(Arc::new(UnreadableStore));

    let (status, _, body) = get(app, "/dashboard/genomes/44689/genes").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        error["error"]["message"],
        "error store is closed in retrieving dashboard-44689"
    );
    assert_eq!(error["error"]["status"], 500);
}

#[tokio::test]
async fn test_health_check() {
    let app = genome_routes(Arc::new(MemoryStore::new()));

    let (status, _, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_full_router_serves_genomes() {
    let app = create_router(seeded_store().await, &Config::default());

    let (status, _, body) = get(app, "/dashboard/genomes/44689/genes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, GENES);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = genome_routes(seeded_store().await);

    let (status, _, _) = get(app, "/dashboard/genomes/44689").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
