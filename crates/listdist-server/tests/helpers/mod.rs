//! Test helpers for listdist server integration tests
//!
//! - In-memory application setup
//! - Multipart request bodies
//! - Minimal XLSX workbooks built in memory

#![allow(dead_code)]

pub mod fixtures;

use axum::{body::Body, http::Request, Router};
use std::sync::Arc;

use listdist_server::{
    api,
    config::{Config, ImportConfig},
    features::FeatureState,
    store::MemoryStore,
};

pub use fixtures::*;

pub const BOUNDARY: &str = "listdist-test-boundary";

/// Router over a [`MemoryStore`] that already has `agents` registered
pub async fn setup_test_app(agents: usize) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_agents(agents).await);
    let config = Config::default();
    let state = FeatureState::shared(store.clone(), ImportConfig::default());
    (api::create_router(state, &config), store)
}

/// `multipart/form-data` body with a single file part
pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/lists/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body("file", filename, content)))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
