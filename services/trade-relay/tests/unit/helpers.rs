//! Test helpers and utilities

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use trade_relay::{AppState, RelayConfig, SnapshotStore, build_router, models::Trade};

pub const TEST_API_KEY: &str = "test-relay-key";

/// Test configuration factory
pub fn create_test_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.server.port = 0;
    config.server.compression = false;
    config.auth.api_key = Some(TEST_API_KEY.to_string());
    config
}

/// Router plus a handle on its store
pub fn create_test_app() -> (Router, Arc<SnapshotStore>) {
    create_test_app_with(&create_test_config())
}

/// Router built from a tweaked configuration
pub fn create_test_app_with(config: &RelayConfig) -> (Router, Arc<SnapshotStore>) {
    crate::init_test_env();
    let store = Arc::new(SnapshotStore::new());
    let router = build_router(AppState::new(Arc::clone(&store)), config).expect("test router");
    (router, store)
}

/// Trades with the given profits and nothing else
pub fn trades_with_profits(profits: &[f64]) -> Vec<Trade> {
    profits
        .iter()
        .map(|profit| serde_json::from_value(serde_json::json!({ "profit": profit })).unwrap())
        .collect()
}

/// POST a raw body to the ingest route
pub fn ingest_request(api_key: Option<&str>, body: impl Into<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/trades")
        .header("Content-Type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body.into())).unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Drive one request through the router and decode the JSON body
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}
