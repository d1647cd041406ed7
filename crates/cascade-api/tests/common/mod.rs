// crates/cascade-api/tests/common/mod.rs
// ============================================================================
// Module: API Test Helpers
// Description: Router construction and JSON request helpers.
// Purpose: Drive the REST surface in-memory via tower oneshot.
// ============================================================================

//! Shared API test helpers.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    dead_code,
    reason = "Test-only helpers; not every test file uses every helper."
)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use cascade_api::ServerState;
use cascade_api::build_router;
use cascade_config::ServerConfig;
use cascade_core::runtime::InMemoryDirectoryStore;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Builds an application over a fresh in-memory store.
pub fn app() -> Router {
    app_with_state().0
}

/// Builds an application and returns its state for sink assertions.
pub fn app_with_state() -> (Router, ServerState) {
    let store = Arc::new(InMemoryDirectoryStore::new());
    let state = ServerState::new(store, cascade_config::LimitsConfig::default());
    let router = build_router(state.clone(), &ServerConfig::default());
    (router, state)
}

/// Sends a bodyless request and returns status plus parsed JSON body.
pub async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    dispatch(router, request).await
}

/// Sends a JSON request and returns status plus parsed JSON body.
pub async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: &Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    dispatch(router, request).await
}

/// Dispatches one request through the router.
async fn dispatch(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Creates the standard test tenant (id 1).
pub async fn seed_tenant(router: &Router) {
    let (status, _) = send_json(
        router,
        "POST",
        "/v1/tenants",
        &serde_json::json!({
            "id": 1,
            "name": "acme",
            "display_name": "Acme Corp",
            "active": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

/// Creates a draft fiscal year `fy-2026` for tenant 1.
pub async fn seed_fiscal_year(router: &Router) {
    let (status, _) = send_json(
        router,
        "POST",
        "/v1/tenants/1/fiscal-years",
        &serde_json::json!({
            "id": "fy-2026",
            "tenant_id": 1,
            "label": "FY 2026/27",
            "starts_at": "2026-07-01T00:00:00Z",
            "ends_at": "2027-06-30T23:59:59Z",
            "status": "draft"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

/// Creates an org unit under `fy-2026` for tenant 1.
pub async fn seed_unit(router: &Router, id: &str, parent: Option<&str>) {
    let (status, _) = send_json(
        router,
        "POST",
        "/v1/tenants/1/fiscal-years/fy-2026/org-units",
        &serde_json::json!({
            "id": id,
            "tenant_id": 1,
            "fiscal_year_id": "fy-2026",
            "name": format!("unit {id}"),
            "level_id": null,
            "parent_id": parent,
            "active": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}
