// crates/cascade-api/tests/routes_crud.rs
// ============================================================================
// Module: REST CRUD Route Tests
// Description: Health probes, tenant CRUD, validation, and paging behavior.
// Purpose: Validate the REST surface with in-memory fixtures.
// ============================================================================

//! CRUD and probe tests over the in-memory router.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use axum::http::StatusCode;
use serde_json::json;

mod common;

// ============================================================================
// SECTION: Probes
// ============================================================================

#[tokio::test]
async fn health_endpoint_ok() {
    let app = common::app();
    let (status, body) = common::send(&app, "GET", "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn ready_endpoint_ok() {
    let app = common::app();
    let (status, body) = common::send(&app, "GET", "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// SECTION: Tenant CRUD
// ============================================================================

#[tokio::test]
async fn tenant_round_trip() {
    let app = common::app();
    common::seed_tenant(&app).await;

    let (status, body) = common::send(&app, "GET", "/v1/tenants/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "acme");

    let (status, body) = common::send(&app, "GET", "/v1/tenants").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = common::send(&app, "DELETE", "/v1/tenants/1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = common::send(&app, "GET", "/v1/tenants/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn zero_tenant_path_is_rejected() {
    let app = common::app();
    let (status, body) = common::send(&app, "GET", "/v1/tenants/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_tenant_id");
}

#[tokio::test]
async fn tenant_validation_failures_are_400() {
    let app = common::app();
    let (status, body) = common::send_json(
        &app,
        "POST",
        "/v1/tenants",
        &json!({ "id": 1, "name": "", "display_name": "Acme", "active": true }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
}

// ============================================================================
// SECTION: Path/Body Consistency
// ============================================================================

#[tokio::test]
async fn body_tenant_must_match_path() {
    let app = common::app();
    common::seed_tenant(&app).await;
    let (status, body) = common::send_json(
        &app,
        "POST",
        "/v1/tenants/1/perspectives",
        &json!({
            "id": "p-financial",
            "tenant_id": 2,
            "name": "Financial",
            "description": null
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "path_body_mismatch");
}

#[tokio::test]
async fn body_fiscal_year_must_match_path() {
    let app = common::app();
    common::seed_tenant(&app).await;
    common::seed_fiscal_year(&app).await;
    let (status, body) = common::send_json(
        &app,
        "POST",
        "/v1/tenants/1/fiscal-years/fy-2026/org-units",
        &json!({
            "id": "org",
            "tenant_id": 1,
            "fiscal_year_id": "fy-2027",
            "name": "org",
            "level_id": null,
            "parent_id": null,
            "active": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "path_body_mismatch");
}

// ============================================================================
// SECTION: Paging and Limits
// ============================================================================

#[tokio::test]
async fn list_limit_query_truncates() {
    let app = common::app();
    common::seed_tenant(&app).await;
    common::seed_fiscal_year(&app).await;
    common::seed_unit(&app, "org", None).await;
    common::seed_unit(&app, "sales", Some("org")).await;
    common::seed_unit(&app, "support", Some("org")).await;

    let (status, body) =
        common::send(&app, "GET", "/v1/tenants/1/fiscal-years/fy-2026/org-units?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn component_kind_rules_are_enforced() {
    let app = common::app();
    common::seed_tenant(&app).await;
    common::seed_fiscal_year(&app).await;
    common::seed_unit(&app, "org", None).await;

    // kind=kpi without a source link fails validation.
    let (status, body) = common::send_json(
        &app,
        "POST",
        "/v1/tenants/1/fiscal-years/fy-2026/components",
        &json!({
            "id": "comp-1",
            "tenant_id": 1,
            "fiscal_year_id": "fy-2026",
            "org_unit_id": "org",
            "kind": "kpi",
            "label": "cascaded measure",
            "source_kpi_id": null
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    // kind=kpi referencing a missing source KPI also fails.
    let (status, _) = common::send_json(
        &app,
        "POST",
        "/v1/tenants/1/fiscal-years/fy-2026/components",
        &json!({
            "id": "comp-1",
            "tenant_id": 1,
            "fiscal_year_id": "fy-2026",
            "org_unit_id": "org",
            "kind": "kpi",
            "label": "cascaded measure",
            "source_kpi_id": "ghost"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// SECTION: Observability
// ============================================================================

#[tokio::test]
async fn metrics_and_audit_sinks_receive_events() {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use cascade_api::MemoryAuditSink;
    use cascade_api::MemoryMetricsSink;
    use cascade_api::ServerState;
    use cascade_api::build_router;
    use cascade_config::ServerConfig;
    use cascade_core::runtime::InMemoryDirectoryStore;

    let metrics = Arc::new(MemoryMetricsSink::new());
    let audit = Arc::new(MemoryAuditSink::new());
    let state = ServerState::new(
        Arc::new(InMemoryDirectoryStore::new()),
        cascade_config::LimitsConfig::default(),
    )
    .with_metrics(metrics.clone())
    .with_audit(audit.clone());
    let app = build_router(state, &ServerConfig::default());

    let (status, _) = common::send(&app, "GET", "/v1/tenants").await;
    assert_eq!(status, StatusCode::OK);
    common::seed_tenant(&app).await;

    let requests = metrics.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|event| event.route.starts_with("/v1/tenants")));
    assert_eq!(metrics.latency_count(), 2);

    // Only the mutating POST is audited.
    let audited = audit.events();
    assert_eq!(audited.len(), 1);
    assert_eq!(audited[0].method, "POST");
    assert_eq!(audited[0].status, 201);
}
