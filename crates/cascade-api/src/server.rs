// crates/cascade-api/src/server.rs
// ============================================================================
// Module: API Server
// Description: Router assembly, health probes, observability middleware, serve loop.
// Purpose: Wire handlers, limits, and sinks into one axum application.
// Dependencies: axum, axum-server, cascade-config, tokio, tower
// ============================================================================

//! ## Overview
//! The router nests every resource under `/v1` with health probes at the
//! root. One middleware layer records metrics for every request and audit
//! events for mutating methods, labeled by the matched route template so
//! client-controlled paths cannot explode label cardinality. Body size and
//! request timeout come from validated config.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::time::Duration;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use axum::extract::State;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::middleware;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use cascade_config::ServerConfig;
use serde_json::json;
use thiserror::Error;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;

use crate::audit::ApiAuditEvent;
use crate::handlers::catalog;
use crate::handlers::components;
use crate::handlers::fiscal;
use crate::handlers::kpis;
use crate::handlers::org_units;
use crate::handlers::tenants;
use crate::state::ServerState;
use crate::state::now_timestamp;
use crate::telemetry::ApiMetricEvent;
use crate::telemetry::ApiOutcome;

// ============================================================================
// SECTION: Serve Errors
// ============================================================================

/// Errors raised while binding or serving the API.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Bind address failed to parse.
    #[error("bind address invalid: {0}")]
    BadBind(String),
    /// Server terminated with an I/O error.
    #[error("server failed: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Health Probes
// ============================================================================

/// `GET /healthz` - process liveness.
async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /readyz` - store readiness.
async fn readyz(State(state): State<ServerState>) -> Response {
    match state.store.readiness() {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response(),
        Err(error) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "detail": error.to_string() })),
        )
            .into_response(),
    }
}

// ============================================================================
// SECTION: Observability Middleware
// ============================================================================

/// Records one metric event per request and one audit event per mutation.
async fn track_request(State(state): State<ServerState>, request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |path| path.as_str().to_string());
    let tenant = tenant_label(&route, request.uri().path());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let event = ApiMetricEvent {
        method: method.to_string(),
        route: route.clone(),
        status,
        outcome: ApiOutcome::from_status(status),
    };
    state.metrics.record_request(event.clone());
    state.metrics.record_latency(event, started.elapsed());

    if method != Method::GET {
        state.audit.record(&ApiAuditEvent {
            tenant,
            method: method.to_string(),
            route,
            status,
            at: now_timestamp(),
        });
    }
    response
}

/// Extracts the raw tenant id from a tenant-scoped path.
fn tenant_label(route: &str, path: &str) -> Option<u64> {
    if !route.starts_with("/v1/tenants/{tenant_id}") {
        return None;
    }
    path.strip_prefix("/v1/tenants/")
        .and_then(|rest| rest.split('/').next())
        .and_then(|raw| raw.parse().ok())
}

// ============================================================================
// SECTION: Router Assembly
// ============================================================================

/// Builds the full application router.
#[must_use]
pub fn build_router(state: ServerState, server: &ServerConfig) -> Router {
    let v1 = Router::new()
        .route("/tenants", post(tenants::put_tenant).get(tenants::list_tenants))
        .route(
            "/tenants/{tenant_id}",
            get(tenants::get_tenant).delete(tenants::delete_tenant),
        )
        .route(
            "/tenants/{tenant_id}/levels",
            post(catalog::put_level).get(catalog::list_levels),
        )
        .route(
            "/tenants/{tenant_id}/levels/{level_id}",
            get(catalog::get_level).delete(catalog::delete_level),
        )
        .route(
            "/tenants/{tenant_id}/perspectives",
            post(catalog::put_perspective).get(catalog::list_perspectives),
        )
        .route(
            "/tenants/{tenant_id}/perspectives/{perspective_id}",
            get(catalog::get_perspective).delete(catalog::delete_perspective),
        )
        .route(
            "/tenants/{tenant_id}/fiscal-years",
            post(fiscal::put_fiscal_year).get(fiscal::list_fiscal_years),
        )
        .route(
            "/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}",
            get(fiscal::get_fiscal_year),
        )
        .route(
            "/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/transition",
            post(fiscal::post_transition),
        )
        .route(
            "/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/structure/report",
            get(fiscal::get_structure_report),
        )
        .route(
            "/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/structure/confirm",
            post(fiscal::post_structure_confirm),
        )
        .route(
            "/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/org-units",
            post(org_units::put_org_unit).get(org_units::list_org_units),
        )
        .route(
            "/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/org-units/{unit_id}",
            get(org_units::get_org_unit).delete(org_units::delete_org_unit),
        )
        .route(
            "/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/components",
            post(components::put_component).get(components::list_components),
        )
        .route(
            "/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/components/{component_id}",
            get(components::get_component).delete(components::delete_component),
        )
        .route("/tenants/{tenant_id}/kpis", post(kpis::put_kpi).get(kpis::list_kpis))
        .route(
            "/tenants/{tenant_id}/kpis/{kpi_id}",
            get(kpis::get_kpi).delete(kpis::delete_kpi),
        )
        .route(
            "/tenants/{tenant_id}/kpis/{kpi_id}/perspective",
            get(kpis::get_kpi_perspective),
        )
        .route(
            "/tenants/{tenant_id}/kpis/{kpi_id}/attainment",
            post(kpis::post_kpi_attainment),
        )
        .route(
            "/tenants/{tenant_id}/kpis/{kpi_id}/objectives",
            post(kpis::put_objective).get(kpis::list_objectives),
        )
        .route(
            "/tenants/{tenant_id}/kpis/{kpi_id}/objectives/{objective_id}",
            get(kpis::get_objective).delete(kpis::delete_objective),
        );

    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/v1", v1)
        .layer(middleware::from_fn_with_state(state.clone(), track_request))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|_error: tower::BoxError| async {
                    StatusCode::REQUEST_TIMEOUT
                }))
                .layer(TimeoutLayer::new(Duration::from_millis(server.request_timeout_ms))),
        )
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .with_state(state)
}

// ============================================================================
// SECTION: Serve Loop
// ============================================================================

/// Binds the configured address and serves the router until shutdown.
///
/// # Errors
///
/// Returns [`ServeError`] when the bind address is invalid or the server
/// terminates with an I/O failure.
pub async fn serve(state: ServerState, server: &ServerConfig) -> Result<(), ServeError> {
    let addr: SocketAddr = server
        .bind
        .parse()
        .map_err(|_| ServeError::BadBind(server.bind.clone()))?;
    let router = build_router(state, server);
    axum_server::bind(addr)
        .serve(router.into_make_service())
        .await
        .map_err(|err| ServeError::Io(err.to_string()))
}
