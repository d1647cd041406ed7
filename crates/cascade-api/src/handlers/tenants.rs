// crates/cascade-api/src/handlers/tenants.rs
// ============================================================================
// Module: Tenant Handlers
// Description: Tenant CRUD endpoints.
// Purpose: Manage the outermost directory scope.
// Dependencies: axum, cascade-core
// ============================================================================

//! Tenant CRUD handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use cascade_core::Tenant;

use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::handlers::clamp_page;
use crate::handlers::tenant_from_path;
use crate::state::ServerState;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `POST /v1/tenants` - upsert a tenant.
pub async fn put_tenant(
    State(state): State<ServerState>,
    Json(tenant): Json<Tenant>,
) -> Result<(StatusCode, Json<Tenant>), ApiError> {
    tenant.validate()?;
    state.store.put_tenant(&tenant)?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

/// `GET /v1/tenants` - list tenants.
pub async fn list_tenants(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Tenant>>, ApiError> {
    let tenants = state.store.tenants()?;
    Ok(Json(clamp_page(tenants, query, &state.limits)))
}

/// `GET /v1/tenants/{tenant_id}` - load one tenant.
pub async fn get_tenant(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    state
        .store
        .tenant(tenant)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("tenant {tenant}")))
}

/// `DELETE /v1/tenants/{tenant_id}` - delete one tenant.
pub async fn delete_tenant(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    state.store.delete_tenant(tenant)?;
    Ok(StatusCode::NO_CONTENT)
}
