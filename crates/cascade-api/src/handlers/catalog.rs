// crates/cascade-api/src/handlers/catalog.rs
// ============================================================================
// Module: Catalog Handlers
// Description: Level definition and perspective CRUD endpoints.
// Purpose: Manage tenant-scoped catalog records.
// Dependencies: axum, cascade-core
// ============================================================================

//! Level definition and perspective handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use cascade_core::LevelDefinition;
use cascade_core::LevelId;
use cascade_core::Perspective;
use cascade_core::PerspectiveId;

use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::handlers::clamp_page;
use crate::handlers::require_tenant_match;
use crate::handlers::tenant_from_path;
use crate::state::ServerState;

// ============================================================================
// SECTION: Level Handlers
// ============================================================================

/// `POST /v1/tenants/{tenant_id}/levels` - upsert a level definition.
pub async fn put_level(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
    Json(level): Json<LevelDefinition>,
) -> Result<(StatusCode, Json<LevelDefinition>), ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    require_tenant_match(tenant, level.tenant_id)?;
    level.validate()?;
    state.store.put_level(&level)?;
    Ok((StatusCode::CREATED, Json(level)))
}

/// `GET /v1/tenants/{tenant_id}/levels` - list level definitions.
pub async fn list_levels(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LevelDefinition>>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let levels = state.store.levels(tenant)?;
    Ok(Json(clamp_page(levels, query, &state.limits)))
}

/// `GET /v1/tenants/{tenant_id}/levels/{level_id}` - load one level.
pub async fn get_level(
    State(state): State<ServerState>,
    Path((tenant_id, level_id)): Path<(u64, String)>,
) -> Result<Json<LevelDefinition>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = LevelId::new(level_id);
    state
        .store
        .level(tenant, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("level {id} for tenant {tenant}")))
}

/// `DELETE /v1/tenants/{tenant_id}/levels/{level_id}` - delete one level.
pub async fn delete_level(
    State(state): State<ServerState>,
    Path((tenant_id, level_id)): Path<(u64, String)>,
) -> Result<StatusCode, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    state.store.delete_level(tenant, &LevelId::new(level_id))?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// SECTION: Perspective Handlers
// ============================================================================

/// `POST /v1/tenants/{tenant_id}/perspectives` - upsert a perspective.
pub async fn put_perspective(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
    Json(perspective): Json<Perspective>,
) -> Result<(StatusCode, Json<Perspective>), ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    require_tenant_match(tenant, perspective.tenant_id)?;
    perspective.validate()?;
    state.store.put_perspective(&perspective)?;
    Ok((StatusCode::CREATED, Json(perspective)))
}

/// `GET /v1/tenants/{tenant_id}/perspectives` - list perspectives.
pub async fn list_perspectives(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Perspective>>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let perspectives = state.store.perspectives(tenant)?;
    Ok(Json(clamp_page(perspectives, query, &state.limits)))
}

/// `GET /v1/tenants/{tenant_id}/perspectives/{perspective_id}` - load one perspective.
pub async fn get_perspective(
    State(state): State<ServerState>,
    Path((tenant_id, perspective_id)): Path<(u64, String)>,
) -> Result<Json<Perspective>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = PerspectiveId::new(perspective_id);
    state
        .store
        .perspective(tenant, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("perspective {id} for tenant {tenant}")))
}

/// `DELETE /v1/tenants/{tenant_id}/perspectives/{perspective_id}` - delete one perspective.
pub async fn delete_perspective(
    State(state): State<ServerState>,
    Path((tenant_id, perspective_id)): Path<(u64, String)>,
) -> Result<StatusCode, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    state
        .store
        .delete_perspective(tenant, &PerspectiveId::new(perspective_id))?;
    Ok(StatusCode::NO_CONTENT)
}
