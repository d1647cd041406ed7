// crates/cascade-api/src/handlers/components.rs
// ============================================================================
// Module: Performance Component Handlers
// Description: Component CRUD endpoints scoped by fiscal year.
// Purpose: Manage the cascade links between organizational levels.
// Dependencies: axum, cascade-core
// ============================================================================

//! Performance component handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use cascade_core::ComponentId;
use cascade_core::FiscalYearId;
use cascade_core::PerformanceComponent;

use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::handlers::clamp_page;
use crate::handlers::fiscal::require_year_match;
use crate::handlers::require_tenant_match;
use crate::handlers::tenant_from_path;
use crate::state::ServerState;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `POST /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/components` -
/// upsert a performance component.
///
/// A component of kind `kpi` must reference a source KPI that exists in the
/// directory; the chain is otherwise unverifiable at resolution time.
pub async fn put_component(
    State(state): State<ServerState>,
    Path((tenant_id, fiscal_year_id)): Path<(u64, String)>,
    Json(component): Json<PerformanceComponent>,
) -> Result<(StatusCode, Json<PerformanceComponent>), ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let fiscal_year = FiscalYearId::new(fiscal_year_id);
    require_tenant_match(tenant, component.tenant_id)?;
    require_year_match(&fiscal_year, &component.fiscal_year_id)?;
    component.validate()?;

    if let Some(source) = &component.source_kpi_id {
        if state.store.kpi(tenant, source)?.is_none() {
            return Err(ApiError::Validation(format!(
                "source kpi {source} does not exist for tenant {tenant}"
            )));
        }
    }
    if state.store.component(tenant, &component.id)?.is_none() {
        let existing = state.store.components(tenant, &fiscal_year)?;
        if existing.len() >= state.limits.max_components_per_fiscal_year {
            return Err(ApiError::LimitExceeded(format!(
                "fiscal year {fiscal_year} already holds {} components",
                existing.len()
            )));
        }
    }
    state.store.put_component(&component)?;
    Ok((StatusCode::CREATED, Json(component)))
}

/// `GET /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/components` -
/// list components for the year.
pub async fn list_components(
    State(state): State<ServerState>,
    Path((tenant_id, fiscal_year_id)): Path<(u64, String)>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PerformanceComponent>>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let components = state.store.components(tenant, &FiscalYearId::new(fiscal_year_id))?;
    Ok(Json(clamp_page(components, query, &state.limits)))
}

/// `GET /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/components/{component_id}`
/// - load one component.
pub async fn get_component(
    State(state): State<ServerState>,
    Path((tenant_id, _fiscal_year_id, component_id)): Path<(u64, String, String)>,
) -> Result<Json<PerformanceComponent>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = ComponentId::new(component_id);
    state
        .store
        .component(tenant, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("component {id} for tenant {tenant}")))
}

/// `DELETE /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/components/{component_id}`
/// - delete one component.
pub async fn delete_component(
    State(state): State<ServerState>,
    Path((tenant_id, _fiscal_year_id, component_id)): Path<(u64, String, String)>,
) -> Result<StatusCode, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    state.store.delete_component(tenant, &ComponentId::new(component_id))?;
    Ok(StatusCode::NO_CONTENT)
}
