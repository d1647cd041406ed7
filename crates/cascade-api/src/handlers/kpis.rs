// crates/cascade-api/src/handlers/kpis.rs
// ============================================================================
// Module: KPI Handlers
// Description: KPI CRUD, perspective resolution, attainment, and objectives.
// Purpose: Expose measures and the cascaded perspective walk.
// Dependencies: axum, cascade-core
// ============================================================================

//! KPI, resolution, attainment, and objective handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use cascade_core::FiscalYearId;
use cascade_core::Kpi;
use cascade_core::KpiId;
use cascade_core::KpiObjective;
use cascade_core::ObjectiveId;
use cascade_core::Perspective;
use cascade_core::runtime::Attainment;
use cascade_core::runtime::evaluate_attainment;
use cascade_core::runtime::resolve_perspective;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::handlers::clamp_page;
use crate::handlers::require_match;
use crate::handlers::require_tenant_match;
use crate::handlers::tenant_from_path;
use crate::state::ServerState;

// ============================================================================
// SECTION: Request and Response Shapes
// ============================================================================

/// Query for KPI list scoping.
#[derive(Debug, Clone, Deserialize)]
pub struct KpiListQuery {
    /// Fiscal year the list is scoped to.
    pub fiscal_year: String,
    /// Maximum records to return.
    pub limit: Option<usize>,
}

/// Response for `GET .../kpis/{kpi_id}/perspective`.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPerspectiveResponse {
    /// Perspective inherited from the root organizational KPI.
    pub perspective: Perspective,
    /// Root organizational KPI that anchors the chain.
    pub root_kpi_id: KpiId,
    /// Number of link hops taken.
    pub depth: usize,
    /// Ordered KPI identifiers walked, starting KPI first.
    pub path: Vec<KpiId>,
}

/// Body for `POST .../kpis/{kpi_id}/attainment`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttainmentRequest {
    /// Actual measured value, decimal string.
    pub actual: String,
}

// ============================================================================
// SECTION: KPI Handlers
// ============================================================================

/// `POST /v1/tenants/{tenant_id}/kpis` - upsert a KPI.
pub async fn put_kpi(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
    Json(kpi): Json<Kpi>,
) -> Result<(StatusCode, Json<Kpi>), ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    require_tenant_match(tenant, kpi.tenant_id)?;
    kpi.validate()?;
    if let Some(component_id) = &kpi.component_id {
        if state.store.component(tenant, component_id)?.is_none() {
            return Err(ApiError::Validation(format!(
                "component {component_id} does not exist for tenant {tenant}"
            )));
        }
    }
    state.store.put_kpi(&kpi)?;
    Ok((StatusCode::CREATED, Json(kpi)))
}

/// `GET /v1/tenants/{tenant_id}/kpis?fiscal_year=...` - list KPIs for a year.
pub async fn list_kpis(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
    Query(query): Query<KpiListQuery>,
) -> Result<Json<Vec<Kpi>>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let fiscal_year = FiscalYearId::new(query.fiscal_year.clone());
    let kpis = state.store.kpis(tenant, &fiscal_year)?;
    let page = ListQuery { limit: query.limit };
    Ok(Json(clamp_page(kpis, page, &state.limits)))
}

/// `GET /v1/tenants/{tenant_id}/kpis/{kpi_id}` - load one KPI.
pub async fn get_kpi(
    State(state): State<ServerState>,
    Path((tenant_id, kpi_id)): Path<(u64, String)>,
) -> Result<Json<Kpi>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = KpiId::new(kpi_id);
    state
        .store
        .kpi(tenant, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("kpi {id} for tenant {tenant}")))
}

/// `DELETE /v1/tenants/{tenant_id}/kpis/{kpi_id}` - delete one KPI.
pub async fn delete_kpi(
    State(state): State<ServerState>,
    Path((tenant_id, kpi_id)): Path<(u64, String)>,
) -> Result<StatusCode, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    state.store.delete_kpi(tenant, &KpiId::new(kpi_id))?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// SECTION: Resolution and Attainment
// ============================================================================

/// `GET /v1/tenants/{tenant_id}/kpis/{kpi_id}/perspective` - resolve the
/// effective perspective through the component chain.
pub async fn get_kpi_perspective(
    State(state): State<ServerState>,
    Path((tenant_id, kpi_id)): Path<(u64, String)>,
) -> Result<Json<ResolvedPerspectiveResponse>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = KpiId::new(kpi_id);
    let resolved = resolve_perspective(state.store.as_ref(), tenant, &id)?;
    Ok(Json(ResolvedPerspectiveResponse {
        perspective: resolved.perspective,
        root_kpi_id: resolved.root_kpi_id,
        depth: resolved.depth,
        path: resolved.path,
    }))
}

/// `POST /v1/tenants/{tenant_id}/kpis/{kpi_id}/attainment` - score an actual
/// value against the KPI's baseline/target span.
pub async fn post_kpi_attainment(
    State(state): State<ServerState>,
    Path((tenant_id, kpi_id)): Path<(u64, String)>,
    Json(request): Json<AttainmentRequest>,
) -> Result<Json<Attainment>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = KpiId::new(kpi_id);
    let kpi = state
        .store
        .kpi(tenant, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("kpi {id} for tenant {tenant}")))?;
    let attainment = evaluate_attainment(&kpi, &request.actual)?;
    Ok(Json(attainment))
}

// ============================================================================
// SECTION: Objective Handlers
// ============================================================================

/// `POST /v1/tenants/{tenant_id}/kpis/{kpi_id}/objectives` - upsert an objective.
pub async fn put_objective(
    State(state): State<ServerState>,
    Path((tenant_id, kpi_id)): Path<(u64, String)>,
    Json(objective): Json<KpiObjective>,
) -> Result<(StatusCode, Json<KpiObjective>), ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    require_tenant_match(tenant, objective.tenant_id)?;
    require_match("kpi_id", &kpi_id, objective.kpi_id.as_str())?;
    objective.validate()?;
    let kpi = KpiId::new(kpi_id);
    if state.store.kpi(tenant, &kpi)?.is_none() {
        return Err(ApiError::NotFound(format!("kpi {kpi} for tenant {tenant}")));
    }
    state.store.put_objective(&objective)?;
    Ok((StatusCode::CREATED, Json(objective)))
}

/// `GET /v1/tenants/{tenant_id}/kpis/{kpi_id}/objectives` - list objectives.
pub async fn list_objectives(
    State(state): State<ServerState>,
    Path((tenant_id, kpi_id)): Path<(u64, String)>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<KpiObjective>>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let objectives = state.store.objectives(tenant, &KpiId::new(kpi_id))?;
    Ok(Json(clamp_page(objectives, query, &state.limits)))
}

/// `GET /v1/tenants/{tenant_id}/kpis/{kpi_id}/objectives/{objective_id}` -
/// load one objective.
pub async fn get_objective(
    State(state): State<ServerState>,
    Path((tenant_id, _kpi_id, objective_id)): Path<(u64, String, String)>,
) -> Result<Json<KpiObjective>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = ObjectiveId::new(objective_id);
    state
        .store
        .objective(tenant, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("objective {id} for tenant {tenant}")))
}

/// `DELETE /v1/tenants/{tenant_id}/kpis/{kpi_id}/objectives/{objective_id}` -
/// delete one objective.
pub async fn delete_objective(
    State(state): State<ServerState>,
    Path((tenant_id, _kpi_id, objective_id)): Path<(u64, String, String)>,
) -> Result<StatusCode, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    state.store.delete_objective(tenant, &ObjectiveId::new(objective_id))?;
    Ok(StatusCode::NO_CONTENT)
}
