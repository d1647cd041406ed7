// crates/cascade-api/src/handlers/fiscal.rs
// ============================================================================
// Module: Fiscal Year Handlers
// Description: Fiscal year CRUD, lifecycle transitions, and structure lock-in.
// Purpose: Expose the draft -> active -> locked -> archived workflow.
// Dependencies: axum, cascade-core
// ============================================================================

//! Fiscal year, transition, and structure confirmation handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use cascade_core::FiscalYear;
use cascade_core::FiscalYearId;
use cascade_core::FiscalYearStatus;
use cascade_core::StructureConfirmation;
use cascade_core::ValidationSummary;
use cascade_core::runtime::StructureReport;
use cascade_core::runtime::confirm_structure;
use cascade_core::runtime::transition_fiscal_year;
use cascade_core::runtime::validate_structure;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::handlers::clamp_page;
use crate::handlers::require_match;
use crate::handlers::require_tenant_match;
use crate::handlers::tenant_from_path;
use crate::state::ServerState;
use crate::state::now_timestamp;

// ============================================================================
// SECTION: Request and Response Shapes
// ============================================================================

/// Body for `POST .../transition`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TransitionRequest {
    /// Requested target status.
    pub to: FiscalYearStatus,
}

/// Response for `GET .../structure/report`.
#[derive(Debug, Clone, Serialize)]
pub struct StructureReportResponse {
    /// Full validation report.
    pub report: StructureReport,
    /// Client-safe summary of the report.
    pub summary: ValidationSummary,
}

// ============================================================================
// SECTION: Fiscal Year Handlers
// ============================================================================

/// `POST /v1/tenants/{tenant_id}/fiscal-years` - upsert a fiscal year.
///
/// New years always start in `draft`; status changes go through the
/// transition and confirmation endpoints, so an upsert never moves status.
pub async fn put_fiscal_year(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
    Json(fiscal_year): Json<FiscalYear>,
) -> Result<(StatusCode, Json<FiscalYear>), ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    require_tenant_match(tenant, fiscal_year.tenant_id)?;
    fiscal_year.validate()?;
    let stored = state.store.fiscal_year(tenant, &fiscal_year.id)?;
    let fiscal_year = match stored {
        // Status is owned by the lifecycle engines; carry the stored value.
        Some(existing) => FiscalYear {
            status: existing.status,
            ..fiscal_year
        },
        None => FiscalYear {
            status: FiscalYearStatus::Draft,
            ..fiscal_year
        },
    };
    state.store.put_fiscal_year(&fiscal_year)?;
    Ok((StatusCode::CREATED, Json(fiscal_year)))
}

/// `GET /v1/tenants/{tenant_id}/fiscal-years` - list fiscal years.
pub async fn list_fiscal_years(
    State(state): State<ServerState>,
    Path(tenant_id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FiscalYear>>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let years = state.store.fiscal_years(tenant)?;
    Ok(Json(clamp_page(years, query, &state.limits)))
}

/// `GET /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}` - load one year.
pub async fn get_fiscal_year(
    State(state): State<ServerState>,
    Path((tenant_id, fiscal_year_id)): Path<(u64, String)>,
) -> Result<Json<FiscalYear>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = FiscalYearId::new(fiscal_year_id);
    state
        .store
        .fiscal_year(tenant, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("fiscal year {id} for tenant {tenant}")))
}

/// `POST /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/transition` -
/// apply a forward lifecycle transition.
pub async fn post_transition(
    State(state): State<ServerState>,
    Path((tenant_id, fiscal_year_id)): Path<(u64, String)>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<FiscalYear>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = FiscalYearId::new(fiscal_year_id);
    let fiscal_year = transition_fiscal_year(state.store.as_ref(), tenant, &id, request.to)?;
    Ok(Json(fiscal_year))
}

// ============================================================================
// SECTION: Structure Handlers
// ============================================================================

/// `GET /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/structure/report`
/// - dry-run validation of the year's org structure.
pub async fn get_structure_report(
    State(state): State<ServerState>,
    Path((tenant_id, fiscal_year_id)): Path<(u64, String)>,
) -> Result<Json<StructureReportResponse>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = FiscalYearId::new(fiscal_year_id);
    if state.store.fiscal_year(tenant, &id)?.is_none() {
        return Err(ApiError::NotFound(format!("fiscal year {id} for tenant {tenant}")));
    }
    let units = state.store.org_units(tenant, &id)?;
    let levels = state.store.levels(tenant)?;
    let report = validate_structure(&units, &levels);
    let summary = report.summary();
    Ok(Json(StructureReportResponse { report, summary }))
}

/// `POST /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/structure/confirm`
/// - confirm the structure and activate the year.
pub async fn post_structure_confirm(
    State(state): State<ServerState>,
    Path((tenant_id, fiscal_year_id)): Path<(u64, String)>,
) -> Result<Json<StructureConfirmation>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = FiscalYearId::new(fiscal_year_id);
    let confirmation = confirm_structure(state.store.as_ref(), tenant, &id, now_timestamp())?;
    Ok(Json(confirmation))
}

// ============================================================================
// SECTION: Body Consistency
// ============================================================================

/// Checks a nested record's fiscal year against the path value.
pub(crate) fn require_year_match(
    path_year: &FiscalYearId,
    body_year: &FiscalYearId,
) -> Result<(), ApiError> {
    require_match("fiscal_year_id", path_year.as_str(), body_year.as_str())
}
