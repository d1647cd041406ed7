// crates/cascade-api/src/handlers/org_units.rs
// ============================================================================
// Module: Org Unit Handlers
// Description: Org unit CRUD endpoints scoped by fiscal year.
// Purpose: Manage the organizational tree while a year is in draft.
// Dependencies: axum, cascade-core
// ============================================================================

//! Org unit handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use cascade_core::FiscalYearId;
use cascade_core::FiscalYearStatus;
use cascade_core::OrgUnit;
use cascade_core::OrgUnitId;
use cascade_core::TenantId;

use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::handlers::clamp_page;
use crate::handlers::fiscal::require_year_match;
use crate::handlers::require_tenant_match;
use crate::handlers::tenant_from_path;
use crate::state::ServerState;

// ============================================================================
// SECTION: Guards
// ============================================================================

/// Rejects structural edits on non-draft fiscal years.
///
/// Confirmation freezes the unit set; reads stay open on every status.
fn require_draft(
    state: &ServerState,
    tenant: TenantId,
    fiscal_year: &FiscalYearId,
) -> Result<(), ApiError> {
    let year = state
        .store
        .fiscal_year(tenant, fiscal_year)?
        .ok_or_else(|| ApiError::NotFound(format!("fiscal year {fiscal_year} for tenant {tenant}")))?;
    if year.status == FiscalYearStatus::Draft {
        Ok(())
    } else {
        Err(ApiError::Conflict(format!(
            "fiscal year {fiscal_year} is {} and its structure is frozen",
            year.status.as_str()
        )))
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `POST /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/org-units` -
/// upsert an org unit.
pub async fn put_org_unit(
    State(state): State<ServerState>,
    Path((tenant_id, fiscal_year_id)): Path<(u64, String)>,
    Json(unit): Json<OrgUnit>,
) -> Result<(StatusCode, Json<OrgUnit>), ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let fiscal_year = FiscalYearId::new(fiscal_year_id);
    require_tenant_match(tenant, unit.tenant_id)?;
    require_year_match(&fiscal_year, &unit.fiscal_year_id)?;
    unit.validate()?;
    require_draft(&state, tenant, &fiscal_year)?;

    if state.store.org_unit(tenant, &unit.id)?.is_none() {
        let existing = state.store.org_units(tenant, &fiscal_year)?;
        if existing.len() >= state.limits.max_units_per_fiscal_year {
            return Err(ApiError::LimitExceeded(format!(
                "fiscal year {fiscal_year} already holds {} org units",
                existing.len()
            )));
        }
    }
    state.store.put_org_unit(&unit)?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// `GET /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/org-units` -
/// list org units for the year.
pub async fn list_org_units(
    State(state): State<ServerState>,
    Path((tenant_id, fiscal_year_id)): Path<(u64, String)>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<OrgUnit>>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let units = state.store.org_units(tenant, &FiscalYearId::new(fiscal_year_id))?;
    Ok(Json(clamp_page(units, query, &state.limits)))
}

/// `GET /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/org-units/{unit_id}`
/// - load one org unit.
pub async fn get_org_unit(
    State(state): State<ServerState>,
    Path((tenant_id, _fiscal_year_id, unit_id)): Path<(u64, String, String)>,
) -> Result<Json<OrgUnit>, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    let id = OrgUnitId::new(unit_id);
    state
        .store
        .org_unit(tenant, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("org unit {id} for tenant {tenant}")))
}

/// `DELETE /v1/tenants/{tenant_id}/fiscal-years/{fiscal_year_id}/org-units/{unit_id}`
/// - delete one org unit.
pub async fn delete_org_unit(
    State(state): State<ServerState>,
    Path((tenant_id, fiscal_year_id, unit_id)): Path<(u64, String, String)>,
) -> Result<StatusCode, ApiError> {
    let tenant = tenant_from_path(tenant_id)?;
    require_draft(&state, tenant, &FiscalYearId::new(fiscal_year_id))?;
    state.store.delete_org_unit(tenant, &OrgUnitId::new(unit_id))?;
    Ok(StatusCode::NO_CONTENT)
}
