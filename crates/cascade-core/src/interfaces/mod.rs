// crates/cascade-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cascade Interfaces
// Description: Backend-agnostic storage contracts for directory records.
// Purpose: Define the store surface used by Cascade runtime and hosts.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The directory store is the only stateful dependency of the Cascade
//! runtime. Implementations must be deterministic, scope every operation by
//! tenant, and fail closed on missing or corrupt data. Writes are
//! last-write-wins upserts, except confirmation insertion which rejects
//! duplicates so a fiscal year can never be confirmed twice.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ComponentId;
use crate::core::FiscalYear;
use crate::core::FiscalYearId;
use crate::core::FiscalYearStatus;
use crate::core::Kpi;
use crate::core::KpiId;
use crate::core::KpiObjective;
use crate::core::LevelDefinition;
use crate::core::LevelId;
use crate::core::ObjectiveId;
use crate::core::OrgUnit;
use crate::core::OrgUnitId;
use crate::core::PerformanceComponent;
use crate::core::Perspective;
use crate::core::PerspectiveId;
use crate::core::StructureConfirmation;
use crate::core::Tenant;
use crate::core::TenantId;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Directory store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),
    /// Write conflicts with an existing record.
    #[error("record conflict: {0}")]
    Conflict(String),
    /// Record failed to serialize or deserialize.
    #[error("serialization failure: {0}")]
    Serialization(String),
    /// Backend reported an operational error.
    #[error("store backend failure: {0}")]
    Backend(String),
    /// Stored record failed integrity verification.
    #[error("integrity failure: {0}")]
    Integrity(String),
    /// Record exceeds a configured size cap.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
}

// ============================================================================
// SECTION: Directory Store
// ============================================================================

/// Backend-agnostic directory store.
///
/// Every operation is tenant-scoped. List operations return records sorted
/// by identifier so callers observe deterministic order regardless of
/// backend.
pub trait DirectoryStore: Send + Sync {
    /// Upserts a tenant record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put_tenant(&self, tenant: &Tenant) -> Result<(), StoreError>;

    /// Loads a tenant record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn tenant(&self, id: TenantId) -> Result<Option<Tenant>, StoreError>;

    /// Lists all tenant records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn tenants(&self) -> Result<Vec<Tenant>, StoreError>;

    /// Deletes a tenant record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the tenant does not exist.
    fn delete_tenant(&self, id: TenantId) -> Result<(), StoreError>;

    /// Upserts a level definition.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put_level(&self, level: &LevelDefinition) -> Result<(), StoreError>;

    /// Loads a level definition.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn level(&self, tenant: TenantId, id: &LevelId) -> Result<Option<LevelDefinition>, StoreError>;

    /// Lists level definitions for a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn levels(&self, tenant: TenantId) -> Result<Vec<LevelDefinition>, StoreError>;

    /// Deletes a level definition.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the level does not exist.
    fn delete_level(&self, tenant: TenantId, id: &LevelId) -> Result<(), StoreError>;

    /// Upserts a perspective.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put_perspective(&self, perspective: &Perspective) -> Result<(), StoreError>;

    /// Loads a perspective.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn perspective(
        &self,
        tenant: TenantId,
        id: &PerspectiveId,
    ) -> Result<Option<Perspective>, StoreError>;

    /// Lists perspectives for a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn perspectives(&self, tenant: TenantId) -> Result<Vec<Perspective>, StoreError>;

    /// Deletes a perspective.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the perspective does not exist.
    fn delete_perspective(&self, tenant: TenantId, id: &PerspectiveId) -> Result<(), StoreError>;

    /// Upserts a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put_fiscal_year(&self, fiscal_year: &FiscalYear) -> Result<(), StoreError>;

    /// Loads a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn fiscal_year(
        &self,
        tenant: TenantId,
        id: &FiscalYearId,
    ) -> Result<Option<FiscalYear>, StoreError>;

    /// Lists fiscal years for a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn fiscal_years(&self, tenant: TenantId) -> Result<Vec<FiscalYear>, StoreError>;

    /// Updates the status of a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the fiscal year does not exist.
    fn set_fiscal_year_status(
        &self,
        tenant: TenantId,
        id: &FiscalYearId,
        status: FiscalYearStatus,
    ) -> Result<(), StoreError>;

    /// Upserts an org unit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put_org_unit(&self, unit: &OrgUnit) -> Result<(), StoreError>;

    /// Loads an org unit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn org_unit(&self, tenant: TenantId, id: &OrgUnitId) -> Result<Option<OrgUnit>, StoreError>;

    /// Lists org units for a tenant and fiscal year.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn org_units(
        &self,
        tenant: TenantId,
        fiscal_year: &FiscalYearId,
    ) -> Result<Vec<OrgUnit>, StoreError>;

    /// Deletes an org unit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the unit does not exist.
    fn delete_org_unit(&self, tenant: TenantId, id: &OrgUnitId) -> Result<(), StoreError>;

    /// Upserts a performance component.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put_component(&self, component: &PerformanceComponent) -> Result<(), StoreError>;

    /// Loads a performance component.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn component(
        &self,
        tenant: TenantId,
        id: &ComponentId,
    ) -> Result<Option<PerformanceComponent>, StoreError>;

    /// Lists performance components for a tenant and fiscal year.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn components(
        &self,
        tenant: TenantId,
        fiscal_year: &FiscalYearId,
    ) -> Result<Vec<PerformanceComponent>, StoreError>;

    /// Deletes a performance component.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the component does not exist.
    fn delete_component(&self, tenant: TenantId, id: &ComponentId) -> Result<(), StoreError>;

    /// Upserts a KPI.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put_kpi(&self, kpi: &Kpi) -> Result<(), StoreError>;

    /// Loads a KPI.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn kpi(&self, tenant: TenantId, id: &KpiId) -> Result<Option<Kpi>, StoreError>;

    /// Lists KPIs for a tenant and fiscal year.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn kpis(&self, tenant: TenantId, fiscal_year: &FiscalYearId) -> Result<Vec<Kpi>, StoreError>;

    /// Deletes a KPI.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the KPI does not exist.
    fn delete_kpi(&self, tenant: TenantId, id: &KpiId) -> Result<(), StoreError>;

    /// Upserts a KPI objective.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put_objective(&self, objective: &KpiObjective) -> Result<(), StoreError>;

    /// Loads a KPI objective.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn objective(
        &self,
        tenant: TenantId,
        id: &ObjectiveId,
    ) -> Result<Option<KpiObjective>, StoreError>;

    /// Lists objectives for a KPI.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn objectives(&self, tenant: TenantId, kpi: &KpiId) -> Result<Vec<KpiObjective>, StoreError>;

    /// Deletes a KPI objective.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the objective does not exist.
    fn delete_objective(&self, tenant: TenantId, id: &ObjectiveId) -> Result<(), StoreError>;

    /// Inserts a structure confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the fiscal year already has a
    /// confirmation.
    fn insert_confirmation(&self, confirmation: &StructureConfirmation) -> Result<(), StoreError>;

    /// Loads the confirmation for a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn confirmation(
        &self,
        tenant: TenantId,
        fiscal_year: &FiscalYearId,
    ) -> Result<Option<StructureConfirmation>, StoreError>;

    /// Probes backend availability.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend is unavailable.
    fn readiness(&self) -> Result<(), StoreError>;
}
