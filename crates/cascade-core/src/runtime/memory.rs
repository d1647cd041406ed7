// crates/cascade-core/src/runtime/memory.rs
// ============================================================================
// Module: Cascade In-Memory Store
// Description: Reference DirectoryStore backed by BTreeMaps.
// Purpose: Deterministic store for tests, offline tooling, and small deployments.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The in-memory store keeps every shelf in a `BTreeMap` under one mutex,
//! so list operations come back in identifier order without extra sorting.
//! Lock poisoning is treated as a backend failure; the store fails closed
//! rather than recovering a potentially half-written shelf.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

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
use crate::interfaces::DirectoryStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Shelves
// ============================================================================

/// Scoped record key: tenant plus string identifier.
type ScopedKey = (u64, String);

/// All record shelves guarded by the store mutex.
#[derive(Debug, Default)]
struct Shelves {
    /// Tenant records keyed by raw tenant id.
    tenants: BTreeMap<u64, Tenant>,
    /// Level definitions.
    levels: BTreeMap<ScopedKey, LevelDefinition>,
    /// Perspectives.
    perspectives: BTreeMap<ScopedKey, Perspective>,
    /// Fiscal years.
    fiscal_years: BTreeMap<ScopedKey, FiscalYear>,
    /// Org units.
    org_units: BTreeMap<ScopedKey, OrgUnit>,
    /// Performance components.
    components: BTreeMap<ScopedKey, PerformanceComponent>,
    /// KPIs.
    kpis: BTreeMap<ScopedKey, Kpi>,
    /// KPI objectives.
    objectives: BTreeMap<ScopedKey, KpiObjective>,
    /// Structure confirmations keyed by fiscal year.
    confirmations: BTreeMap<ScopedKey, StructureConfirmation>,
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Reference in-memory directory store.
///
/// # Invariants
/// - All shelves sit behind one mutex; operations are atomic per call.
/// - List operations return records in identifier order.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryStore {
    /// Guarded record shelves.
    shelves: Mutex<Shelves>,
}

impl InMemoryDirectoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the shelves, failing closed on poisoning.
    fn lock(&self) -> Result<MutexGuard<'_, Shelves>, StoreError> {
        self.shelves
            .lock()
            .map_err(|_| StoreError::Backend("directory store lock poisoned".to_string()))
    }
}

impl DirectoryStore for InMemoryDirectoryStore {
    fn put_tenant(&self, tenant: &Tenant) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves.tenants.insert(tenant.id.get(), tenant.clone());
        Ok(())
    }

    fn tenant(&self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves.tenants.get(&id.get()).cloned())
    }

    fn tenants(&self) -> Result<Vec<Tenant>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves.tenants.values().cloned().collect())
    }

    fn delete_tenant(&self, id: TenantId) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves
            .tenants
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("tenant {id}")))
    }

    fn put_level(&self, level: &LevelDefinition) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves.levels.insert(
            (level.tenant_id.get(), level.id.as_str().to_string()),
            level.clone(),
        );
        Ok(())
    }

    fn level(&self, tenant: TenantId, id: &LevelId) -> Result<Option<LevelDefinition>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .levels
            .get(&(tenant.get(), id.as_str().to_string()))
            .cloned())
    }

    fn levels(&self, tenant: TenantId) -> Result<Vec<LevelDefinition>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .levels
            .values()
            .filter(|level| level.tenant_id == tenant)
            .cloned()
            .collect())
    }

    fn delete_level(&self, tenant: TenantId, id: &LevelId) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves
            .levels
            .remove(&(tenant.get(), id.as_str().to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("level {id} for tenant {tenant}")))
    }

    fn put_perspective(&self, perspective: &Perspective) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves.perspectives.insert(
            (
                perspective.tenant_id.get(),
                perspective.id.as_str().to_string(),
            ),
            perspective.clone(),
        );
        Ok(())
    }

    fn perspective(
        &self,
        tenant: TenantId,
        id: &PerspectiveId,
    ) -> Result<Option<Perspective>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .perspectives
            .get(&(tenant.get(), id.as_str().to_string()))
            .cloned())
    }

    fn perspectives(&self, tenant: TenantId) -> Result<Vec<Perspective>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .perspectives
            .values()
            .filter(|perspective| perspective.tenant_id == tenant)
            .cloned()
            .collect())
    }

    fn delete_perspective(&self, tenant: TenantId, id: &PerspectiveId) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves
            .perspectives
            .remove(&(tenant.get(), id.as_str().to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("perspective {id} for tenant {tenant}")))
    }

    fn put_fiscal_year(&self, fiscal_year: &FiscalYear) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves.fiscal_years.insert(
            (
                fiscal_year.tenant_id.get(),
                fiscal_year.id.as_str().to_string(),
            ),
            fiscal_year.clone(),
        );
        Ok(())
    }

    fn fiscal_year(
        &self,
        tenant: TenantId,
        id: &FiscalYearId,
    ) -> Result<Option<FiscalYear>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .fiscal_years
            .get(&(tenant.get(), id.as_str().to_string()))
            .cloned())
    }

    fn fiscal_years(&self, tenant: TenantId) -> Result<Vec<FiscalYear>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .fiscal_years
            .values()
            .filter(|fiscal_year| fiscal_year.tenant_id == tenant)
            .cloned()
            .collect())
    }

    fn set_fiscal_year_status(
        &self,
        tenant: TenantId,
        id: &FiscalYearId,
        status: FiscalYearStatus,
    ) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        let fiscal_year = shelves
            .fiscal_years
            .get_mut(&(tenant.get(), id.as_str().to_string()))
            .ok_or_else(|| StoreError::NotFound(format!("fiscal year {id} for tenant {tenant}")))?;
        fiscal_year.status = status;
        Ok(())
    }

    fn put_org_unit(&self, unit: &OrgUnit) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves.org_units.insert(
            (unit.tenant_id.get(), unit.id.as_str().to_string()),
            unit.clone(),
        );
        Ok(())
    }

    fn org_unit(&self, tenant: TenantId, id: &OrgUnitId) -> Result<Option<OrgUnit>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .org_units
            .get(&(tenant.get(), id.as_str().to_string()))
            .cloned())
    }

    fn org_units(
        &self,
        tenant: TenantId,
        fiscal_year: &FiscalYearId,
    ) -> Result<Vec<OrgUnit>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .org_units
            .values()
            .filter(|unit| unit.tenant_id == tenant && unit.fiscal_year_id == *fiscal_year)
            .cloned()
            .collect())
    }

    fn delete_org_unit(&self, tenant: TenantId, id: &OrgUnitId) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves
            .org_units
            .remove(&(tenant.get(), id.as_str().to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("org unit {id} for tenant {tenant}")))
    }

    fn put_component(&self, component: &PerformanceComponent) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves.components.insert(
            (component.tenant_id.get(), component.id.as_str().to_string()),
            component.clone(),
        );
        Ok(())
    }

    fn component(
        &self,
        tenant: TenantId,
        id: &ComponentId,
    ) -> Result<Option<PerformanceComponent>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .components
            .get(&(tenant.get(), id.as_str().to_string()))
            .cloned())
    }

    fn components(
        &self,
        tenant: TenantId,
        fiscal_year: &FiscalYearId,
    ) -> Result<Vec<PerformanceComponent>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .components
            .values()
            .filter(|component| {
                component.tenant_id == tenant && component.fiscal_year_id == *fiscal_year
            })
            .cloned()
            .collect())
    }

    fn delete_component(&self, tenant: TenantId, id: &ComponentId) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves
            .components
            .remove(&(tenant.get(), id.as_str().to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("component {id} for tenant {tenant}")))
    }

    fn put_kpi(&self, kpi: &Kpi) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves
            .kpis
            .insert((kpi.tenant_id.get(), kpi.id.as_str().to_string()), kpi.clone());
        Ok(())
    }

    fn kpi(&self, tenant: TenantId, id: &KpiId) -> Result<Option<Kpi>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .kpis
            .get(&(tenant.get(), id.as_str().to_string()))
            .cloned())
    }

    fn kpis(&self, tenant: TenantId, fiscal_year: &FiscalYearId) -> Result<Vec<Kpi>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .kpis
            .values()
            .filter(|kpi| kpi.tenant_id == tenant && kpi.fiscal_year_id == *fiscal_year)
            .cloned()
            .collect())
    }

    fn delete_kpi(&self, tenant: TenantId, id: &KpiId) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves
            .kpis
            .remove(&(tenant.get(), id.as_str().to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("kpi {id} for tenant {tenant}")))
    }

    fn put_objective(&self, objective: &KpiObjective) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves.objectives.insert(
            (objective.tenant_id.get(), objective.id.as_str().to_string()),
            objective.clone(),
        );
        Ok(())
    }

    fn objective(
        &self,
        tenant: TenantId,
        id: &ObjectiveId,
    ) -> Result<Option<KpiObjective>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .objectives
            .get(&(tenant.get(), id.as_str().to_string()))
            .cloned())
    }

    fn objectives(&self, tenant: TenantId, kpi: &KpiId) -> Result<Vec<KpiObjective>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .objectives
            .values()
            .filter(|objective| objective.tenant_id == tenant && objective.kpi_id == *kpi)
            .cloned()
            .collect())
    }

    fn delete_objective(&self, tenant: TenantId, id: &ObjectiveId) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves
            .objectives
            .remove(&(tenant.get(), id.as_str().to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("objective {id} for tenant {tenant}")))
    }

    fn insert_confirmation(&self, confirmation: &StructureConfirmation) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        let key = (
            confirmation.tenant_id.get(),
            confirmation.fiscal_year_id.as_str().to_string(),
        );
        if shelves.confirmations.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "fiscal year {} already confirmed",
                confirmation.fiscal_year_id
            )));
        }
        shelves.confirmations.insert(key, confirmation.clone());
        Ok(())
    }

    fn confirmation(
        &self,
        tenant: TenantId,
        fiscal_year: &FiscalYearId,
    ) -> Result<Option<StructureConfirmation>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .confirmations
            .get(&(tenant.get(), fiscal_year.as_str().to_string()))
            .cloned())
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}
