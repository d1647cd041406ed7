// crates/cascade-core/src/core/org.rs
// ============================================================================
// Module: Cascade Org Structure Model
// Description: Level definitions and org unit tree records.
// Purpose: Model the per-fiscal-year organizational hierarchy.
// Dependencies: crate::core::{identifiers, validation}, serde
// ============================================================================

//! ## Overview
//! Org units form a rooted tree per tenant and fiscal year via `parent_id`.
//! Level definitions rank units by depth (1 = organization root level);
//! leveling is advisory and a unit set may omit level references entirely.
//! Tree-shape invariants (single root, no orphans, no cycles) are enforced
//! by [`crate::runtime::structure`], not by per-record validation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::FiscalYearId;
use crate::core::identifiers::LevelId;
use crate::core::identifiers::OrgUnitId;
use crate::core::identifiers::TenantId;
use crate::core::validation::MAX_ID_LENGTH;
use crate::core::validation::MAX_NAME_LENGTH;
use crate::core::validation::ValidationError;
use crate::core::validation::require_bounded;

// ============================================================================
// SECTION: Level Definition
// ============================================================================

/// Hierarchy level definition (organization, department, team, individual).
///
/// # Invariants
/// - `hierarchy_level` is 1-based; 1 is the organization root level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Level identifier.
    pub id: LevelId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Level name.
    pub name: String,
    /// 1-based depth rank.
    pub hierarchy_level: u32,
}

impl LevelDefinition {
    /// Validates field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_bounded("level_definition", "id", self.id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("level_definition", "name", &self.name, MAX_NAME_LENGTH)?;
        if self.hierarchy_level == 0 {
            return Err(ValidationError::ZeroHierarchyLevel);
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Org Unit
// ============================================================================

/// Org unit tree node.
///
/// # Invariants
/// - `parent_id == None` marks the tree root; exactly one root is required
///   for a confirmable structure.
/// - `level_id` is optional; when present it must reference a known level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnit {
    /// Org unit identifier.
    pub id: OrgUnitId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning fiscal year.
    pub fiscal_year_id: FiscalYearId,
    /// Unit name.
    pub name: String,
    /// Optional level reference.
    pub level_id: Option<LevelId>,
    /// Optional parent unit; `None` marks the root.
    pub parent_id: Option<OrgUnitId>,
    /// Whether the unit is active.
    pub active: bool,
}

impl OrgUnit {
    /// Validates field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_bounded("org_unit", "id", self.id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("org_unit", "fiscal_year_id", self.fiscal_year_id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("org_unit", "name", &self.name, MAX_NAME_LENGTH)?;
        Ok(())
    }
}
