// crates/cascade-core/src/core/tenant.rs
// ============================================================================
// Module: Cascade Tenant Model
// Description: Tenant directory records.
// Purpose: Scope every other directory record under a tenant.
// Dependencies: crate::core::{identifiers, validation}, serde
// ============================================================================

//! ## Overview
//! Tenants are the outermost scoping record. Row-level access enforcement is
//! out of scope for the core; tenants exist so every lookup is explicitly
//! keyed and cross-tenant reads are unrepresentable at the interface level.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::TenantId;
use crate::core::validation::MAX_NAME_LENGTH;
use crate::core::validation::ValidationError;
use crate::core::validation::require_bounded;

// ============================================================================
// SECTION: Tenant
// ============================================================================

/// Tenant directory record.
///
/// # Invariants
/// - `name` is a short machine-friendly handle; `display_name` is free-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant identifier.
    pub id: TenantId,
    /// Machine-friendly tenant handle.
    pub name: String,
    /// Human-readable tenant name.
    pub display_name: String,
    /// Whether the tenant is active.
    pub active: bool,
}

impl Tenant {
    /// Validates field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_bounded("tenant", "name", &self.name, MAX_NAME_LENGTH)?;
        require_bounded("tenant", "display_name", &self.display_name, MAX_NAME_LENGTH)?;
        Ok(())
    }
}
