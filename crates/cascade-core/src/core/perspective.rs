// crates/cascade-core/src/core/perspective.rs
// ============================================================================
// Module: Cascade Perspective Model
// Description: Perspective classification records.
// Purpose: Categorize KPIs under top-level strategic perspectives.
// Dependencies: crate::core::{identifiers, validation}, serde
// ============================================================================

//! ## Overview
//! Perspectives are tenant-scoped top-level categories (Financial, Customer,
//! Internal Process, Learning & Growth in the classic balanced scorecard).
//! Cascaded KPIs do not carry their own perspective; they inherit it from
//! the root organizational KPI reached through the component chain, see
//! [`crate::runtime::resolver`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::PerspectiveId;
use crate::core::identifiers::TenantId;
use crate::core::validation::MAX_DESCRIPTION_LENGTH;
use crate::core::validation::MAX_ID_LENGTH;
use crate::core::validation::MAX_NAME_LENGTH;
use crate::core::validation::ValidationError;
use crate::core::validation::bounded_optional;
use crate::core::validation::require_bounded;

// ============================================================================
// SECTION: Perspective
// ============================================================================

/// Perspective directory record.
///
/// # Invariants
/// - `name` is unique per tenant by convention; the store does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    /// Perspective identifier.
    pub id: PerspectiveId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Perspective name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
}

impl Perspective {
    /// Validates field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_bounded("perspective", "id", self.id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("perspective", "name", &self.name, MAX_NAME_LENGTH)?;
        bounded_optional(
            "perspective",
            "description",
            self.description.as_deref(),
            MAX_DESCRIPTION_LENGTH,
        )?;
        Ok(())
    }
}
