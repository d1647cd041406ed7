// crates/cascade-core/src/core/confirmation.rs
// ============================================================================
// Module: Cascade Structure Confirmation Model
// Description: Lock-in records freezing a fiscal year's org structure.
// Purpose: Record what was confirmed, when, and the digest that proves it.
// Dependencies: crate::core::{hashing, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Confirming a fiscal year's structure is the explicit lock-in step that
//! flips the year from `draft` to `active`. The confirmation row stores a
//! canonical-JSON digest of the confirmed unit set so later reads can
//! detect drift: a structure that no longer hashes to the stored digest was
//! mutated after lock-in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::HashDigest;
use crate::core::identifiers::ConfirmationId;
use crate::core::identifiers::FiscalYearId;
use crate::core::identifiers::OrgUnitId;
use crate::core::identifiers::TenantId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Structure Confirmation
// ============================================================================

/// Structure confirmation record.
///
/// # Invariants
/// - At most one confirmation exists per tenant and fiscal year.
/// - `structure_hash` is the canonical digest of the confirmed unit set,
///   sorted by unit identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureConfirmation {
    /// Confirmation identifier.
    pub id: ConfirmationId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Confirmed fiscal year.
    pub fiscal_year_id: FiscalYearId,
    /// Canonical digest of the confirmed unit set.
    pub structure_hash: HashDigest,
    /// Number of units in the confirmed structure.
    pub unit_count: usize,
    /// Root unit of the confirmed tree.
    pub root_unit_id: OrgUnitId,
    /// Confirmation time, supplied by the caller.
    pub confirmed_at: Timestamp,
}
