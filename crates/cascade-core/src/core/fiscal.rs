// crates/cascade-core/src/core/fiscal.rs
// ============================================================================
// Module: Cascade Fiscal Year Model
// Description: Fiscal year records and lifecycle status.
// Purpose: Anchor org structures and performance cascades to a planning period.
// Dependencies: crate::core::{identifiers, validation}, serde, time
// ============================================================================

//! ## Overview
//! A fiscal year is the planning period all org units, components, and KPIs
//! hang off. Its status drives the structure lock-in workflow: structures
//! are editable while `draft`, frozen by confirmation into `active`, then
//! moved forward to `locked` and `archived`. Status transitions are
//! forward-only and enforced by [`crate::runtime::lifecycle`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::identifiers::FiscalYearId;
use crate::core::identifiers::TenantId;
use crate::core::validation::MAX_ID_LENGTH;
use crate::core::validation::MAX_NAME_LENGTH;
use crate::core::validation::ValidationError;
use crate::core::validation::require_bounded;

// ============================================================================
// SECTION: Fiscal Year Status
// ============================================================================

/// Fiscal year lifecycle status.
///
/// # Invariants
/// - Variants are stable for serialization and transition checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiscalYearStatus {
    /// Structure and cascade configuration are editable.
    Draft,
    /// Structure is confirmed; performance data flows.
    Active,
    /// Period closed for edits; data retained for reporting.
    Locked,
    /// Period archived; read-only history.
    Archived,
}

impl FiscalYearStatus {
    /// Returns the stable label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Locked => "locked",
            Self::Archived => "archived",
        }
    }
}

// ============================================================================
// SECTION: Fiscal Year
// ============================================================================

/// Fiscal year directory record.
///
/// # Invariants
/// - `starts_at` and `ends_at` are RFC 3339 timestamps with `starts_at < ends_at`.
/// - `status` only changes through confirmation or lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Fiscal year identifier.
    pub id: FiscalYearId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Human-readable label (e.g. "FY 2026/27").
    pub label: String,
    /// Period start, RFC 3339.
    pub starts_at: String,
    /// Period end, RFC 3339.
    pub ends_at: String,
    /// Lifecycle status.
    pub status: FiscalYearStatus,
}

impl FiscalYear {
    /// Validates field invariants, including bound ordering.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_bounded("fiscal_year", "id", self.id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("fiscal_year", "label", &self.label, MAX_NAME_LENGTH)?;
        let starts = parse_bound("starts_at", &self.starts_at)?;
        let ends = parse_bound("ends_at", &self.ends_at)?;
        if starts >= ends {
            return Err(ValidationError::BoundsNotOrdered {
                starts_at: self.starts_at.clone(),
                ends_at: self.ends_at.clone(),
            });
        }
        Ok(())
    }
}

/// Parses one RFC 3339 period bound.
fn parse_bound(field: &'static str, value: &str) -> Result<OffsetDateTime, ValidationError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| ValidationError::BadTimestamp {
        entity: "fiscal_year",
        field,
        value: value.to_string(),
    })
}
