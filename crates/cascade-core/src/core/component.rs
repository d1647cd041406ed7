// crates/cascade-core/src/core/component.rs
// ============================================================================
// Module: Cascade Performance Component Model
// Description: Typed cascade nodes linking org levels.
// Purpose: Carry performance expectations from one org level to the next.
// Dependencies: crate::core::{identifiers, validation}, serde
// ============================================================================

//! ## Overview
//! Performance components cascade expectations between org levels. A
//! component of kind `kpi` derives from a source KPI one level up; walking
//! `component -> source KPI -> component -> ...` backwards reaches the root
//! organizational KPI that anchors the chain. Kind rules are enforced at
//! validation: `kpi` components require the source link, `entry`/`exit`
//! components must not carry one, and `objective`/`target` components may
//! carry one when they refine a cascaded measure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ComponentId;
use crate::core::identifiers::FiscalYearId;
use crate::core::identifiers::KpiId;
use crate::core::identifiers::OrgUnitId;
use crate::core::identifiers::TenantId;
use crate::core::validation::MAX_ID_LENGTH;
use crate::core::validation::MAX_NAME_LENGTH;
use crate::core::validation::ValidationError;
use crate::core::validation::require_bounded;

// ============================================================================
// SECTION: Component Kind
// ============================================================================

/// Performance component kinds.
///
/// # Invariants
/// - Variants are stable for serialization and kind-rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Inbound expectation handed down from the level above.
    Entry,
    /// Outbound commitment handed up to the level above.
    Exit,
    /// Objective grouping node.
    Objective,
    /// Cascaded KPI node; always derives from a source KPI.
    Kpi,
    /// Target refinement node.
    Target,
}

impl ComponentKind {
    /// Returns the stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::Objective => "objective",
            Self::Kpi => "kpi",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Performance Component
// ============================================================================

/// Performance component record.
///
/// # Invariants
/// - `source_kpi_id` is required when `kind == Kpi` and forbidden for
///   `Entry`/`Exit` kinds.
/// - `org_unit_id` names the unit the component belongs to (the receiving
///   level of the cascade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceComponent {
    /// Component identifier.
    pub id: ComponentId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning fiscal year.
    pub fiscal_year_id: FiscalYearId,
    /// Org unit the component belongs to.
    pub org_unit_id: OrgUnitId,
    /// Component kind.
    pub kind: ComponentKind,
    /// Human-readable label.
    pub label: String,
    /// Optional source KPI link (the measure one level up).
    pub source_kpi_id: Option<KpiId>,
}

impl PerformanceComponent {
    /// Validates field invariants, including kind rules.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_bounded("component", "id", self.id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("component", "fiscal_year_id", self.fiscal_year_id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("component", "org_unit_id", self.org_unit_id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("component", "label", &self.label, MAX_NAME_LENGTH)?;
        match (self.kind, &self.source_kpi_id) {
            (ComponentKind::Kpi, None) => Err(ValidationError::SourceKpiRequired {
                component: self.id.clone(),
                kind: self.kind,
            }),
            (ComponentKind::Entry | ComponentKind::Exit, Some(_)) => {
                Err(ValidationError::SourceKpiForbidden {
                    component: self.id.clone(),
                    kind: self.kind,
                })
            }
            _ => Ok(()),
        }
    }
}
