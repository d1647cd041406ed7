// crates/cascade-core/src/core/kpi.rs
// ============================================================================
// Module: Cascade KPI Model
// Description: KPI and KPI objective records.
// Purpose: Model measurable indicators and their weighted objectives.
// Dependencies: crate::core::{identifiers, validation}, bigdecimal, serde
// ============================================================================

//! ## Overview
//! A KPI is *organizational* when `component_id` is `None` (it sits directly
//! on an org unit and may carry its own perspective) and *cascaded* when it
//! derives from a performance component (its effective perspective is
//! inherited through the chain, see [`crate::runtime::resolver`]).
//! Baseline and target values are decimal strings; decimal parsing happens
//! once at validation and again inside attainment math, both fail-closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ComponentId;
use crate::core::identifiers::FiscalYearId;
use crate::core::identifiers::KpiId;
use crate::core::identifiers::ObjectiveId;
use crate::core::identifiers::OrgUnitId;
use crate::core::identifiers::PerspectiveId;
use crate::core::identifiers::TenantId;
use crate::core::validation::MAX_DESCRIPTION_LENGTH;
use crate::core::validation::MAX_ID_LENGTH;
use crate::core::validation::MAX_NAME_LENGTH;
use crate::core::validation::MAX_OBJECTIVE_WEIGHT;
use crate::core::validation::ValidationError;
use crate::core::validation::require_bounded;

// ============================================================================
// SECTION: KPI Direction
// ============================================================================

/// Direction of improvement for a KPI.
///
/// # Invariants
/// - Variants are stable for serialization and attainment evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiDirection {
    /// Larger actual values are better (revenue, NPS).
    HigherIsBetter,
    /// Smaller actual values are better (churn, defect rate).
    LowerIsBetter,
}

impl KpiDirection {
    /// Returns the stable label for the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HigherIsBetter => "higher_is_better",
            Self::LowerIsBetter => "lower_is_better",
        }
    }
}

impl fmt::Display for KpiDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: KPI
// ============================================================================

/// KPI directory record.
///
/// # Invariants
/// - `baseline` and `target` parse as decimals.
/// - `component_id == None` marks an organizational (root-capable) KPI.
/// - `perspective_id` is meaningful only on organizational KPIs; cascaded
///   KPIs inherit their perspective through the component chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
    /// KPI identifier.
    pub id: KpiId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning fiscal year.
    pub fiscal_year_id: FiscalYearId,
    /// Optional org unit the KPI measures.
    pub org_unit_id: Option<OrgUnitId>,
    /// Optional component the KPI derives from.
    pub component_id: Option<ComponentId>,
    /// Optional perspective classification.
    pub perspective_id: Option<PerspectiveId>,
    /// KPI name.
    pub name: String,
    /// Measurement unit label (e.g. "%", "EUR", "days").
    pub unit: String,
    /// Direction of improvement.
    pub direction: KpiDirection,
    /// Baseline value, decimal string.
    pub baseline: String,
    /// Target value, decimal string.
    pub target: String,
}

impl Kpi {
    /// Validates field invariants, including decimal parses.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_bounded("kpi", "id", self.id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("kpi", "fiscal_year_id", self.fiscal_year_id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("kpi", "name", &self.name, MAX_NAME_LENGTH)?;
        require_bounded("kpi", "unit", &self.unit, MAX_NAME_LENGTH)?;
        parse_decimal("baseline", &self.baseline)?;
        parse_decimal("target", &self.target)?;
        Ok(())
    }

    /// Returns true when the KPI is organizational (no component link).
    #[must_use]
    pub const fn is_organizational(&self) -> bool {
        self.component_id.is_none()
    }
}

/// Parses one decimal-valued KPI field.
fn parse_decimal(field: &'static str, value: &str) -> Result<BigDecimal, ValidationError> {
    BigDecimal::from_str(value).map_err(|_| ValidationError::BadDecimal {
        entity: "kpi",
        field,
        value: value.to_string(),
    })
}

// ============================================================================
// SECTION: KPI Objective
// ============================================================================

/// Weighted objective attached to a KPI.
///
/// # Invariants
/// - `weight` is a percentage in `0..=100`; weights across a KPI are not
///   required to sum to 100 (partial configurations are legal in draft).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiObjective {
    /// Objective identifier.
    pub id: ObjectiveId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning KPI.
    pub kpi_id: KpiId,
    /// Objective description.
    pub description: String,
    /// Weight percentage in `0..=100`.
    pub weight: u32,
}

impl KpiObjective {
    /// Validates field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_bounded("objective", "id", self.id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("objective", "kpi_id", self.kpi_id.as_str(), MAX_ID_LENGTH)?;
        require_bounded("objective", "description", &self.description, MAX_DESCRIPTION_LENGTH)?;
        if self.weight > MAX_OBJECTIVE_WEIGHT {
            return Err(ValidationError::WeightOutOfRange { value: self.weight });
        }
        Ok(())
    }
}
