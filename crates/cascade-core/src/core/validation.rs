// crates/cascade-core/src/core/validation.rs
// ============================================================================
// Module: Cascade Entity Validation
// Description: Shared field limits and validation errors for directory entities.
// Purpose: Enforce construction-boundary invariants before records are stored.
// Dependencies: crate::core::{component, identifiers}, thiserror
// ============================================================================

//! ## Overview
//! Every directory entity exposes `validate()` returning
//! [`ValidationError`] on the first violated field invariant. Validation is
//! fail-closed: entities that do not validate must never reach a store.
//! Limits are deliberately generous; they bound storage and wire payloads,
//! not business semantics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::component::ComponentKind;
use crate::core::identifiers::ComponentId;

// ============================================================================
// SECTION: Field Limits
// ============================================================================

/// Maximum length of any string identifier.
pub const MAX_ID_LENGTH: usize = 128;
/// Maximum length of entity names and labels.
pub const MAX_NAME_LENGTH: usize = 256;
/// Maximum length of free-form description fields.
pub const MAX_DESCRIPTION_LENGTH: usize = 2_048;
/// Maximum objective weight (inclusive, percent).
pub const MAX_OBJECTIVE_WEIGHT: u32 = 100;

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Entity field validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `entity`/`field` labels are stable snake_case names matching wire forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required string field is empty.
    #[error("{entity}.{field} must not be empty")]
    EmptyField {
        /// Entity label.
        entity: &'static str,
        /// Field label.
        field: &'static str,
    },
    /// A string field exceeds its length cap.
    #[error("{entity}.{field} exceeds {max} bytes")]
    FieldTooLong {
        /// Entity label.
        entity: &'static str,
        /// Field label.
        field: &'static str,
        /// Maximum permitted length in bytes.
        max: usize,
    },
    /// A decimal-valued field failed to parse.
    #[error("{entity}.{field} is not a decimal value: {value}")]
    BadDecimal {
        /// Entity label.
        entity: &'static str,
        /// Field label.
        field: &'static str,
        /// Offending raw value.
        value: String,
    },
    /// A timestamp field failed to parse as RFC 3339.
    #[error("{entity}.{field} is not an rfc3339 timestamp: {value}")]
    BadTimestamp {
        /// Entity label.
        entity: &'static str,
        /// Field label.
        field: &'static str,
        /// Offending raw value.
        value: String,
    },
    /// Fiscal year bounds are not strictly ordered.
    #[error("fiscal_year.starts_at must precede ends_at ({starts_at} >= {ends_at})")]
    BoundsNotOrdered {
        /// Raw start bound.
        starts_at: String,
        /// Raw end bound.
        ends_at: String,
    },
    /// Objective weight is outside `0..=100`.
    #[error("objective.weight {value} is outside 0..=100")]
    WeightOutOfRange {
        /// Offending weight.
        value: u32,
    },
    /// Hierarchy level rank is zero (ranks are 1-based).
    #[error("level_definition.hierarchy_level must be >= 1")]
    ZeroHierarchyLevel,
    /// Component kind requires a source KPI link.
    #[error("component {component} of kind {kind} requires source_kpi_id")]
    SourceKpiRequired {
        /// Offending component.
        component: ComponentId,
        /// Component kind.
        kind: ComponentKind,
    },
    /// Component kind forbids a source KPI link.
    #[error("component {component} of kind {kind} must not carry source_kpi_id")]
    SourceKpiForbidden {
        /// Offending component.
        component: ComponentId,
        /// Component kind.
        kind: ComponentKind,
    },
}

// ============================================================================
// SECTION: Field Helpers
// ============================================================================

/// Checks a required string field against emptiness and a length cap.
///
/// # Errors
///
/// Returns [`ValidationError`] when the field is empty or too long.
pub(crate) fn require_bounded(
    entity: &'static str,
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    if value.len() > max {
        return Err(ValidationError::FieldTooLong { entity, field, max });
    }
    Ok(())
}

/// Checks an optional string field against a length cap.
///
/// # Errors
///
/// Returns [`ValidationError`] when the field is present and too long.
pub(crate) fn bounded_optional(
    entity: &'static str,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(value) if value.len() > max => {
            Err(ValidationError::FieldTooLong { entity, field, max })
        }
        _ => Ok(()),
    }
}
