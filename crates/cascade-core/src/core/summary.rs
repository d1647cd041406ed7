// crates/cascade-core/src/core/summary.rs
// ============================================================================
// Module: Cascade Validation Summaries
// Description: Client-safe summaries of structure validation outcomes.
// Purpose: Communicate lock-in readiness without leaking internal state.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! Validation summaries are the client-facing rendering of a structure
//! report: a status string, the offending unit identifiers, and rendered
//! violation messages. They carry no store internals and are safe to embed
//! in HTTP error bodies verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::OrgUnitId;

// ============================================================================
// SECTION: Validation Summary
// ============================================================================

/// Client-safe summary of a structure validation outcome.
///
/// # Invariants
/// - `violations` holds rendered, human-readable messages only.
/// - `affected_units` is deduplicated and sorted for stable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Summary status string (`valid` or `invalid`).
    pub status: String,
    /// Rendered violation messages.
    pub violations: Vec<String>,
    /// Units named by at least one violation.
    pub affected_units: Vec<OrgUnitId>,
    /// Optional remediation guidance.
    pub remediation_hint: Option<String>,
}

impl ValidationSummary {
    /// Creates a summary with the provided status and violations.
    #[must_use]
    pub fn new(status: impl Into<String>, violations: Vec<String>) -> Self {
        Self {
            status: status.into(),
            violations,
            affected_units: Vec::new(),
            remediation_hint: None,
        }
    }
}
