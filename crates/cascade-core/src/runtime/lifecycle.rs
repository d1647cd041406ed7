// crates/cascade-core/src/runtime/lifecycle.rs
// ============================================================================
// Module: Cascade Fiscal Year Lifecycle
// Description: Forward-only fiscal year status transitions.
// Purpose: Guard status changes outside the confirmation path.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Fiscal year status moves forward only: `draft -> active -> locked ->
//! archived`. Activation is reserved for the confirmation path
//! ([`crate::runtime::structure::confirm_structure`]); this module guards
//! every other transition and persists the accepted ones.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::FiscalYear;
use crate::core::FiscalYearId;
use crate::core::FiscalYearStatus;
use crate::core::TenantId;
use crate::interfaces::DirectoryStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Transition Rules
// ============================================================================

/// Returns true when `from -> to` is a legal forward transition.
#[must_use]
pub const fn can_transition(from: FiscalYearStatus, to: FiscalYearStatus) -> bool {
    matches!(
        (from, to),
        (FiscalYearStatus::Draft, FiscalYearStatus::Active)
            | (FiscalYearStatus::Active, FiscalYearStatus::Locked)
            | (FiscalYearStatus::Locked, FiscalYearStatus::Archived)
    )
}

// ============================================================================
// SECTION: Lifecycle Errors
// ============================================================================

/// Fiscal year transition errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Fiscal year does not exist.
    #[error("fiscal year not found: {fiscal_year} for tenant {tenant}")]
    FiscalYearMissing {
        /// Tenant queried.
        tenant: TenantId,
        /// Missing fiscal year.
        fiscal_year: FiscalYearId,
    },
    /// Requested transition is not a legal forward move.
    #[error("illegal fiscal year transition {} -> {}", .from.as_str(), .to.as_str())]
    InvalidTransition {
        /// Current status.
        from: FiscalYearStatus,
        /// Requested status.
        to: FiscalYearStatus,
    },
    /// Activation must go through structure confirmation.
    #[error("fiscal year {fiscal_year} activates only through structure confirmation")]
    ConfirmationRequired {
        /// Fiscal year whose activation was requested directly.
        fiscal_year: FiscalYearId,
    },
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Transition
// ============================================================================

/// Applies a lifecycle transition to a fiscal year and persists it.
///
/// # Errors
///
/// Returns [`LifecycleError`] when the year is missing, the transition is
/// illegal, activation is requested directly, or the store fails.
pub fn transition_fiscal_year(
    store: &dyn DirectoryStore,
    tenant: TenantId,
    fiscal_year_id: &FiscalYearId,
    to: FiscalYearStatus,
) -> Result<FiscalYear, LifecycleError> {
    let fiscal_year = store.fiscal_year(tenant, fiscal_year_id)?.ok_or_else(|| {
        LifecycleError::FiscalYearMissing {
            tenant,
            fiscal_year: fiscal_year_id.clone(),
        }
    })?;
    if to == FiscalYearStatus::Active {
        return Err(LifecycleError::ConfirmationRequired {
            fiscal_year: fiscal_year_id.clone(),
        });
    }
    if !can_transition(fiscal_year.status, to) {
        return Err(LifecycleError::InvalidTransition {
            from: fiscal_year.status,
            to,
        });
    }
    store.set_fiscal_year_status(tenant, fiscal_year_id, to)?;
    Ok(FiscalYear {
        status: to,
        ..fiscal_year
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::can_transition;
    use crate::core::FiscalYearStatus;

    #[test]
    fn forward_moves_are_legal() {
        assert!(can_transition(FiscalYearStatus::Draft, FiscalYearStatus::Active));
        assert!(can_transition(FiscalYearStatus::Active, FiscalYearStatus::Locked));
        assert!(can_transition(FiscalYearStatus::Locked, FiscalYearStatus::Archived));
    }

    #[test]
    fn backward_and_skip_moves_are_illegal() {
        assert!(!can_transition(FiscalYearStatus::Active, FiscalYearStatus::Draft));
        assert!(!can_transition(FiscalYearStatus::Draft, FiscalYearStatus::Locked));
        assert!(!can_transition(FiscalYearStatus::Draft, FiscalYearStatus::Archived));
        assert!(!can_transition(FiscalYearStatus::Archived, FiscalYearStatus::Locked));
        assert!(!can_transition(FiscalYearStatus::Locked, FiscalYearStatus::Locked));
    }
}
