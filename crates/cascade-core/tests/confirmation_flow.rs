// crates/cascade-core/tests/confirmation_flow.rs
// ============================================================================
// Module: Confirmation Flow Unit Tests
// Description: Structure confirmation, idempotency, and lifecycle guards.
// Purpose: Validate the draft -> active lock-in path and its conflicts.
// ============================================================================

//! Confirmation and lifecycle tests over in-memory directory fixtures.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use cascade_core::DirectoryStore;
use cascade_core::FiscalYear;
use cascade_core::FiscalYearId;
use cascade_core::FiscalYearStatus;
use cascade_core::OrgUnit;
use cascade_core::OrgUnitId;
use cascade_core::TenantId;
use cascade_core::Timestamp;
use cascade_core::runtime::ConfirmationError;
use cascade_core::runtime::InMemoryDirectoryStore;
use cascade_core::runtime::LifecycleError;
use cascade_core::runtime::confirm_structure;
use cascade_core::runtime::transition_fiscal_year;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

fn tenant() -> TenantId {
    TenantId::from_raw(11).unwrap()
}

fn fiscal_year_id() -> FiscalYearId {
    FiscalYearId::new("fy-2026")
}

fn fiscal_year(status: FiscalYearStatus) -> FiscalYear {
    FiscalYear {
        id: fiscal_year_id(),
        tenant_id: tenant(),
        label: "FY 2026/27".to_string(),
        starts_at: "2026-07-01T00:00:00Z".to_string(),
        ends_at: "2027-06-30T23:59:59Z".to_string(),
        status,
    }
}

fn unit(id: &str, parent: Option<&str>) -> OrgUnit {
    OrgUnit {
        id: OrgUnitId::new(id),
        tenant_id: tenant(),
        fiscal_year_id: fiscal_year_id(),
        name: format!("unit {id}"),
        level_id: None,
        parent_id: parent.map(OrgUnitId::new),
        active: true,
    }
}

fn draft_store_with_tree() -> InMemoryDirectoryStore {
    let store = InMemoryDirectoryStore::new();
    store.put_fiscal_year(&fiscal_year(FiscalYearStatus::Draft)).unwrap();
    store.put_org_unit(&unit("org", None)).unwrap();
    store.put_org_unit(&unit("sales", Some("org"))).unwrap();
    store.put_org_unit(&unit("support", Some("org"))).unwrap();
    store
}

fn now() -> Timestamp {
    Timestamp::UnixMillis(1_750_000_000_000)
}

// ============================================================================
// SECTION: Confirmation
// ============================================================================

#[test]
fn confirming_valid_draft_activates_the_year() {
    let store = draft_store_with_tree();
    let confirmation = confirm_structure(&store, tenant(), &fiscal_year_id(), now()).unwrap();
    assert_eq!(confirmation.unit_count, 3);
    assert_eq!(confirmation.root_unit_id, OrgUnitId::new("org"));
    assert_eq!(confirmation.confirmed_at, now());

    let year = store.fiscal_year(tenant(), &fiscal_year_id()).unwrap().unwrap();
    assert_eq!(year.status, FiscalYearStatus::Active);
    let stored = store.confirmation(tenant(), &fiscal_year_id()).unwrap().unwrap();
    assert_eq!(stored, confirmation);
}

#[test]
fn invalid_structure_writes_nothing() {
    let store = draft_store_with_tree();
    store.put_org_unit(&unit("orphan", Some("ghost"))).unwrap();
    let err = confirm_structure(&store, tenant(), &fiscal_year_id(), now()).unwrap_err();
    let ConfirmationError::Invalid { report } = err else {
        panic!("expected invalid-structure error");
    };
    assert!(!report.is_valid());

    let year = store.fiscal_year(tenant(), &fiscal_year_id()).unwrap().unwrap();
    assert_eq!(year.status, FiscalYearStatus::Draft);
    assert!(store.confirmation(tenant(), &fiscal_year_id()).unwrap().is_none());
}

#[test]
fn missing_fiscal_year_fails() {
    let store = InMemoryDirectoryStore::new();
    let err = confirm_structure(&store, tenant(), &fiscal_year_id(), now()).unwrap_err();
    assert!(matches!(err, ConfirmationError::FiscalYearMissing { .. }));
}

#[test]
fn reconfirming_unchanged_structure_is_idempotent() {
    let store = draft_store_with_tree();
    let first = confirm_structure(&store, tenant(), &fiscal_year_id(), now()).unwrap();
    let second =
        confirm_structure(&store, tenant(), &fiscal_year_id(), Timestamp::UnixMillis(2)).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.confirmed_at, now());
}

#[test]
fn reconfirming_after_drift_conflicts() {
    let store = draft_store_with_tree();
    confirm_structure(&store, tenant(), &fiscal_year_id(), now()).unwrap();
    store.put_org_unit(&unit("late-addition", Some("org"))).unwrap();
    let err = confirm_structure(&store, tenant(), &fiscal_year_id(), now()).unwrap_err();
    assert!(matches!(
        err,
        ConfirmationError::StatusConflict {
            status: FiscalYearStatus::Active,
            ..
        }
    ));
}

#[test]
fn locked_and_archived_years_cannot_be_confirmed() {
    for status in [FiscalYearStatus::Locked, FiscalYearStatus::Archived] {
        let store = InMemoryDirectoryStore::new();
        store.put_fiscal_year(&fiscal_year(status)).unwrap();
        store.put_org_unit(&unit("org", None)).unwrap();
        let err = confirm_structure(&store, tenant(), &fiscal_year_id(), now()).unwrap_err();
        assert!(matches!(err, ConfirmationError::StatusConflict { .. }));
    }
}

// ============================================================================
// SECTION: Lifecycle Transitions
// ============================================================================

#[test]
fn active_year_locks_and_archives_forward() {
    let store = draft_store_with_tree();
    confirm_structure(&store, tenant(), &fiscal_year_id(), now()).unwrap();

    let locked =
        transition_fiscal_year(&store, tenant(), &fiscal_year_id(), FiscalYearStatus::Locked)
            .unwrap();
    assert_eq!(locked.status, FiscalYearStatus::Locked);

    let archived =
        transition_fiscal_year(&store, tenant(), &fiscal_year_id(), FiscalYearStatus::Archived)
            .unwrap();
    assert_eq!(archived.status, FiscalYearStatus::Archived);
}

#[test]
fn direct_activation_is_refused() {
    let store = draft_store_with_tree();
    let err =
        transition_fiscal_year(&store, tenant(), &fiscal_year_id(), FiscalYearStatus::Active)
            .unwrap_err();
    assert!(matches!(err, LifecycleError::ConfirmationRequired { .. }));
}

#[test]
fn skipping_statuses_is_refused() {
    let store = draft_store_with_tree();
    let err =
        transition_fiscal_year(&store, tenant(), &fiscal_year_id(), FiscalYearStatus::Archived)
            .unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::InvalidTransition {
            from: FiscalYearStatus::Draft,
            to: FiscalYearStatus::Archived,
        }
    ));
}

#[test]
fn transition_of_missing_year_is_refused() {
    let store = InMemoryDirectoryStore::new();
    let err =
        transition_fiscal_year(&store, tenant(), &fiscal_year_id(), FiscalYearStatus::Locked)
            .unwrap_err();
    assert!(matches!(err, LifecycleError::FiscalYearMissing { .. }));
}
