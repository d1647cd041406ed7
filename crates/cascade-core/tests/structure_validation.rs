// crates/cascade-core/tests/structure_validation.rs
// ============================================================================
// Module: Structure Validation Unit Tests
// Description: Orphan, cycle, root, duplicate, and level checks.
// Purpose: Validate org-structure reports under adversarial unit sets.
// ============================================================================

//! Structure validation tests for orphan, cycle, and root handling.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use cascade_core::LevelDefinition;
use cascade_core::LevelId;
use cascade_core::OrgUnit;
use cascade_core::OrgUnitId;
use cascade_core::TenantId;
use cascade_core::runtime::StructureViolation;
use cascade_core::runtime::validate_structure;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

fn tenant() -> TenantId {
    TenantId::from_raw(7).unwrap()
}

fn unit(id: &str, parent: Option<&str>) -> OrgUnit {
    OrgUnit {
        id: OrgUnitId::new(id),
        tenant_id: tenant(),
        fiscal_year_id: "fy-2026".into(),
        name: format!("unit {id}"),
        level_id: None,
        parent_id: parent.map(OrgUnitId::new),
        active: true,
    }
}

fn leveled_unit(id: &str, parent: Option<&str>, level: &str) -> OrgUnit {
    let mut unit = unit(id, parent);
    unit.level_id = Some(LevelId::new(level));
    unit
}

fn level(id: &str, rank: u32) -> LevelDefinition {
    LevelDefinition {
        id: LevelId::new(id),
        tenant_id: tenant(),
        name: format!("level {id}"),
        hierarchy_level: rank,
    }
}

// ============================================================================
// SECTION: Valid Structures
// ============================================================================

#[test]
fn valid_tree_produces_clean_report() {
    let units = vec![
        unit("org", None),
        unit("sales", Some("org")),
        unit("support", Some("org")),
        unit("emea", Some("sales")),
    ];
    let report = validate_structure(&units, &[]);
    assert!(report.is_valid());
    assert_eq!(report.unit_count, 4);
    assert_eq!(report.root_count, 1);
    assert_eq!(report.max_depth, 2);
}

#[test]
fn single_unit_is_a_valid_tree() {
    let report = validate_structure(&[unit("org", None)], &[]);
    assert!(report.is_valid());
    assert_eq!(report.max_depth, 0);
}

#[test]
fn leveled_tree_with_descending_ranks_is_valid() {
    let units = vec![
        leveled_unit("org", None, "lvl-org"),
        leveled_unit("dept", Some("org"), "lvl-dept"),
        leveled_unit("team", Some("dept"), "lvl-team"),
    ];
    let levels = vec![level("lvl-org", 1), level("lvl-dept", 2), level("lvl-team", 3)];
    let report = validate_structure(&units, &levels);
    assert!(report.is_valid());
}

// ============================================================================
// SECTION: Violations
// ============================================================================

#[test]
fn empty_unit_set_is_invalid() {
    let report = validate_structure(&[], &[]);
    assert_eq!(report.violations, vec![StructureViolation::NoUnits]);
    assert_eq!(report.unit_count, 0);
}

#[test]
fn orphaned_parent_reference_is_reported() {
    let units = vec![unit("org", None), unit("ghost-child", Some("ghost"))];
    let report = validate_structure(&units, &[]);
    assert!(report.violations.contains(&StructureViolation::OrphanedUnit {
        unit: OrgUnitId::new("ghost-child"),
        parent: OrgUnitId::new("ghost"),
    }));
}

#[test]
fn two_node_cycle_is_reported_for_every_member() {
    let units = vec![unit("org", None), unit("a", Some("b")), unit("b", Some("a"))];
    let report = validate_structure(&units, &[]);
    assert!(!report.is_valid());
    assert!(report.violations.contains(&StructureViolation::CircularReference {
        unit: OrgUnitId::new("a"),
    }));
    assert!(report.violations.contains(&StructureViolation::CircularReference {
        unit: OrgUnitId::new("b"),
    }));
}

#[test]
fn self_parenting_is_a_cycle() {
    let units = vec![unit("org", None), unit("loop", Some("loop"))];
    let report = validate_structure(&units, &[]);
    assert!(report.violations.contains(&StructureViolation::CircularReference {
        unit: OrgUnitId::new("loop"),
    }));
}

#[test]
fn unit_below_a_cycle_is_also_reported() {
    let units = vec![
        unit("org", None),
        unit("a", Some("b")),
        unit("b", Some("a")),
        unit("child", Some("a")),
    ];
    let report = validate_structure(&units, &[]);
    assert!(report.violations.contains(&StructureViolation::CircularReference {
        unit: OrgUnitId::new("child"),
    }));
}

#[test]
fn missing_root_is_reported() {
    let units = vec![unit("a", Some("b")), unit("b", Some("a"))];
    let report = validate_structure(&units, &[]);
    assert!(report.violations.contains(&StructureViolation::NoRoot));
    assert_eq!(report.root_count, 0);
}

#[test]
fn multiple_roots_are_reported_sorted() {
    let units = vec![unit("zeta", None), unit("alpha", None), unit("child", Some("alpha"))];
    let report = validate_structure(&units, &[]);
    assert!(report.violations.contains(&StructureViolation::MultipleRoots {
        roots: vec![OrgUnitId::new("alpha"), OrgUnitId::new("zeta")],
    }));
    assert_eq!(report.root_count, 2);
}

#[test]
fn duplicate_unit_ids_are_reported() {
    let units = vec![unit("org", None), unit("dup", Some("org")), unit("dup", Some("org"))];
    let report = validate_structure(&units, &[]);
    assert!(report.violations.contains(&StructureViolation::DuplicateUnit {
        unit: OrgUnitId::new("dup"),
    }));
}

#[test]
fn unknown_level_reference_is_reported() {
    let units = vec![unit("org", None), leveled_unit("dept", Some("org"), "missing")];
    let report = validate_structure(&units, &[level("lvl-org", 1)]);
    assert!(report.violations.contains(&StructureViolation::UnknownLevel {
        unit: OrgUnitId::new("dept"),
        level: LevelId::new("missing"),
    }));
}

#[test]
fn level_inversion_is_reported() {
    let units = vec![
        leveled_unit("org", None, "lvl-dept"),
        leveled_unit("dept", Some("org"), "lvl-org"),
    ];
    let levels = vec![level("lvl-org", 1), level("lvl-dept", 2)];
    let report = validate_structure(&units, &levels);
    assert!(report.violations.contains(&StructureViolation::LevelInversion {
        unit: OrgUnitId::new("dept"),
        parent: OrgUnitId::new("org"),
        unit_level: 1,
        parent_level: 2,
    }));
}

#[test]
fn equal_level_ranks_are_an_inversion() {
    let units = vec![
        leveled_unit("org", None, "lvl-org"),
        leveled_unit("peer", Some("org"), "lvl-org"),
    ];
    let report = validate_structure(&units, &[level("lvl-org", 1)]);
    assert!(!report.is_valid());
}

// ============================================================================
// SECTION: Summaries
// ============================================================================

#[test]
fn summary_names_affected_units_once() {
    let units = vec![
        unit("org", None),
        unit("a", Some("b")),
        unit("b", Some("a")),
        unit("ghost-child", Some("ghost")),
    ];
    let summary = validate_structure(&units, &[]).summary();
    assert_eq!(summary.status, "invalid");
    assert!(!summary.violations.is_empty());
    assert!(summary.remediation_hint.is_some());
    let mut deduped = summary.affected_units.clone();
    deduped.dedup();
    assert_eq!(deduped, summary.affected_units);
}

#[test]
fn summary_of_valid_structure_is_clean() {
    let summary = validate_structure(&[unit("org", None)], &[]).summary();
    assert_eq!(summary.status, "valid");
    assert!(summary.violations.is_empty());
    assert!(summary.remediation_hint.is_none());
}
