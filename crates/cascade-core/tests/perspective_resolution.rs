// crates/cascade-core/tests/perspective_resolution.rs
// ============================================================================
// Module: Perspective Resolution Unit Tests
// Description: Backward chain walks from cascaded KPIs to root perspectives.
// Purpose: Validate resolver success paths and every failure mode.
// ============================================================================

//! Perspective resolver tests over in-memory directory fixtures.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use cascade_core::ComponentId;
use cascade_core::ComponentKind;
use cascade_core::DirectoryStore;
use cascade_core::Kpi;
use cascade_core::KpiDirection;
use cascade_core::KpiId;
use cascade_core::OrgUnitId;
use cascade_core::PerformanceComponent;
use cascade_core::Perspective;
use cascade_core::PerspectiveId;
use cascade_core::TenantId;
use cascade_core::runtime::InMemoryDirectoryStore;
use cascade_core::runtime::MAX_RESOLUTION_DEPTH;
use cascade_core::runtime::ResolutionError;
use cascade_core::runtime::resolve_perspective;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

fn tenant() -> TenantId {
    TenantId::from_raw(3).unwrap()
}

fn kpi(id: &str, component: Option<&str>, perspective: Option<&str>) -> Kpi {
    Kpi {
        id: KpiId::new(id),
        tenant_id: tenant(),
        fiscal_year_id: "fy-2026".into(),
        org_unit_id: Some(OrgUnitId::new("org")),
        component_id: component.map(ComponentId::new),
        perspective_id: perspective.map(PerspectiveId::new),
        name: format!("kpi {id}"),
        unit: "%".to_string(),
        direction: KpiDirection::HigherIsBetter,
        baseline: "0".to_string(),
        target: "100".to_string(),
    }
}

fn component(id: &str, source_kpi: Option<&str>) -> PerformanceComponent {
    PerformanceComponent {
        id: ComponentId::new(id),
        tenant_id: tenant(),
        fiscal_year_id: "fy-2026".into(),
        org_unit_id: OrgUnitId::new("org"),
        kind: ComponentKind::Kpi,
        label: format!("component {id}"),
        source_kpi_id: source_kpi.map(KpiId::new),
    }
}

fn perspective(id: &str) -> Perspective {
    Perspective {
        id: PerspectiveId::new(id),
        tenant_id: tenant(),
        name: format!("perspective {id}"),
        description: None,
    }
}

/// Builds a store holding a three-hop chain: leaf -> mid -> root.
fn chain_store() -> InMemoryDirectoryStore {
    let store = InMemoryDirectoryStore::new();
    store.put_perspective(&perspective("financial")).unwrap();
    store.put_kpi(&kpi("root", None, Some("financial"))).unwrap();
    store.put_component(&component("comp-mid", Some("root"))).unwrap();
    store.put_kpi(&kpi("mid", Some("comp-mid"), None)).unwrap();
    store.put_component(&component("comp-leaf", Some("mid"))).unwrap();
    store.put_kpi(&kpi("leaf", Some("comp-leaf"), None)).unwrap();
    store
}

// ============================================================================
// SECTION: Success Paths
// ============================================================================

#[test]
fn resolves_through_two_hops_to_root_perspective() {
    let store = chain_store();
    let resolved = resolve_perspective(&store, tenant(), &KpiId::new("leaf")).unwrap();
    assert_eq!(resolved.perspective.id, PerspectiveId::new("financial"));
    assert_eq!(resolved.root_kpi_id, KpiId::new("root"));
    assert_eq!(resolved.depth, 2);
    assert_eq!(
        resolved.path,
        vec![KpiId::new("leaf"), KpiId::new("mid"), KpiId::new("root")]
    );
}

#[test]
fn organizational_kpi_resolves_at_depth_zero() {
    let store = chain_store();
    let resolved = resolve_perspective(&store, tenant(), &KpiId::new("root")).unwrap();
    assert_eq!(resolved.depth, 0);
    assert_eq!(resolved.path, vec![KpiId::new("root")]);
}

#[test]
fn chain_at_the_depth_budget_still_resolves() {
    let store = InMemoryDirectoryStore::new();
    store.put_perspective(&perspective("financial")).unwrap();
    store.put_kpi(&kpi("kpi-0", None, Some("financial"))).unwrap();
    for hop in 1..=MAX_RESOLUTION_DEPTH {
        let comp = format!("comp-{hop}");
        let source = format!("kpi-{}", hop - 1);
        store.put_component(&component(&comp, Some(&source))).unwrap();
        store.put_kpi(&kpi(&format!("kpi-{hop}"), Some(&comp), None)).unwrap();
    }
    let start = KpiId::new(format!("kpi-{MAX_RESOLUTION_DEPTH}"));
    let resolved = resolve_perspective(&store, tenant(), &start).unwrap();
    assert_eq!(resolved.depth, MAX_RESOLUTION_DEPTH);
}

// ============================================================================
// SECTION: Failure Modes
// ============================================================================

#[test]
fn missing_start_kpi_fails() {
    let store = chain_store();
    let err = resolve_perspective(&store, tenant(), &KpiId::new("nope")).unwrap_err();
    assert!(matches!(err, ResolutionError::KpiMissing(id) if id == KpiId::new("nope")));
}

#[test]
fn missing_component_fails() {
    let store = chain_store();
    store.put_kpi(&kpi("dangling", Some("comp-gone"), None)).unwrap();
    let err = resolve_perspective(&store, tenant(), &KpiId::new("dangling")).unwrap_err();
    assert!(matches!(err, ResolutionError::ComponentMissing { .. }));
}

#[test]
fn component_without_source_link_fails() {
    let store = chain_store();
    let mut broken = component("comp-broken", None);
    broken.kind = ComponentKind::Objective;
    store.put_component(&broken).unwrap();
    store.put_kpi(&kpi("stuck", Some("comp-broken"), None)).unwrap();
    let err = resolve_perspective(&store, tenant(), &KpiId::new("stuck")).unwrap_err();
    assert!(matches!(err, ResolutionError::SourceKpiUnset { .. }));
}

#[test]
fn missing_source_kpi_fails() {
    let store = chain_store();
    store.put_component(&component("comp-ghost", Some("ghost"))).unwrap();
    store.put_kpi(&kpi("haunted", Some("comp-ghost"), None)).unwrap();
    let err = resolve_perspective(&store, tenant(), &KpiId::new("haunted")).unwrap_err();
    assert!(matches!(err, ResolutionError::SourceKpiMissing { .. }));
}

#[test]
fn root_without_perspective_fails() {
    let store = InMemoryDirectoryStore::new();
    store.put_kpi(&kpi("bare-root", None, None)).unwrap();
    let err = resolve_perspective(&store, tenant(), &KpiId::new("bare-root")).unwrap_err();
    assert!(matches!(err, ResolutionError::PerspectiveUnassigned { .. }));
}

#[test]
fn dangling_perspective_reference_fails() {
    let store = InMemoryDirectoryStore::new();
    store.put_kpi(&kpi("root", None, Some("gone"))).unwrap();
    let err = resolve_perspective(&store, tenant(), &KpiId::new("root")).unwrap_err();
    assert!(matches!(err, ResolutionError::PerspectiveMissing { .. }));
}

#[test]
fn cyclic_chain_is_detected_before_depth_exhaustion() {
    let store = InMemoryDirectoryStore::new();
    store.put_component(&component("comp-a", Some("b"))).unwrap();
    store.put_component(&component("comp-b", Some("a"))).unwrap();
    store.put_kpi(&kpi("a", Some("comp-a"), None)).unwrap();
    store.put_kpi(&kpi("b", Some("comp-b"), None)).unwrap();
    let err = resolve_perspective(&store, tenant(), &KpiId::new("a")).unwrap_err();
    assert!(matches!(err, ResolutionError::CycleDetected { kpi } if kpi == KpiId::new("a")));
}

#[test]
fn chain_past_the_depth_budget_fails() {
    let store = InMemoryDirectoryStore::new();
    store.put_perspective(&perspective("financial")).unwrap();
    store.put_kpi(&kpi("kpi-0", None, Some("financial"))).unwrap();
    let hops = MAX_RESOLUTION_DEPTH + 1;
    for hop in 1..=hops {
        let comp = format!("comp-{hop}");
        let source = format!("kpi-{}", hop - 1);
        store.put_component(&component(&comp, Some(&source))).unwrap();
        store.put_kpi(&kpi(&format!("kpi-{hop}"), Some(&comp), None)).unwrap();
    }
    let err = resolve_perspective(&store, tenant(), &KpiId::new(format!("kpi-{hops}"))).unwrap_err();
    assert!(matches!(err, ResolutionError::DepthExceeded { max, .. } if max == MAX_RESOLUTION_DEPTH));
}

#[test]
fn resolution_is_tenant_scoped() {
    let store = chain_store();
    let other = TenantId::from_raw(99).unwrap();
    let err = resolve_perspective(&store, other, &KpiId::new("leaf")).unwrap_err();
    assert!(matches!(err, ResolutionError::KpiMissing(_)));
}
