// crates/cascade-core/tests/attainment_unit.rs
// ============================================================================
// Module: Attainment Unit Tests
// Description: Decimal attainment math, banding, and degenerate spans.
// Purpose: Validate scoring behavior for both KPI directions.
// ============================================================================

//! Attainment evaluation tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use cascade_core::Kpi;
use cascade_core::KpiDirection;
use cascade_core::KpiId;
use cascade_core::TenantId;
use cascade_core::runtime::AttainmentError;
use cascade_core::runtime::AttainmentStatus;
use cascade_core::runtime::evaluate_attainment;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

fn kpi(direction: KpiDirection, baseline: &str, target: &str) -> Kpi {
    Kpi {
        id: KpiId::new("kpi-1"),
        tenant_id: TenantId::from_raw(1).unwrap(),
        fiscal_year_id: "fy-2026".into(),
        org_unit_id: None,
        component_id: None,
        perspective_id: None,
        name: "conversion rate".to_string(),
        unit: "%".to_string(),
        direction,
        baseline: baseline.to_string(),
        target: target.to_string(),
    }
}

// ============================================================================
// SECTION: Scoring
// ============================================================================

#[test]
fn halfway_progress_scores_fifty_percent() {
    let result = evaluate_attainment(&kpi(KpiDirection::HigherIsBetter, "0", "100"), "50").unwrap();
    assert_eq!(result.percent, "50.00");
    assert_eq!(result.status, AttainmentStatus::AtRisk);
    assert!(!result.clamped);
}

#[test]
fn lower_is_better_mirrors_the_span() {
    let result = evaluate_attainment(&kpi(KpiDirection::LowerIsBetter, "20", "10"), "12").unwrap();
    assert_eq!(result.percent, "80.00");
    assert_eq!(result.status, AttainmentStatus::OnTrack);
}

#[test]
fn fractional_decimals_keep_two_places() {
    let result =
        evaluate_attainment(&kpi(KpiDirection::HigherIsBetter, "0", "3"), "1").unwrap();
    assert_eq!(result.percent, "33.33");
}

#[test]
fn band_boundaries_are_inclusive() {
    let base = kpi(KpiDirection::HigherIsBetter, "0", "100");
    assert_eq!(evaluate_attainment(&base, "100").unwrap().status, AttainmentStatus::Achieved);
    assert_eq!(evaluate_attainment(&base, "75").unwrap().status, AttainmentStatus::OnTrack);
    assert_eq!(evaluate_attainment(&base, "40").unwrap().status, AttainmentStatus::AtRisk);
    assert_eq!(evaluate_attainment(&base, "39.99").unwrap().status, AttainmentStatus::OffTrack);
}

#[test]
fn overshoot_reports_unclamped_percent() {
    let result = evaluate_attainment(&kpi(KpiDirection::HigherIsBetter, "0", "100"), "120").unwrap();
    assert_eq!(result.percent, "120.00");
    assert_eq!(result.status, AttainmentStatus::Achieved);
    assert!(result.clamped);
}

#[test]
fn regression_below_baseline_reports_negative_percent() {
    let result = evaluate_attainment(&kpi(KpiDirection::HigherIsBetter, "50", "100"), "40").unwrap();
    assert_eq!(result.percent, "-20.00");
    assert_eq!(result.status, AttainmentStatus::OffTrack);
    assert!(result.clamped);
}

// ============================================================================
// SECTION: Degenerate Inputs
// ============================================================================

#[test]
fn zero_span_is_rejected() {
    let err = evaluate_attainment(&kpi(KpiDirection::HigherIsBetter, "10", "10"), "10").unwrap_err();
    assert!(matches!(err, AttainmentError::ZeroSpan { .. }));
}

#[test]
fn inverted_span_is_rejected() {
    let err = evaluate_attainment(&kpi(KpiDirection::HigherIsBetter, "100", "50"), "75").unwrap_err();
    assert!(matches!(err, AttainmentError::InvertedSpan { .. }));

    let err = evaluate_attainment(&kpi(KpiDirection::LowerIsBetter, "10", "20"), "15").unwrap_err();
    assert!(matches!(err, AttainmentError::InvertedSpan { .. }));
}

#[test]
fn unparseable_actual_is_rejected() {
    let err =
        evaluate_attainment(&kpi(KpiDirection::HigherIsBetter, "0", "100"), "not-a-number")
            .unwrap_err();
    assert!(matches!(err, AttainmentError::BadDecimal { field: "actual", .. }));
}
