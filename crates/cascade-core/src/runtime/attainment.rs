// crates/cascade-core/src/runtime/attainment.rs
// ============================================================================
// Module: Cascade Target Attainment
// Description: Decimal-aware KPI attainment evaluation.
// Purpose: Score actual values against baseline/target spans.
// Dependencies: crate::core, bigdecimal
// ============================================================================

//! ## Overview
//! Attainment measures how far an actual value has moved across the
//! baseline-to-target span, honoring the KPI's direction of improvement.
//! All arithmetic is decimal (no binary floating point); banding compares
//! integer-scaled products so no threshold constant ever needs parsing.
//! Degenerate spans fail closed instead of dividing by zero.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::Kpi;
use crate::core::KpiDirection;

// ============================================================================
// SECTION: Attainment Errors
// ============================================================================

/// Attainment evaluation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttainmentError {
    /// A decimal input failed to parse.
    #[error("{field} is not a decimal value: {value}")]
    BadDecimal {
        /// Field label (`baseline`, `target`, or `actual`).
        field: &'static str,
        /// Offending raw value.
        value: String,
    },
    /// Baseline equals target; the span is empty.
    #[error("baseline {baseline} equals target {target}; attainment is undefined")]
    ZeroSpan {
        /// Baseline value.
        baseline: String,
        /// Target value.
        target: String,
    },
    /// Target sits on the wrong side of baseline for the KPI direction.
    #[error("target {target} does not improve on baseline {baseline} for direction {direction}")]
    InvertedSpan {
        /// Baseline value.
        baseline: String,
        /// Target value.
        target: String,
        /// KPI direction label.
        direction: &'static str,
    },
}

// ============================================================================
// SECTION: Attainment Status
// ============================================================================

/// Attainment status bands.
///
/// # Invariants
/// - Variants are stable for serialization and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttainmentStatus {
    /// Progress ratio >= 1.
    Achieved,
    /// Progress ratio >= 0.75.
    OnTrack,
    /// Progress ratio >= 0.40.
    AtRisk,
    /// Progress ratio < 0.40.
    OffTrack,
}

impl AttainmentStatus {
    /// Returns the stable label for the band.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Achieved => "achieved",
            Self::OnTrack => "on_track",
            Self::AtRisk => "at_risk",
            Self::OffTrack => "off_track",
        }
    }
}

// ============================================================================
// SECTION: Attainment Result
// ============================================================================

/// Attainment evaluation result.
///
/// # Invariants
/// - `percent` is the unclamped progress percentage, two decimal places.
/// - `status` is banded on the ratio clamped to `0..=1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attainment {
    /// Unclamped progress percentage, decimal string.
    pub percent: String,
    /// Banded status.
    pub status: AttainmentStatus,
    /// True when the raw ratio fell outside `0..=1`.
    pub clamped: bool,
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates an actual value against a KPI's baseline/target span.
///
/// For `higher_is_better` the progress is `(actual - baseline)` over
/// `(target - baseline)`; for `lower_is_better` both differences flip sign.
///
/// # Errors
///
/// Returns [`AttainmentError`] on unparseable decimals or degenerate spans.
pub fn evaluate_attainment(kpi: &Kpi, actual: &str) -> Result<Attainment, AttainmentError> {
    let baseline = parse_decimal("baseline", &kpi.baseline)?;
    let target = parse_decimal("target", &kpi.target)?;
    let actual = parse_decimal("actual", actual)?;

    let (span, progress) = match kpi.direction {
        KpiDirection::HigherIsBetter => (&target - &baseline, &actual - &baseline),
        KpiDirection::LowerIsBetter => (&baseline - &target, &baseline - &actual),
    };
    let zero = BigDecimal::from(0);
    if span == zero {
        return Err(AttainmentError::ZeroSpan {
            baseline: kpi.baseline.clone(),
            target: kpi.target.clone(),
        });
    }
    if span < zero {
        return Err(AttainmentError::InvertedSpan {
            baseline: kpi.baseline.clone(),
            target: kpi.target.clone(),
            direction: kpi.direction.as_str(),
        });
    }

    // Banding avoids division entirely: ratio >= k/n  <=>  n*progress >= k*span.
    let status = if progress >= span {
        AttainmentStatus::Achieved
    } else if &progress * BigDecimal::from(4) >= &span * BigDecimal::from(3) {
        AttainmentStatus::OnTrack
    } else if &progress * BigDecimal::from(5) >= &span * BigDecimal::from(2) {
        AttainmentStatus::AtRisk
    } else {
        AttainmentStatus::OffTrack
    };
    let clamped = progress < zero || progress > span;

    let percent = ((&progress * BigDecimal::from(100)) / &span)
        .with_scale_round(2, bigdecimal::RoundingMode::HalfUp)
        .to_string();

    Ok(Attainment {
        percent,
        status,
        clamped,
    })
}

/// Parses one decimal input.
fn parse_decimal(field: &'static str, value: &str) -> Result<BigDecimal, AttainmentError> {
    BigDecimal::from_str(value).map_err(|_| AttainmentError::BadDecimal {
        field,
        value: value.to_string(),
    })
}
