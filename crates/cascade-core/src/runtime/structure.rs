// crates/cascade-core/src/runtime/structure.rs
// ============================================================================
// Module: Cascade Structure Validation
// Description: Org-structure validation and fiscal-year confirmation.
// Purpose: Detect orphans, cycles, and root violations before lock-in.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Structure validation is a single pass over all org units of one tenant
//! and fiscal year: duplicate identifiers, orphaned parent references,
//! parent-chain cycles, root cardinality, and level-rank inversions all
//! become violations in a [`StructureReport`]. Confirmation consumes a
//! clean report, records a canonical digest of the unit set, and flips the
//! fiscal year from `draft` to `active`. Re-confirming an active year whose
//! structure still hashes to the stored digest is idempotent; any other
//! re-confirmation is a status conflict.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::ConfirmationId;
use crate::core::DEFAULT_HASH_ALGORITHM;
use crate::core::FiscalYearId;
use crate::core::FiscalYearStatus;
use crate::core::HashDigest;
use crate::core::HashingError;
use crate::core::LevelDefinition;
use crate::core::LevelId;
use crate::core::OrgUnit;
use crate::core::OrgUnitId;
use crate::core::StructureConfirmation;
use crate::core::TenantId;
use crate::core::Timestamp;
use crate::core::ValidationSummary;
use crate::core::hashing::hash_canonical_json;
use crate::interfaces::DirectoryStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Structure Violations
// ============================================================================

/// Violations detected during structure validation.
///
/// # Invariants
/// - Variants are stable for serialization and programmatic handling.
/// - Messages name the offending unit identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureViolation {
    /// The unit set is empty.
    #[error("fiscal year has no org units")]
    NoUnits,
    /// Two units share an identifier.
    #[error("duplicate org unit id {unit}")]
    DuplicateUnit {
        /// Duplicated identifier.
        unit: OrgUnitId,
    },
    /// A unit references a parent outside the unit set.
    #[error("org unit {unit} references missing parent {parent}")]
    OrphanedUnit {
        /// Unit carrying the dangling reference.
        unit: OrgUnitId,
        /// Missing parent identifier.
        parent: OrgUnitId,
    },
    /// A unit's parent chain revisits a unit.
    #[error("org unit {unit} is part of a circular parent chain")]
    CircularReference {
        /// Unit whose chain cycles.
        unit: OrgUnitId,
    },
    /// No unit is a root.
    #[error("no root org unit (every unit has a parent)")]
    NoRoot,
    /// More than one unit is a root.
    #[error("multiple root org units: {}", .roots.iter().map(OrgUnitId::as_str).collect::<Vec<_>>().join(", "))]
    MultipleRoots {
        /// All root unit identifiers, sorted.
        roots: Vec<OrgUnitId>,
    },
    /// A unit references a level that is not defined.
    #[error("org unit {unit} references unknown level {level}")]
    UnknownLevel {
        /// Unit carrying the dangling reference.
        unit: OrgUnitId,
        /// Missing level identifier.
        level: LevelId,
    },
    /// A child's level rank does not sit below its parent's.
    #[error("org unit {unit} (level rank {unit_level}) must sit below parent {parent} (level rank {parent_level})")]
    LevelInversion {
        /// Child unit.
        unit: OrgUnitId,
        /// Parent unit.
        parent: OrgUnitId,
        /// Child level rank.
        unit_level: u32,
        /// Parent level rank.
        parent_level: u32,
    },
}

impl StructureViolation {
    /// Returns the unit identifiers this violation names.
    #[must_use]
    pub fn affected_units(&self) -> Vec<OrgUnitId> {
        match self {
            Self::NoUnits | Self::NoRoot => Vec::new(),
            Self::DuplicateUnit { unit }
            | Self::CircularReference { unit }
            | Self::UnknownLevel { unit, .. } => vec![unit.clone()],
            Self::OrphanedUnit { unit, parent } => vec![unit.clone(), parent.clone()],
            Self::MultipleRoots { roots } => roots.clone(),
            Self::LevelInversion { unit, parent, .. } => vec![unit.clone(), parent.clone()],
        }
    }
}

// ============================================================================
// SECTION: Structure Report
// ============================================================================

/// Outcome of validating one fiscal year's org structure.
///
/// # Invariants
/// - `violations` is empty iff the structure is confirmable.
/// - `max_depth` counts edges on the longest acyclic chain to a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureReport {
    /// Number of units examined.
    pub unit_count: usize,
    /// Number of units with no parent.
    pub root_count: usize,
    /// Longest acyclic parent-chain length, in edges.
    pub max_depth: usize,
    /// Violations found, in deterministic order.
    pub violations: Vec<StructureViolation>,
}

impl StructureReport {
    /// Returns true when the structure is confirmable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Renders the report as a client-safe summary.
    #[must_use]
    pub fn summary(&self) -> ValidationSummary {
        let status = if self.is_valid() { "valid" } else { "invalid" };
        let mut affected: BTreeSet<OrgUnitId> = BTreeSet::new();
        for violation in &self.violations {
            affected.extend(violation.affected_units());
        }
        let mut summary = ValidationSummary::new(
            status,
            self.violations.iter().map(ToString::to_string).collect(),
        );
        summary.affected_units = affected.into_iter().collect();
        if !self.is_valid() {
            summary.remediation_hint =
                Some("resolve all structure violations, then retry confirmation".to_string());
        }
        summary
    }
}

// ============================================================================
// SECTION: Structure Validation
// ============================================================================

/// Validates one fiscal year's org unit set.
///
/// Duplicates, orphans, cycles, root cardinality, and level-rank checks run
/// in one pass over the materialized unit slice; the function never touches
/// a store.
#[must_use]
pub fn validate_structure(units: &[OrgUnit], levels: &[LevelDefinition]) -> StructureReport {
    let mut violations = Vec::new();

    if units.is_empty() {
        return StructureReport {
            unit_count: 0,
            root_count: 0,
            max_depth: 0,
            violations: vec![StructureViolation::NoUnits],
        };
    }

    let mut by_id: BTreeMap<&str, &OrgUnit> = BTreeMap::new();
    let mut duplicates: BTreeSet<OrgUnitId> = BTreeSet::new();
    for unit in units {
        if by_id.insert(unit.id.as_str(), unit).is_some() {
            duplicates.insert(unit.id.clone());
        }
    }
    for unit in &duplicates {
        violations.push(StructureViolation::DuplicateUnit { unit: unit.clone() });
    }

    // Orphans: parent references outside the unit set.
    for unit in by_id.values() {
        if let Some(parent) = &unit.parent_id {
            if !by_id.contains_key(parent.as_str()) {
                violations.push(StructureViolation::OrphanedUnit {
                    unit: unit.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    // Cycles and depth: walk each unit's parent chain with a visited set.
    let mut max_depth = 0_usize;
    for unit in by_id.values() {
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        visited.insert(unit.id.as_str());
        let mut cursor: &OrgUnit = unit;
        let mut depth = 0_usize;
        let mut cyclic = false;
        while let Some(parent_id) = &cursor.parent_id {
            let Some(parent) = by_id.get(parent_id.as_str()).copied() else {
                // Orphan edge; already reported above.
                break;
            };
            if !visited.insert(parent.id.as_str()) {
                cyclic = true;
                break;
            }
            depth += 1;
            cursor = parent;
        }
        if cyclic {
            violations.push(StructureViolation::CircularReference {
                unit: unit.id.clone(),
            });
        } else if cursor.parent_id.is_none() {
            max_depth = max_depth.max(depth);
        }
    }

    // Level checks: unknown references and rank inversions along edges.
    let ranks: BTreeMap<&str, u32> = levels
        .iter()
        .map(|level| (level.id.as_str(), level.hierarchy_level))
        .collect();
    for unit in by_id.values() {
        let unit_rank = match &unit.level_id {
            Some(level_id) => match ranks.get(level_id.as_str()) {
                Some(rank) => Some(*rank),
                None => {
                    violations.push(StructureViolation::UnknownLevel {
                        unit: unit.id.clone(),
                        level: level_id.clone(),
                    });
                    None
                }
            },
            None => None,
        };
        let (Some(unit_rank), Some(parent_id)) = (unit_rank, &unit.parent_id) else {
            continue;
        };
        let Some(parent) = by_id.get(parent_id.as_str()) else {
            continue;
        };
        let Some(parent_rank) = parent
            .level_id
            .as_ref()
            .and_then(|level_id| ranks.get(level_id.as_str()).copied())
        else {
            continue;
        };
        if unit_rank <= parent_rank {
            violations.push(StructureViolation::LevelInversion {
                unit: unit.id.clone(),
                parent: parent.id.clone(),
                unit_level: unit_rank,
                parent_level: parent_rank,
            });
        }
    }

    // Root cardinality: org units form a rooted tree, exactly one root.
    let roots: Vec<OrgUnitId> = by_id
        .values()
        .filter(|unit| unit.parent_id.is_none())
        .map(|unit| unit.id.clone())
        .collect();
    let root_count = roots.len();
    if root_count == 0 {
        violations.push(StructureViolation::NoRoot);
    } else if root_count > 1 {
        violations.push(StructureViolation::MultipleRoots { roots });
    }

    StructureReport {
        unit_count: by_id.len(),
        root_count,
        max_depth,
        violations,
    }
}

// ============================================================================
// SECTION: Structure Digest
// ============================================================================

/// Computes the canonical digest of a unit set, sorted by identifier.
///
/// # Errors
///
/// Returns [`HashingError`] when canonicalization fails.
pub fn structure_digest(units: &[OrgUnit]) -> Result<HashDigest, HashingError> {
    let mut sorted: Vec<&OrgUnit> = units.iter().collect();
    sorted.sort_by(|left, right| left.id.cmp(&right.id));
    hash_canonical_json(DEFAULT_HASH_ALGORITHM, &sorted)
}

// ============================================================================
// SECTION: Confirmation Errors
// ============================================================================

/// Structure confirmation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfirmationError {
    /// Fiscal year does not exist.
    #[error("fiscal year not found: {fiscal_year} for tenant {tenant}")]
    FiscalYearMissing {
        /// Tenant queried.
        tenant: TenantId,
        /// Missing fiscal year.
        fiscal_year: FiscalYearId,
    },
    /// Fiscal year status does not permit confirmation.
    #[error("fiscal year {fiscal_year} cannot be confirmed from status {}", .status.as_str())]
    StatusConflict {
        /// Fiscal year in conflict.
        fiscal_year: FiscalYearId,
        /// Current status.
        status: FiscalYearStatus,
    },
    /// Structure validation failed; nothing was written.
    #[error("structure validation failed with {} violation(s)", .report.violations.len())]
    Invalid {
        /// Full validation report.
        report: Box<StructureReport>,
    },
    /// Active fiscal year has no stored confirmation record.
    #[error("fiscal year {fiscal_year} is active but has no confirmation record")]
    ConfirmationMissing {
        /// Fiscal year missing its record.
        fiscal_year: FiscalYearId,
    },
    /// Digest computation failed.
    #[error(transparent)]
    Hashing(#[from] HashingError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Confirmation
// ============================================================================

/// Confirms a fiscal year's org structure and activates the year.
///
/// Loads the year's units and the tenant's level definitions, validates the
/// tree, records a [`StructureConfirmation`] with the canonical structure
/// digest, and flips the year `draft -> active`. Re-confirming an active
/// year is idempotent when the structure still hashes to the stored digest.
///
/// # Errors
///
/// Returns [`ConfirmationError`] when the year is missing, the status does
/// not permit confirmation, the structure is invalid, or the store fails.
pub fn confirm_structure(
    store: &dyn DirectoryStore,
    tenant: TenantId,
    fiscal_year_id: &FiscalYearId,
    now: Timestamp,
) -> Result<StructureConfirmation, ConfirmationError> {
    let fiscal_year = store.fiscal_year(tenant, fiscal_year_id)?.ok_or_else(|| {
        ConfirmationError::FiscalYearMissing {
            tenant,
            fiscal_year: fiscal_year_id.clone(),
        }
    })?;
    let units = store.org_units(tenant, fiscal_year_id)?;
    let levels = store.levels(tenant)?;
    let report = validate_structure(&units, &levels);

    match fiscal_year.status {
        FiscalYearStatus::Draft => {}
        FiscalYearStatus::Active => {
            let existing = store.confirmation(tenant, fiscal_year_id)?.ok_or_else(|| {
                ConfirmationError::ConfirmationMissing {
                    fiscal_year: fiscal_year_id.clone(),
                }
            })?;
            if report.is_valid() && structure_digest(&units)? == existing.structure_hash {
                return Ok(existing);
            }
            return Err(ConfirmationError::StatusConflict {
                fiscal_year: fiscal_year_id.clone(),
                status: fiscal_year.status,
            });
        }
        FiscalYearStatus::Locked | FiscalYearStatus::Archived => {
            return Err(ConfirmationError::StatusConflict {
                fiscal_year: fiscal_year_id.clone(),
                status: fiscal_year.status,
            });
        }
    }

    if !report.is_valid() {
        return Err(ConfirmationError::Invalid {
            report: Box::new(report),
        });
    }
    let Some(root) = units.iter().find(|unit| unit.parent_id.is_none()) else {
        // Unreachable for a valid report; fail closed rather than panic.
        return Err(ConfirmationError::Invalid {
            report: Box::new(report),
        });
    };

    let confirmation = StructureConfirmation {
        id: ConfirmationId::new(format!("confirm-{fiscal_year_id}")),
        tenant_id: tenant,
        fiscal_year_id: fiscal_year_id.clone(),
        structure_hash: structure_digest(&units)?,
        unit_count: units.len(),
        root_unit_id: root.id.clone(),
        confirmed_at: now,
    };
    store.insert_confirmation(&confirmation)?;
    store.set_fiscal_year_status(tenant, fiscal_year_id, FiscalYearStatus::Active)?;
    Ok(confirmation)
}
