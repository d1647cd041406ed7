// crates/cascade-core/src/runtime/resolver.rs
// ============================================================================
// Module: Cascade Perspective Resolver
// Description: Backward chain walk from a KPI to its root organizational KPI.
// Purpose: Resolve the effective perspective a cascaded KPI inherits.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! A cascaded KPI inherits its perspective from the root organizational KPI
//! reached by walking `KPI -> performance component -> source KPI -> ...`
//! backwards. The walk is bounded at [`MAX_RESOLUTION_DEPTH`] hops and
//! fail-closed: any missing link, unassigned perspective, cycle, or
//! exhausted depth budget aborts resolution with a distinct error.
//! Resolution never mutates state and is never retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::ComponentId;
use crate::core::KpiId;
use crate::core::Perspective;
use crate::core::PerspectiveId;
use crate::core::TenantId;
use crate::interfaces::DirectoryStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of component link hops a resolution may follow.
pub const MAX_RESOLUTION_DEPTH: usize = 20;

// ============================================================================
// SECTION: Resolution Errors
// ============================================================================

/// Perspective resolution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Missing-link variants name the record whose lookup failed.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Starting KPI does not exist.
    #[error("kpi not found: {0}")]
    KpiMissing(KpiId),
    /// Component referenced by a KPI does not exist.
    #[error("kpi {kpi} references missing component {component}")]
    ComponentMissing {
        /// KPI carrying the dangling reference.
        kpi: KpiId,
        /// Missing component.
        component: ComponentId,
    },
    /// Component on the chain has no source KPI link.
    #[error("component {component} has no source kpi link")]
    SourceKpiUnset {
        /// Component missing the link.
        component: ComponentId,
    },
    /// Component's source KPI does not exist.
    #[error("component {component} references missing source kpi {kpi}")]
    SourceKpiMissing {
        /// Component carrying the dangling reference.
        component: ComponentId,
        /// Missing source KPI.
        kpi: KpiId,
    },
    /// Root organizational KPI has no perspective assigned.
    #[error("root kpi {kpi} has no perspective assigned")]
    PerspectiveUnassigned {
        /// Root KPI without a perspective.
        kpi: KpiId,
    },
    /// Root KPI's perspective record does not exist.
    #[error("kpi {kpi} references missing perspective {perspective}")]
    PerspectiveMissing {
        /// Root KPI carrying the dangling reference.
        kpi: KpiId,
        /// Missing perspective.
        perspective: PerspectiveId,
    },
    /// Chain revisited a KPI.
    #[error("component chain cycles back to kpi {kpi}")]
    CycleDetected {
        /// KPI seen twice on the chain.
        kpi: KpiId,
    },
    /// Chain exceeded the depth budget.
    #[error("component chain from kpi {start} exceeds depth {max}")]
    DepthExceeded {
        /// Starting KPI of the walk.
        start: KpiId,
        /// Depth budget that was exhausted.
        max: usize,
    },
    /// Store lookup failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Resolution Result
// ============================================================================

/// Successful perspective resolution.
///
/// # Invariants
/// - `path` starts at the queried KPI and ends at `root_kpi_id`.
/// - `depth` equals `path.len() - 1` (number of link hops taken).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPerspective {
    /// Perspective inherited from the root organizational KPI.
    pub perspective: Perspective,
    /// Root organizational KPI that anchors the chain.
    pub root_kpi_id: KpiId,
    /// Number of link hops taken.
    pub depth: usize,
    /// Ordered KPI identifiers walked, starting KPI first.
    pub path: Vec<KpiId>,
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves the effective perspective of a KPI.
///
/// Walks `KPI -> component -> source KPI` links backwards until a KPI with
/// no component link is found, then loads that KPI's perspective.
///
/// # Errors
///
/// Returns [`ResolutionError`] when any link on the chain is missing, the
/// chain cycles, the depth budget is exhausted, or the root KPI carries no
/// resolvable perspective.
pub fn resolve_perspective(
    store: &dyn DirectoryStore,
    tenant: TenantId,
    kpi_id: &KpiId,
) -> Result<ResolvedPerspective, ResolutionError> {
    let mut current = store
        .kpi(tenant, kpi_id)?
        .ok_or_else(|| ResolutionError::KpiMissing(kpi_id.clone()))?;
    let mut visited = BTreeSet::new();
    visited.insert(current.id.clone());
    let mut path = vec![current.id.clone()];
    let mut depth = 0_usize;

    loop {
        let Some(component_id) = current.component_id.clone() else {
            // Root organizational KPI reached.
            let perspective_id = current.perspective_id.clone().ok_or_else(|| {
                ResolutionError::PerspectiveUnassigned {
                    kpi: current.id.clone(),
                }
            })?;
            let perspective = store.perspective(tenant, &perspective_id)?.ok_or_else(|| {
                ResolutionError::PerspectiveMissing {
                    kpi: current.id.clone(),
                    perspective: perspective_id,
                }
            })?;
            return Ok(ResolvedPerspective {
                perspective,
                root_kpi_id: current.id,
                depth,
                path,
            });
        };

        if depth >= MAX_RESOLUTION_DEPTH {
            return Err(ResolutionError::DepthExceeded {
                start: kpi_id.clone(),
                max: MAX_RESOLUTION_DEPTH,
            });
        }

        let component = store.component(tenant, &component_id)?.ok_or_else(|| {
            ResolutionError::ComponentMissing {
                kpi: current.id.clone(),
                component: component_id.clone(),
            }
        })?;
        let source_id =
            component
                .source_kpi_id
                .clone()
                .ok_or_else(|| ResolutionError::SourceKpiUnset {
                    component: component.id.clone(),
                })?;
        if !visited.insert(source_id.clone()) {
            return Err(ResolutionError::CycleDetected { kpi: source_id });
        }
        current = store.kpi(tenant, &source_id)?.ok_or_else(|| {
            ResolutionError::SourceKpiMissing {
                component: component.id,
                kpi: source_id,
            }
        })?;
        path.push(current.id.clone());
        depth += 1;
    }
}
