// crates/cascade-core/src/lib.rs
// ============================================================================
// Module: Cascade Core Library
// Description: Domain model, storage contracts, and rule engines for Cascade.
// Purpose: Provide the shared foundation for stores, API, and CLI crates.
// Dependencies: bigdecimal, serde, serde_jcs, serde_json, sha2, thiserror, time
// ============================================================================

//! ## Overview
//! Cascade models multi-tenant KPI performance management: tenants define
//! fiscal years, hierarchical org units, perspectives, and KPIs that
//! cascade between organizational levels through typed performance
//! components. This crate holds the data model, the backend-agnostic
//! directory store contract, and the rule engines - perspective
//! resolution, structure validation and confirmation, fiscal-year
//! lifecycle, and target attainment. Everything is deterministic and
//! fail-closed; hosts supply timestamps and storage.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::ComponentId;
pub use crate::core::ComponentKind;
pub use crate::core::ConfirmationId;
pub use crate::core::DEFAULT_HASH_ALGORITHM;
pub use crate::core::FiscalYear;
pub use crate::core::FiscalYearId;
pub use crate::core::FiscalYearStatus;
pub use crate::core::HashAlgorithm;
pub use crate::core::HashDigest;
pub use crate::core::HashingError;
pub use crate::core::Kpi;
pub use crate::core::KpiDirection;
pub use crate::core::KpiId;
pub use crate::core::KpiObjective;
pub use crate::core::LevelDefinition;
pub use crate::core::LevelId;
pub use crate::core::ObjectiveId;
pub use crate::core::OrgUnit;
pub use crate::core::OrgUnitId;
pub use crate::core::PerformanceComponent;
pub use crate::core::Perspective;
pub use crate::core::PerspectiveId;
pub use crate::core::StructureConfirmation;
pub use crate::core::Tenant;
pub use crate::core::TenantId;
pub use crate::core::Timestamp;
pub use crate::core::ValidationError;
pub use crate::core::ValidationSummary;
pub use crate::core::hashing;
pub use crate::interfaces::DirectoryStore;
pub use crate::interfaces::StoreError;
