// crates/cascade-api/src/handlers/mod.rs
// ============================================================================
// Module: REST Handlers
// Description: Resource handlers and shared request helpers.
// Purpose: Implement the Cascade REST surface over the directory store.
// Dependencies: axum, cascade-core, serde
// ============================================================================

//! ## Overview
//! One submodule per resource family. Collection `POST` is an upsert (the
//! body carries the identifier, matching the directory's client-minted id
//! model); `GET` lists are identifier-ordered and clamped by the configured
//! page cap. Every handler validates entities at the boundary and checks
//! path/body identifier consistency before touching the store.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod components;
pub mod fiscal;
pub mod kpis;
pub mod org_units;
pub mod tenants;

// ============================================================================
// SECTION: Imports
// ============================================================================

use cascade_config::LimitsConfig;
use cascade_core::TenantId;
use serde::Deserialize;

use crate::error::ApiError;

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Parses a tenant path segment, rejecting zero.
pub(crate) fn tenant_from_path(raw: u64) -> Result<TenantId, ApiError> {
    TenantId::from_raw(raw).ok_or(ApiError::BadTenantId)
}

/// List pagination query.
///
/// # Invariants
/// - `limit` is clamped to the configured page cap, never an error.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct ListQuery {
    /// Maximum records to return.
    pub limit: Option<usize>,
}

/// Applies the page cap to a listed record set.
pub(crate) fn clamp_page<T>(records: Vec<T>, query: ListQuery, limits: &LimitsConfig) -> Vec<T> {
    let cap = query
        .limit
        .map_or(limits.max_page_size, |limit| limit.min(limits.max_page_size));
    let mut records = records;
    records.truncate(cap);
    records
}

/// Checks that a body identifier matches its path counterpart.
pub(crate) fn require_match(
    label: &'static str,
    path_value: &str,
    body_value: &str,
) -> Result<(), ApiError> {
    if path_value == body_value {
        Ok(())
    } else {
        Err(ApiError::PathBodyMismatch(format!(
            "{label} is {body_value} in body but {path_value} in path"
        )))
    }
}

/// Checks that a body tenant matches the path tenant.
pub(crate) fn require_tenant_match(path: TenantId, body: TenantId) -> Result<(), ApiError> {
    if path == body {
        Ok(())
    } else {
        Err(ApiError::PathBodyMismatch(format!(
            "tenant_id is {body} in body but {path} in path"
        )))
    }
}
