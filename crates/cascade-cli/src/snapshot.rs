// crates/cascade-cli/src/snapshot.rs
// ============================================================================
// Module: Offline Snapshots
// Description: JSON snapshot loading for offline validation and resolution.
// Purpose: Run the structure and resolver engines without a server.
// Dependencies: cascade-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Offline commands operate on JSON snapshots exported from a directory: a
//! structure snapshot (`units` + optional `levels`) or a cascade snapshot
//! (`kpis` + `components` + `perspectives`). Loading applies the same
//! hardened guards as config files (path length, size cap, UTF-8) and the
//! cascade snapshot is replayed into an in-memory store so the resolver
//! runs unmodified.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use cascade_core::DirectoryStore;
use cascade_core::Kpi;
use cascade_core::LevelDefinition;
use cascade_core::OrgUnit;
use cascade_core::PerformanceComponent;
use cascade_core::Perspective;
use cascade_core::StoreError;
use cascade_core::runtime::InMemoryDirectoryStore;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum snapshot file size in bytes.
pub const MAX_SNAPSHOT_BYTES: usize = 8 * 1_048_576;
/// Maximum total snapshot path length.
pub const MAX_PATH_LENGTH: usize = 4_096;
/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;

// ============================================================================
// SECTION: Snapshot Errors
// ============================================================================

/// Snapshot loading errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot path exceeds the length cap.
    #[error("snapshot path exceeds max length {MAX_PATH_LENGTH}")]
    PathTooLong,
    /// A snapshot path component exceeds the component cap.
    #[error("snapshot path component too long (max {MAX_PATH_COMPONENT_LENGTH})")]
    PathComponentTooLong,
    /// Snapshot file could not be read.
    #[error("snapshot read failed: {0}")]
    Read(String),
    /// Snapshot file exceeds the size cap.
    #[error("snapshot file exceeds size limit {MAX_SNAPSHOT_BYTES}")]
    FileTooLarge,
    /// Snapshot file is not valid UTF-8.
    #[error("snapshot file must be utf-8")]
    NotUtf8,
    /// JSON parsing failed.
    #[error("snapshot parse failed: {0}")]
    Parse(String),
    /// Snapshot records could not be replayed into a store.
    #[error("snapshot replay failed: {0}")]
    Replay(#[from] StoreError),
}

// ============================================================================
// SECTION: Snapshot Shapes
// ============================================================================

/// Org structure snapshot for offline validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructureSnapshot {
    /// Org units of one tenant and fiscal year.
    pub units: Vec<OrgUnit>,
    /// Optional level definitions for rank checks.
    #[serde(default)]
    pub levels: Vec<LevelDefinition>,
}

/// Cascade snapshot for offline perspective resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CascadeSnapshot {
    /// KPI records.
    pub kpis: Vec<Kpi>,
    /// Performance component records.
    #[serde(default)]
    pub components: Vec<PerformanceComponent>,
    /// Perspective records.
    #[serde(default)]
    pub perspectives: Vec<Perspective>,
}

impl CascadeSnapshot {
    /// Replays the snapshot into a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when a record cannot be stored.
    pub fn into_store(self) -> Result<InMemoryDirectoryStore, SnapshotError> {
        let store = InMemoryDirectoryStore::new();
        for perspective in &self.perspectives {
            store.put_perspective(perspective)?;
        }
        for component in &self.components {
            store.put_component(component)?;
        }
        for kpi in &self.kpis {
            store.put_kpi(kpi)?;
        }
        Ok(store)
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads a structure snapshot from a JSON file.
///
/// # Errors
///
/// Returns [`SnapshotError`] when loading or parsing fails.
pub fn load_structure(path: &Path) -> Result<StructureSnapshot, SnapshotError> {
    parse_snapshot(path)
}

/// Loads a cascade snapshot from a JSON file.
///
/// # Errors
///
/// Returns [`SnapshotError`] when loading or parsing fails.
pub fn load_cascade(path: &Path) -> Result<CascadeSnapshot, SnapshotError> {
    parse_snapshot(path)
}

/// Reads, guards, and parses one snapshot file.
fn parse_snapshot<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    check_path(path)?;
    let bytes = fs::read(path).map_err(|err| SnapshotError::Read(err.to_string()))?;
    if bytes.len() > MAX_SNAPSHOT_BYTES {
        return Err(SnapshotError::FileTooLarge);
    }
    let text = String::from_utf8(bytes).map_err(|_| SnapshotError::NotUtf8)?;
    serde_json::from_str(&text).map_err(|err| SnapshotError::Parse(err.to_string()))
}

/// Guards a snapshot path before any filesystem access.
fn check_path(path: &Path) -> Result<(), SnapshotError> {
    if path.as_os_str().len() > MAX_PATH_LENGTH {
        return Err(SnapshotError::PathTooLong);
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SnapshotError::PathComponentTooLong);
        }
    }
    Ok(())
}
