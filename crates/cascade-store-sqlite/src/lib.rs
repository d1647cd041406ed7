// crates/cascade-store-sqlite/src/lib.rs
// ============================================================================
// Module: Cascade SQLite Store Library
// Description: Durable DirectoryStore backed by SQLite.
// Purpose: Persist directory records with fail-closed integrity checks.
// Dependencies: cascade-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate provides [`SqliteDirectoryStore`], a durable implementation of
//! [`cascade_core::DirectoryStore`] storing each record as a JSON document
//! row. Confirmation rows additionally carry their canonical digest and are
//! verified on load; corruption surfaces as an integrity error rather than
//! a silently wrong record.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_DOCUMENT_BYTES;
pub use store::SqliteDirectoryStore;
pub use store::SqliteJournalMode;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteSyncMode;
