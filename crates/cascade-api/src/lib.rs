// crates/cascade-api/src/lib.rs
// ============================================================================
// Module: Cascade API Library
// Description: REST/JSON surface over the Cascade directory store.
// Purpose: Expose CRUD, resolution, validation, and lifecycle operations.
// Dependencies: axum, axum-server, cascade-config, cascade-core, tokio, tower
// ============================================================================

//! ## Overview
//! This crate assembles the Cascade REST API: resource handlers over the
//! directory store, a stable error taxonomy, health/readiness probes, and
//! dependency-light metrics and audit hooks. Hosts construct a
//! [`ServerState`] and either serve it ([`server::serve`]) or embed the
//! router ([`server::build_router`]) in their own stack.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::audit::ApiAuditEvent;
pub use crate::audit::AuditSink;
pub use crate::audit::MemoryAuditSink;
pub use crate::audit::NoopAuditSink;
pub use crate::audit::WriterAuditSink;
pub use crate::error::ApiError;
pub use crate::error::ErrorBody;
pub use crate::server::ServeError;
pub use crate::server::build_router;
pub use crate::server::serve;
pub use crate::state::ServerState;
pub use crate::state::now_timestamp;
pub use crate::telemetry::API_LATENCY_BUCKETS_MS;
pub use crate::telemetry::ApiMetricEvent;
pub use crate::telemetry::ApiOutcome;
pub use crate::telemetry::MemoryMetricsSink;
pub use crate::telemetry::MetricsSink;
pub use crate::telemetry::NoopMetricsSink;
