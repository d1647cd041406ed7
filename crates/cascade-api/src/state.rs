// crates/cascade-api/src/state.rs
// ============================================================================
// Module: API Server State
// Description: Shared state wired into every REST handler.
// Purpose: Bundle the store, limits, and observability sinks.
// Dependencies: cascade-config, cascade-core
// ============================================================================

//! ## Overview
//! Handlers share one [`ServerState`]: the directory store behind a trait
//! object, the configured limits, and the metrics/audit sinks. The state is
//! cheap to clone (all `Arc`s) and carries no per-request data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use cascade_config::LimitsConfig;
use cascade_core::DirectoryStore;
use cascade_core::Timestamp;

use crate::audit::AuditSink;
use crate::audit::NoopAuditSink;
use crate::telemetry::MetricsSink;
use crate::telemetry::NoopMetricsSink;

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared REST server state.
///
/// # Invariants
/// - Clones share the same store and sinks.
#[derive(Clone)]
pub struct ServerState {
    /// Directory store.
    pub store: Arc<dyn DirectoryStore>,
    /// Directory size and paging limits.
    pub limits: LimitsConfig,
    /// Metrics sink.
    pub metrics: Arc<dyn MetricsSink>,
    /// Audit sink.
    pub audit: Arc<dyn AuditSink>,
}

impl ServerState {
    /// Creates state with no-op observability sinks.
    #[must_use]
    pub fn new(store: Arc<dyn DirectoryStore>, limits: LimitsConfig) -> Self {
        Self {
            store,
            limits,
            metrics: Arc::new(NoopMetricsSink),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }
}

// ============================================================================
// SECTION: Host Clock
// ============================================================================

/// Returns the current wall-clock time as a core timestamp.
///
/// The core engines never read the clock themselves; the API host supplies
/// confirmation times through this single seam.
#[must_use]
pub fn now_timestamp() -> Timestamp {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0);
    Timestamp::UnixMillis(millis)
}
