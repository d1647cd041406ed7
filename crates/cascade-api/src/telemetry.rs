// crates/cascade-api/src/telemetry.rs
// ============================================================================
// Module: API Telemetry
// Description: Observability hooks for REST request handling.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for REST request counters
//! and latency histograms. It is intentionally dependency-light so
//! deployments can plug in Prometheus or OpenTelemetry without redesign.
//! Labels are bounded: the route label is the matched route template, never
//! the raw path, so label cardinality cannot be driven by clients.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for REST request histograms.
pub const API_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// REST request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ApiOutcome {
    /// Response status below 400.
    Ok,
    /// Response status 400..=499.
    ClientError,
    /// Response status 500 and above.
    ServerError,
}

impl ApiOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::ClientError => "client_error",
            Self::ServerError => "server_error",
        }
    }

    /// Classifies an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            0..=399 => Self::Ok,
            400..=499 => Self::ClientError,
            _ => Self::ServerError,
        }
    }
}

/// REST request metric event payload.
///
/// # Invariants
/// - `route` is the matched route template, bounded by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiMetricEvent {
    /// HTTP method label.
    pub method: String,
    /// Matched route template (e.g. `/v1/tenants/{tenant_id}/kpis`).
    pub route: String,
    /// Response status code.
    pub status: u16,
    /// Outcome classification.
    pub outcome: ApiOutcome,
}

// ============================================================================
// SECTION: Metrics Sink
// ============================================================================

/// Receives REST metric events.
pub trait MetricsSink: Send + Sync {
    /// Records a completed request.
    fn record_request(&self, event: ApiMetricEvent);

    /// Records request latency.
    fn record_latency(&self, event: ApiMetricEvent, latency: Duration);
}

/// Metrics sink that drops every event.
#[derive(Debug, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record_request(&self, _event: ApiMetricEvent) {}

    fn record_latency(&self, _event: ApiMetricEvent, _latency: Duration) {}
}

/// Metrics sink that buffers events in memory for assertions.
#[derive(Debug, Default)]
pub struct MemoryMetricsSink {
    /// Recorded request events.
    requests: Mutex<Vec<ApiMetricEvent>>,
    /// Recorded latency events.
    latencies: Mutex<Vec<(ApiMetricEvent, Duration)>>,
}

impl MemoryMetricsSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded request events.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiMetricEvent> {
        self.requests.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns the number of recorded latency events.
    #[must_use]
    pub fn latency_count(&self) -> usize {
        self.latencies.lock().map(|events| events.len()).unwrap_or_default()
    }
}

impl MetricsSink for MemoryMetricsSink {
    fn record_request(&self, event: ApiMetricEvent) {
        if let Ok(mut events) = self.requests.lock() {
            events.push(event);
        }
    }

    fn record_latency(&self, event: ApiMetricEvent, latency: Duration) {
        if let Ok(mut events) = self.latencies.lock() {
            events.push((event, latency));
        }
    }
}
