// crates/cascade-api/src/audit.rs
// ============================================================================
// Module: API Audit Hooks
// Description: Audit events for mutating directory operations.
// Purpose: Record who changed what without leaking record payloads.
// Dependencies: cascade-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Mutating requests emit one audit event naming the tenant scope, the
//! matched route, and the outcome. Events carry identifiers only, never
//! record payloads. Sinks must not fail the request path: writer errors
//! are swallowed after the response is committed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use cascade_core::Timestamp;
use serde::Serialize;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Audit event for one mutating request.
///
/// # Invariants
/// - `route` is the matched route template; `resource` is identifier-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiAuditEvent {
    /// Raw tenant identifier when the route is tenant-scoped.
    pub tenant: Option<u64>,
    /// HTTP method label.
    pub method: String,
    /// Matched route template.
    pub route: String,
    /// Response status code.
    pub status: u16,
    /// Event time.
    pub at: Timestamp,
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Receives audit events for mutating operations.
pub trait AuditSink: Send + Sync {
    /// Records one audit event.
    fn record(&self, event: &ApiAuditEvent);
}

/// Audit sink that drops every event.
#[derive(Debug, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &ApiAuditEvent) {}
}

/// Audit sink that buffers events in memory for assertions.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    /// Recorded events.
    events: Mutex<Vec<ApiAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ApiAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &ApiAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Audit sink that appends JSON lines to a writer.
///
/// # Invariants
/// - Write failures are swallowed; auditing never fails a request.
#[derive(Debug)]
pub struct WriterAuditSink<W: Write + Send> {
    /// Guarded output writer.
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterAuditSink<W> {
    /// Creates a sink over the provided writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> AuditSink for WriterAuditSink<W> {
    fn record(&self, event: &ApiAuditEvent) {
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }
}
