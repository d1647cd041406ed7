// crates/cascade-api/src/error.rs
// ============================================================================
// Module: API Error Mapping
// Description: Stable REST error taxonomy and HTTP status mapping.
// Purpose: Convert core errors into safe JSON error responses.
// Dependencies: axum, cascade-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every handler returns [`ApiError`]; the response body is always the
//! stable `{ "error", "detail" }` shape. Core errors map fail-closed:
//! validation problems and structurally invalid confirmations are 400
//! (the latter embedding the report summary), missing records and broken
//! resolution links are 404, status conflicts are 409, and exhausted
//! resolution budgets or backend failures are 500. Error bodies never leak
//! store internals beyond the rendered message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use cascade_core::StoreError;
use cascade_core::ValidationError;
use cascade_core::runtime::AttainmentError;
use cascade_core::runtime::ConfirmationError;
use cascade_core::runtime::LifecycleError;
use cascade_core::runtime::ResolutionError;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Error Body
// ============================================================================

/// Stable JSON error body.
///
/// # Invariants
/// - `error` is a stable snake_case code; `detail` is optional context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Stable error code.
    pub error: String,
    /// Optional structured detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

// ============================================================================
// SECTION: API Errors
// ============================================================================

/// REST error taxonomy.
///
/// # Invariants
/// - Variants are stable for programmatic handling and status mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed entity or parameter validation.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Path and body identifiers disagree.
    #[error("path/body mismatch: {0}")]
    PathBodyMismatch(String),
    /// Tenant path parameter is zero.
    #[error("tenant id must be >= 1")]
    BadTenantId,
    /// Requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Request conflicts with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Structure confirmation failed validation.
    #[error("structure invalid")]
    StructureInvalid {
        /// Client-safe validation summary.
        summary: Box<Value>,
    },
    /// A configured directory limit was reached.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    /// Request is well-formed but semantically unevaluable.
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    /// Record exceeds a configured size cap.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
    /// Resolution or backend failure.
    #[error("internal failure: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the stable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::PathBodyMismatch(_) => "path_body_mismatch",
            Self::BadTenantId => "bad_tenant_id",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::StructureInvalid { .. } => "structure_invalid",
            Self::LimitExceeded(_) => "limit_exceeded",
            Self::Unprocessable(_) => "unprocessable",
            Self::CapacityExceeded(_) => "capacity_exceeded",
            Self::Internal(_) => "internal_failure",
        }
    }

    /// Returns the HTTP status for the variant.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::PathBodyMismatch(_)
            | Self::BadTenantId
            | Self::StructureInvalid { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::LimitExceeded(_) | Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::CapacityExceeded(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match &self {
            ApiError::StructureInvalid { summary } => Some(summary.as_ref().clone()),
            ApiError::BadTenantId => None,
            other => Some(json!(other.to_string())),
        };
        let body = ErrorBody {
            error: self.code().to_string(),
            detail,
        };
        (self.status(), Json(body)).into_response()
    }
}

// ============================================================================
// SECTION: Core Error Conversions
// ============================================================================

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(message) => Self::NotFound(message),
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::CapacityExceeded(message) => Self::CapacityExceeded(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<ResolutionError> for ApiError {
    fn from(error: ResolutionError) -> Self {
        match error {
            ResolutionError::KpiMissing(_)
            | ResolutionError::ComponentMissing { .. }
            | ResolutionError::SourceKpiUnset { .. }
            | ResolutionError::SourceKpiMissing { .. }
            | ResolutionError::PerspectiveUnassigned { .. }
            | ResolutionError::PerspectiveMissing { .. } => Self::NotFound(error.to_string()),
            ResolutionError::CycleDetected { .. } | ResolutionError::DepthExceeded { .. } => {
                Self::Internal(error.to_string())
            }
            ResolutionError::Store(store) => store.into(),
        }
    }
}

impl From<ConfirmationError> for ApiError {
    fn from(error: ConfirmationError) -> Self {
        match error {
            ConfirmationError::FiscalYearMissing { .. } => Self::NotFound(error.to_string()),
            ConfirmationError::StatusConflict { .. } => Self::Conflict(error.to_string()),
            ConfirmationError::Invalid { report } => {
                let summary = report.summary();
                let detail =
                    serde_json::to_value(&summary).unwrap_or_else(|_| json!("structure invalid"));
                Self::StructureInvalid {
                    summary: Box::new(detail),
                }
            }
            ConfirmationError::ConfirmationMissing { .. } | ConfirmationError::Hashing(_) => {
                Self::Internal(error.to_string())
            }
            ConfirmationError::Store(store) => store.into(),
        }
    }
}

impl From<AttainmentError> for ApiError {
    fn from(error: AttainmentError) -> Self {
        match error {
            AttainmentError::BadDecimal { .. } => Self::Validation(error.to_string()),
            AttainmentError::ZeroSpan { .. } | AttainmentError::InvertedSpan { .. } => {
                Self::Unprocessable(error.to_string())
            }
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(error: LifecycleError) -> Self {
        match error {
            LifecycleError::FiscalYearMissing { .. } => Self::NotFound(error.to_string()),
            LifecycleError::InvalidTransition { .. }
            | LifecycleError::ConfirmationRequired { .. } => Self::Conflict(error.to_string()),
            LifecycleError::Store(store) => store.into(),
        }
    }
}
