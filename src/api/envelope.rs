//! Consistent error envelope for all API endpoints.
//!
//! Successful responses are the bare analysis payload; every failure is
//! wrapped in [`ApiErrorResponse`] so clients can branch on one JSON shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;

use crate::processing::AnalysisError;

/// Metadata included in every error response.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
    pub version: &'static str,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Error detail inside [`ApiErrorResponse`].
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Error response: `{ "error": { "code": "...", "message": "..." }, "meta": { ... } }`
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    fn build(status: StatusCode, code: &str, msg: impl Into<String>) -> Response {
        let body = Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: msg.into(),
            },
            meta: ResponseMeta::default(),
        };
        (status, axum::Json(body)).into_response()
    }

    pub fn bad_request(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg)
    }

    pub fn internal(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
    }

    /// Map a pipeline error to its status and code.
    ///
    /// Malformed or mis-shaped requests are 400; well-formed windows the
    /// analysis cannot handle (too short, zero variance) are 422.
    pub fn from_analysis(err: &AnalysisError) -> Response {
        let (status, code) = match err {
            AnalysisError::MalformedInput { .. } => (StatusCode::BAD_REQUEST, "MALFORMED_INPUT"),
            AnalysisError::ShapeMismatch { .. } => (StatusCode::BAD_REQUEST, "SHAPE_MISMATCH"),
            AnalysisError::InvalidSamplingRate(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_SAMPLING_RATE")
            }
            AnalysisError::InvalidParameter(_) => (StatusCode::BAD_REQUEST, "INVALID_PARAMETER"),
            AnalysisError::InsufficientLength { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_LENGTH")
            }
            AnalysisError::WindowTooLong { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "WINDOW_TOO_LONG")
            }
            AnalysisError::DegenerateInput { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DEGENERATE_INPUT")
            }
        };
        Self::build(status, code, err.to_string())
    }
}
