//! JSON wrapper shared by every `/api/v1` response.
//!
//! Catalog listings, the config view and solve results are returned as
//! `{"data": ..., "meta": ...}`; rejected requests and unknown styles as
//! `{"error": {"code", "message"}, "meta": ...}`. The `meta` block tells a
//! client which zonebrew build answered and when.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;

/// Route prefix version, matches the `/api/v1` nesting.
pub const API_VERSION: &str = "1";

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    /// RFC 3339, taken when the body is built
    pub timestamp: String,
    pub version: &'static str,
    /// Crate version of the answering service
    pub service_version: &'static str,
}

impl ResponseMeta {
    fn now() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: API_VERSION,
            service_version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// `{ "data": T, "meta": { ... } }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Response {
        let body = Self {
            data,
            meta: ResponseMeta::now(),
        };
        (StatusCode::OK, axum::Json(body)).into_response()
    }
}

/// Failure classes a client can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed JSON or a missing style name
    BadRequest,
    /// The style is not in the loaded catalog
    NotFound,
    /// The blocking search task panicked or was cancelled
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
}

/// `{ "error": { "code": "...", "message": "..." }, "meta": { ... } }`
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Response {
        let body = Self {
            error: ErrorDetail {
                code,
                message: message.into(),
            },
            meta: ResponseMeta::now(),
        };
        (code.status(), axum::Json(body)).into_response()
    }

    pub fn not_found(message: impl Into<String>) -> Response {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Response {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Response {
        Self::new(ErrorCode::InternalError, message)
    }
}
