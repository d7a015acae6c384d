//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use cloudprint_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}

/// HTTP-facing wrapper around [`AppError`].
///
/// Handlers return this so that `?` on any service call produces the
/// right status and wire code.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code) = match &err.kind {
            ErrorKind::MissingCredential => (StatusCode::UNAUTHORIZED, "missing_key"),
            ErrorKind::InvalidCredential => (StatusCode::FORBIDDEN, "invalid_key"),
            ErrorKind::LicenseInactive => (StatusCode::FORBIDDEN, "expired_key"),
            ErrorKind::QuotaExceeded => (StatusCode::FORBIDDEN, "limit_reached"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "invalid_request"),
            _ => {
                tracing::error!(error = %err.message, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = ApiErrorResponse {
            error: err.message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
