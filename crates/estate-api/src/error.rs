//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use estate_auth::GateError;
use estate_core::error::{AppError, AuthFailure, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An `AppError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The status and error code for an error kind.
    pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
        match kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::Database | ErrorKind::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ErrorKind::Internal | ErrorKind::Configuration | ErrorKind::Serialization => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = Self::status_for(err.kind);

        let message = match err.kind {
            // Which check failed stays in the logs.
            ErrorKind::Forbidden => {
                tracing::debug!(reason = ?err.auth_failure, detail = %err.message, "Access denied");
                "Access denied".to_string()
            }
            ErrorKind::Database | ErrorKind::ServiceUnavailable => {
                tracing::warn!(error = %err, "Backing store unavailable");
                "Service temporarily unavailable".to_string()
            }
            ErrorKind::Internal | ErrorKind::Configuration | ErrorKind::Serialization => {
                tracing::error!(error = %err, source = ?err.source, "Internal server error");
                "Internal server error".to_string()
            }
            _ => err.message,
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        Self(failure.into())
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        Self(err.into())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reasons: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{field}: {}", reasons.join(", "))
            })
            .collect();
        fields.sort();
        Self(AppError::validation(fields.join("; ")))
    }
}
