pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response.
///
/// ```json
/// { "error": "NO_VALID_FIELDS" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable marker, see [`ErrorCode::as_str`]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            error: code.as_str().to_string(),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Only the marker reaches the client. Causes are logged here, once, with the
/// integer error code attached.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    /// A statement failed. `context` is the operation tag that goes in the log.
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("Bad Request: {0}")]
    BadRequest(ErrorCode),

    #[error("Not Found: {0}")]
    NotFound(ErrorCode),
}

impl AppError {
    pub fn database(context: &'static str, source: DbErr) -> Self {
        AppError::Database { context, source }
    }

    /// Marker and status this error is served with.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::JsonExtractorRejection(_) => ErrorCode::InvalidJson,
            AppError::Database { .. } => ErrorCode::DatabaseError,
            AppError::BadRequest(code) | AppError::NotFound(code) => *code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let status = match &self {
            AppError::JsonExtractorRejection(e) => {
                tracing::info!(
                    error_code = code.code(),
                    rejection_status = e.status().as_u16(),
                    "JSON extraction error: {}",
                    e.body_text()
                );
                code.status()
            }
            AppError::Database { context, source } => {
                tracing::error!(error_code = code.code(), error = ?source, "{}", context);
                code.status()
            }
            AppError::BadRequest(_) => {
                tracing::info!(error_code = code.code(), "Bad request: {}", code);
                code.status()
            }
            AppError::NotFound(_) => {
                tracing::info!(error_code = code.code(), "Not found: {}", code);
                StatusCode::NOT_FOUND
            }
        };

        error_response(status, code)
    }
}

/// Builds a `{"error": marker}` response with an explicit status.
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::DateErr);
/// ```
pub fn error_response(status: StatusCode, code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(code))).into_response()
}
