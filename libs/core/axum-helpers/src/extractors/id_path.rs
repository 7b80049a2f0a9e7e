//! Integer id path parameter extractor.

use crate::errors::{AppError, ErrorCode};
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extracts a single integer path parameter such as `/updateTask/{taskId}`.
///
/// Anything that does not parse as `i64` is rejected with
/// `400 {"error": "INVALID_TASK_ID"}` before the handler runs.
///
/// ```ignore
/// async fn update(IdPath(id): IdPath) -> String {
///     format!("task {id}")
/// }
///
/// let app = Router::new().route("/updateTask/{taskId}", put(update));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest(ErrorCode::InvalidTaskId))?;

        raw.trim().parse::<i64>().map(IdPath).map_err(|_| {
            tracing::debug!(raw_id = %raw, "Rejecting non-integer id");
            AppError::BadRequest(ErrorCode::InvalidTaskId)
        })
    }
}
