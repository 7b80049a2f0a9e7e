//! Query string extractor with JSON error bodies.

use crate::errors::{AppError, ErrorCode};
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// `Query<T>` whose rejection is `400 {"error": "INVALID_QUERY"}` instead of
/// axum's plain-text body.
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::info!(error = %e.body_text(), "Rejecting query string");
                AppError::BadRequest(ErrorCode::InvalidQuery)
            })?;
        Ok(QueryParams(value))
    }
}
