//! Lenient JSON body extractor.

use crate::errors::{AppError, ErrorCode};
use axum::{
    body::Bytes,
    extract::{FromRequest, Json, Request, rejection::JsonRejection},
    http::{HeaderMap, header},
};
use serde::de::DeserializeOwned;

/// JSON request body that reads an empty body as `{}`.
///
/// A client that sends no body at all gets the same treatment as one that
/// sends an empty object, so endpoints whose fields are all optional keep
/// working. A non-empty body must be JSON (by content type and by syntax),
/// otherwise the request is answered with `400 {"error": "INVALID_JSON"}`.
///
/// ```ignore
/// async fn create(JsonBody(payload): JsonBody<CreateTask>) -> StatusCode {
///     StatusCode::CREATED
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(JsonRejection::from)?;

        let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
            Bytes::from_static(b"{}")
        } else if is_json {
            bytes
        } else {
            return Err(AppError::BadRequest(ErrorCode::InvalidJson));
        };

        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(JsonBody(value))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}
