//! Custom extractors for Axum handlers.
//!
//! Each rejects with [`AppError`](crate::errors::AppError) so bad input is
//! answered with the same `{"error": ...}` body as every other failure.

pub mod id_path;
pub mod json_body;
pub mod query_params;

pub use id_path::IdPath;
pub use json_body::JsonBody;
pub use query_params::QueryParams;
