//! Pieces shared by every backend module

pub mod error;
pub mod retry;

pub use error::DatabaseError;
pub use retry::{RetryConfig, retry, retry_with_backoff};
