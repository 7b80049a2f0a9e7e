//! Error markers returned in `{"error": ...}` bodies.
//!
//! Each code carries:
//! - the marker string clients match on (e.g. "NO_VALID_FIELDS")
//! - an integer code for logs and dashboards (e.g. 1001)
//! - the HTTP status it is served with
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::DateErr;
//! assert_eq!(code.as_str(), "DATE_ERR");
//! assert_eq!(code.code(), 1002);
//! assert_eq!(code.status().as_u16(), 400);
//! ```

use axum::http::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Client errors (1000-1099)
    /// Update request carried none of the known task fields
    NoValidFields,

    /// `date` query parameter is not `MM-YYYY`
    DateErr,

    /// Path task id is not an integer
    InvalidTaskId,

    /// `startDate` / `taskStart` list filter could not be parsed
    InvalidFilter,

    /// Request body is not valid JSON for the target type
    InvalidJson,

    /// Query string could not be decoded (e.g. a repeated parameter)
    InvalidQuery,

    // Not found (1100-1199)
    /// Aggregate query produced no row
    DataNotFound,

    /// No route matched
    NotFound,

    MethodNotAllowed,

    // Store errors (2000-2099)
    /// A statement failed in the database; served as "Internal Server Error"
    DatabaseError,
}

impl ErrorCode {
    /// Marker placed in the response body.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoValidFields => "NO_VALID_FIELDS",
            ErrorCode::DateErr => "DATE_ERR",
            ErrorCode::InvalidTaskId => "INVALID_TASK_ID",
            ErrorCode::InvalidFilter => "INVALID_FILTER",
            ErrorCode::InvalidJson => "INVALID_JSON",
            ErrorCode::InvalidQuery => "INVALID_QUERY",
            ErrorCode::DataNotFound => "DATA_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::DatabaseError => "Internal Server Error",
        }
    }

    /// Integer code for structured logs. Never sent to clients.
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::NoValidFields => 1001,
            ErrorCode::DateErr => 1002,
            ErrorCode::InvalidTaskId => 1003,
            ErrorCode::InvalidFilter => 1004,
            ErrorCode::InvalidJson => 1005,
            ErrorCode::InvalidQuery => 1006,
            ErrorCode::DataNotFound => 1101,
            ErrorCode::NotFound => 1104,
            ErrorCode::MethodNotAllowed => 1105,
            ErrorCode::DatabaseError => 2001,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NoValidFields
            | ErrorCode::DateErr
            | ErrorCode::InvalidTaskId
            | ErrorCode::InvalidFilter
            | ErrorCode::InvalidJson
            | ErrorCode::InvalidQuery => StatusCode::BAD_REQUEST,
            ErrorCode::DataNotFound | ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
