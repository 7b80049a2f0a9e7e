use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use sea_orm::DbErr;
use thiserror::Error;

/// Log tags for store failures, one per operation.
pub mod tags {
    pub const CREATE: &str = "ERR_CREATE_TASK";
    pub const UPDATE: &str = "ERR_UPDATE_TASK";
    pub const LIST: &str = "ERR_RETRIEVE_TASKS";
    pub const STATUS: &str = "ERR_TASK_STATUS";
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("No valid fields to update")]
    NoValidFields,

    #[error("Invalid date {0:?}, expected MM-YYYY")]
    InvalidDate(String),

    #[error("Invalid {name} filter: {value:?}")]
    InvalidFilter { name: &'static str, value: String },

    #[error("No task data found")]
    DataNotFound,

    #[error("{tag}: {source}")]
    Store {
        tag: &'static str,
        #[source]
        source: DbErr,
    },
}

pub type TaskResult<T> = Result<T, TaskError>;

impl TaskError {
    /// Adapter for `map_err` that tags a store failure with its operation.
    ///
    /// ```ignore
    /// db.execute_raw(stmt).await.map_err(TaskError::store(tags::CREATE))?;
    /// ```
    pub fn store(tag: &'static str) -> impl FnOnce(DbErr) -> TaskError {
        move |source| TaskError::Store { tag, source }
    }
}

/// Convert TaskError to AppError for standardized error responses
impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NoValidFields => AppError::BadRequest(ErrorCode::NoValidFields),
            TaskError::InvalidDate(_) => AppError::BadRequest(ErrorCode::DateErr),
            TaskError::InvalidFilter { .. } => AppError::BadRequest(ErrorCode::InvalidFilter),
            TaskError::DataNotFound => AppError::NotFound(ErrorCode::DataNotFound),
            TaskError::Store { tag, source } => AppError::database(tag, source),
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
