//! Tasks Domain
//!
//! Task records with a partial-update endpoint, paginated listing and
//! monthly completion metrics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Request rules, defaults
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Statements  │  ← Parameterized SQL
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{handlers, PgTaskRepository, TaskService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let service = TaskService::new(PgTaskRepository::new(db));
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod statements;

// Re-export commonly used types
pub use error::{TaskError, TaskResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateTask, Field, Flag, ListTasksQuery, MonthYear, Pagination, StatusCounts, StatusQuery,
    Task, TaskChanges, TaskColumn, TaskFilter, TaskSettings, TaskStatusReport, Text, UpdateTask,
};
pub use postgres::PgTaskRepository;
pub use repository::TaskRepository;
pub use service::TaskService;
