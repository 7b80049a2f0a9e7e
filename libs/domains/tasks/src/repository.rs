use async_trait::async_trait;

use crate::error::TaskResult;
use crate::models::{CreateTask, MonthYear, StatusCounts, Task, TaskChanges, TaskFilter};

/// Repository trait for task persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task
    async fn create(&self, input: CreateTask) -> TaskResult<()>;

    /// Apply `changes` to the task with `id`, returning the number of rows
    /// touched (0 for an unknown id).
    async fn update(&self, id: i64, changes: TaskChanges) -> TaskResult<u64>;

    /// One page of tasks matching `filter`, ordered by id
    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>>;

    /// Completion counts over all tasks or those due in `period`.
    /// `None` when the store returned no row.
    async fn status_counts(&self, period: Option<MonthYear>) -> TaskResult<Option<StatusCounts>>;
}
