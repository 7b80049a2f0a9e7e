use std::sync::Arc;
use tracing::instrument;

use crate::error::{TaskError, TaskResult};
use crate::models::{
    CreateTask, ListTasksQuery, StatusQuery, Task, TaskSettings, TaskStatusReport, UpdateTask,
};
use crate::repository::TaskRepository;

/// Service layer for task business logic
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
    settings: TaskSettings,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_settings(repository, TaskSettings::default())
    }

    pub fn with_settings(repository: R, settings: TaskSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            settings,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<()> {
        self.repository.create(input).await
    }

    /// Writes the fields present in `input`. An unknown id is not an error;
    /// the returned row count is 0.
    #[instrument(skip(self, input), fields(task_id = id))]
    pub async fn update_task(&self, id: i64, input: UpdateTask) -> TaskResult<u64> {
        let changes = input.into_changes();
        if changes.is_empty() {
            return Err(TaskError::NoValidFields);
        }

        self.repository.update(id, changes).await
    }

    #[instrument(skip(self))]
    pub async fn list_tasks(&self, query: ListTasksQuery) -> TaskResult<Vec<Task>> {
        let filter = query.into_filter(self.settings.max_per_page)?;
        self.repository.list(filter).await
    }

    #[instrument(skip(self))]
    pub async fn task_status(&self, query: StatusQuery) -> TaskResult<TaskStatusReport> {
        let period = query.into_period()?;

        let counts = self
            .repository
            .status_counts(period.clone())
            .await?
            .ok_or(TaskError::DataNotFound)?;

        Ok(TaskStatusReport::new(period.as_ref(), counts))
    }
}
