use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult};

use crate::{
    error::{TaskError, TaskResult, tags},
    models::{CreateTask, MonthYear, StatusCounts, Task, TaskChanges, TaskFilter},
    repository::TaskRepository,
    statements,
};

/// PostgreSQL-backed task repository
#[derive(Clone)]
pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<()> {
        let stmt = statements::insert_task(input.into_values());

        let result = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(TaskError::store(tags::CREATE))?;

        tracing::info!(rows_affected = result.rows_affected(), "Created task");
        Ok(())
    }

    async fn update(&self, id: i64, changes: TaskChanges) -> TaskResult<u64> {
        let Some(stmt) = statements::update_task(id, changes) else {
            return Err(TaskError::NoValidFields);
        };

        let rows_affected = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(TaskError::store(tags::UPDATE))?
            .rows_affected();

        if rows_affected == 0 {
            tracing::debug!(task_id = id, "Update matched no task");
        } else {
            tracing::info!(task_id = id, rows_affected, "Updated task");
        }
        Ok(rows_affected)
    }

    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let stmt = statements::select_tasks(&filter);

        let tasks = Task::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(TaskError::store(tags::LIST))?;

        tracing::debug!(count = tasks.len(), page = filter.pagination.page, "Listed tasks");
        Ok(tasks)
    }

    async fn status_counts(&self, period: Option<MonthYear>) -> TaskResult<Option<StatusCounts>> {
        let stmt = statements::select_status_counts(period.as_ref());

        StatusCounts::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(TaskError::store(tags::STATUS))
    }
}
