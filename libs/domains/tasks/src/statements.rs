//! SQL for the task store.
//!
//! Every statement is parameterized: request data only ever travels as bound
//! values, and column names come from [`TaskColumn`].

use sea_orm::{DbBackend, Statement, Value};
use strum::IntoEnumIterator;

use crate::models::{MonthYear, TaskChanges, TaskColumn, TaskFilter};

const TASK_SELECT: &str = r#"SELECT id, task_name, task_details, deadline, completed, priority, set_reminder, "taskStart" AS task_start, "startDate" AS start_date FROM tasks"#;

const STATUS_SELECT: &str = "SELECT \
    SUM(CASE WHEN completed = 0 THEN 1 ELSE 0 END) AS open_tasks, \
    SUM(CASE WHEN completed = 1 THEN 0 ELSE 1 END) AS inprogress_tasks, \
    SUM(CASE WHEN completed = 1 THEN 1 ELSE 0 END) AS completed_tasks \
    FROM tasks";

fn placeholders(from: usize, count: usize) -> String {
    (from..from + count)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Insert with all eight writable columns; `values` must be in column order.
pub fn insert_task(values: Vec<Value>) -> Statement {
    let columns = TaskColumn::iter()
        .map(|c| c.sql())
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO tasks ({columns}) VALUES ({})",
        placeholders(1, values.len())
    );
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

/// Partial update touching only the changed columns. `None` when there is
/// nothing to set.
pub fn update_task(id: i64, changes: TaskChanges) -> Option<Statement> {
    if changes.is_empty() {
        return None;
    }

    let mut assignments = Vec::with_capacity(changes.len());
    let mut values = Vec::with_capacity(changes.len() + 1);
    for (i, (column, value)) in changes.iter().enumerate() {
        assignments.push(format!("{} = ${}", column.sql(), i + 1));
        values.push(value.clone());
    }
    values.push(id.into());

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = ${}",
        assignments.join(", "),
        values.len()
    );
    Some(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
}

/// One page of tasks, ordered by id. `$1`/`$2` are limit and offset, filters
/// follow.
pub fn select_tasks(filter: &TaskFilter) -> Statement {
    let mut sql = format!("{TASK_SELECT} WHERE TRUE");
    let mut values: Vec<Value> = vec![
        filter.pagination.limit().into(),
        filter.pagination.offset().into(),
    ];

    if let Some(start_date) = filter.start_date {
        values.push(start_date.into());
        sql.push_str(&format!(
            " AND {} = ${}",
            TaskColumn::StartDate.sql(),
            values.len()
        ));
    }
    if let Some(task_start) = filter.task_start {
        values.push(task_start.into());
        sql.push_str(&format!(
            " AND {} = ${}",
            TaskColumn::TaskStart.sql(),
            values.len()
        ));
    }

    sql.push_str(" ORDER BY id LIMIT $1 OFFSET $2");
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

/// Completion counts, optionally limited to deadlines in one month.
pub fn select_status_counts(period: Option<&MonthYear>) -> Statement {
    match period {
        Some(month) => Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("{STATUS_SELECT} WHERE to_char(deadline, 'MM-YYYY') = $1"),
            [month.as_str().into()],
        ),
        None => Statement::from_sql_and_values(DbBackend::Postgres, STATUS_SELECT, []),
    }
}
