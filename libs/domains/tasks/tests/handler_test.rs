//! Handler tests for the tasks domain
//!
//! These run the real router, service and PostgreSQL repository against a
//! sea-orm `MockDatabase`, so they check:
//! - Request parsing (JSON bodies, path ids, query strings)
//! - Response bodies and status codes
//! - The exact SQL and bound values sent to the store
//!
//! Tests against a live database live in `integration_test.rs`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, NaiveTime};
use domain_tasks::*;
use http_body_util::BodyExt;
use sea_orm::{
    DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, Transaction, Value,
};
use serde_json::{Value as Json, json};
use std::collections::BTreeMap;
use test_utils::assertions::assert_error_body;
use tower::ServiceExt; // For oneshot()

const INSERT_SQL: &str = r#"INSERT INTO tasks (task_name, task_details, deadline, completed, priority, set_reminder, "taskStart", "startDate") VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#;
const SELECT_SQL: &str = r#"SELECT id, task_name, task_details, deadline, completed, priority, set_reminder, "taskStart" AS task_start, "startDate" AS start_date FROM tasks WHERE TRUE"#;
const STATUS_SQL: &str = "SELECT SUM(CASE WHEN completed = 0 THEN 1 ELSE 0 END) AS open_tasks, SUM(CASE WHEN completed = 1 THEN 0 ELSE 1 END) AS inprogress_tasks, SUM(CASE WHEN completed = 1 THEN 1 ELSE 0 END) AS completed_tasks FROM tasks";

fn app(db: &DatabaseConnection) -> Router {
    handlers::router(TaskService::new(PgTaskRepository::new(db.clone())))
}

fn exec_ok(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Json) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn task_row(id: i64, name: &str) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", Value::from(id)),
        ("task_name", Value::from(Some(name.to_string()))),
        ("task_details", Value::from(None::<String>)),
        (
            "deadline",
            Value::from(NaiveDate::from_ymd_opt(2024, 5, 31).map(|d| d.and_hms_opt(17, 0, 0).unwrap())),
        ),
        ("completed", Value::from(Some(0i16))),
        ("priority", Value::from(Some("high".to_string()))),
        ("set_reminder", Value::from(None::<i16>)),
        ("task_start", Value::from(NaiveTime::from_hms_opt(9, 30, 0))),
        ("start_date", Value::from(NaiveDate::from_ymd_opt(2024, 5, 20))),
    ])
}

fn status_row(open: i64, in_progress: i64, completed: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("open_tasks", Value::from(Some(open))),
        ("inprogress_tasks", Value::from(Some(in_progress))),
        ("completed_tasks", Value::from(Some(completed))),
    ])
}

// createTask

#[tokio::test]
async fn test_create_task_returns_201_and_binds_every_column() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_ok(1)])
        .into_connection();

    let body = json!({
        "task_name": "Write report",
        "task_details": "Q2 numbers",
        "deadline": "2024-05-31 17:00:00",
        "completed": 0,
        "priority": "high",
        "set_reminder": true,
        "taskStart": "09:30",
        "startDate": "2024-05-20"
    });
    let (status, json) = send(app(&db), json_request("POST", "/createTask", &body.to_string())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json, json!({"message": "SUCCESS"}));

    let deadline = NaiveDate::from_ymd_opt(2024, 5, 31)
        .unwrap()
        .and_hms_opt(17, 0, 0)
        .unwrap();
    assert_eq!(
        db.into_transaction_log(),
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            INSERT_SQL,
            [
                Value::from(Some("Write report".to_string())),
                Value::from(Some("Q2 numbers".to_string())),
                Value::from(Some(deadline)),
                Value::from(Some(0i16)),
                Value::from(Some("high".to_string())),
                Value::from(Some(1i16)),
                Value::from(NaiveTime::from_hms_opt(9, 30, 0)),
                Value::from(NaiveDate::from_ymd_opt(2024, 5, 20)),
            ],
        )]
    );
}

#[tokio::test]
async fn test_create_task_accepts_loosely_typed_scalars() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_ok(1)])
        .into_connection();

    let body = json!({
        "task_name": 42,
        "task_details": false,
        "completed": "0",
        "priority": 2,
        "set_reminder": 1.0
    });
    let (status, json) = send(app(&db), json_request("POST", "/createTask", &body.to_string())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "SUCCESS");
    assert_eq!(
        db.into_transaction_log(),
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            INSERT_SQL,
            [
                Value::from(Some("42".to_string())),
                Value::from(Some("false".to_string())),
                Value::from(None::<chrono::NaiveDateTime>),
                Value::from(Some(0i16)),
                Value::from(Some("2".to_string())),
                Value::from(Some(1i16)),
                Value::from(None::<NaiveTime>),
                Value::from(None::<NaiveDate>),
            ],
        )]
    );
}

#[tokio::test]
async fn test_create_task_with_empty_body_inserts_nulls() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_ok(1)])
        .into_connection();

    let (status, json) = send(app(&db), json_request("POST", "/createTask", "")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "SUCCESS");

    let log = db.into_transaction_log();
    assert_eq!(
        log,
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            INSERT_SQL,
            CreateTask::default().into_values(),
        )]
    );
}

#[tokio::test]
async fn test_create_task_rejects_malformed_json() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let (status, json) = send(app(&db), json_request("POST", "/createTask", "{\"task_name\":")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&json, "INVALID_JSON");
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_create_task_rejects_unparseable_deadline() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let body = json!({"task_name": "A", "deadline": "next friday"});
    let (status, json) = send(app(&db), json_request("POST", "/createTask", &body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&json, "INVALID_JSON");
}

#[tokio::test]
async fn test_create_task_store_failure_is_generic_500() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();

    let (status, json) = send(app(&db), json_request("POST", "/createTask", "{}")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_body(&json, "Internal Server Error");
}

// updateTask

#[tokio::test]
async fn test_update_task_sets_only_sent_fields() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_ok(1)])
        .into_connection();

    let body = json!({"priority": "low", "completed": 1, "task_details": null});
    let (status, json) = send(app(&db), json_request("PUT", "/updateTask/12", &body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"message": "Task updated successfully"}));

    assert_eq!(
        db.into_transaction_log(),
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            "UPDATE tasks SET task_details = $1, completed = $2, priority = $3 WHERE id = $4",
            [
                Value::from(None::<String>),
                Value::from(Some(1i16)),
                Value::from(Some("low".to_string())),
                Value::from(12i64),
            ],
        )]
    );
}

#[tokio::test]
async fn test_update_task_quotes_camel_case_columns() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_ok(1)])
        .into_connection();

    let body = json!({"startDate": "2024-06-01", "taskStart": "08:15:00"});
    let (status, _) = send(app(&db), json_request("PUT", "/updateTask/3", &body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        db.into_transaction_log(),
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"UPDATE tasks SET "taskStart" = $1, "startDate" = $2 WHERE id = $3"#,
            [
                Value::from(NaiveTime::from_hms_opt(8, 15, 0)),
                Value::from(NaiveDate::from_ymd_opt(2024, 6, 1)),
                Value::from(3i64),
            ],
        )]
    );
}

async fn update_single_field(body: Json) -> (StatusCode, Vec<Transaction>) {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_ok(1)])
        .into_connection();

    let (status, _) = send(app(&db), json_request("PUT", "/updateTask/5", &body.to_string())).await;
    (status, db.into_transaction_log())
}

fn single_update(column: &str, value: Value) -> Vec<Transaction> {
    vec![Transaction::from_sql_and_values(
        DatabaseBackend::Postgres,
        format!("UPDATE tasks SET {column} = $1 WHERE id = $2"),
        [value, Value::from(5i64)],
    )]
}

#[tokio::test]
async fn test_update_task_stores_numeric_priority_as_text() {
    let (status, log) = update_single_field(json!({"priority": 2})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(log, single_update("priority", Value::from(Some("2".to_string()))));
}

#[tokio::test]
async fn test_update_task_stores_numeric_name_as_text() {
    let (status, log) = update_single_field(json!({"task_name": 42})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(log, single_update("task_name", Value::from(Some("42".to_string()))));
}

#[tokio::test]
async fn test_update_task_accepts_string_flag() {
    let (status, log) = update_single_field(json!({"completed": "1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(log, single_update("completed", Value::from(Some(1i16))));
}

#[tokio::test]
async fn test_update_task_accepts_integral_float_flag() {
    let (status, log) = update_single_field(json!({"set_reminder": 1.0})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(log, single_update("set_reminder", Value::from(Some(1i16))));
}

#[tokio::test]
async fn test_update_task_rejects_fractional_flag() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let (status, json) = send(
        app(&db),
        json_request("PUT", "/updateTask/5", r#"{"completed": 0.5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&json, "INVALID_JSON");
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_update_task_without_known_fields_is_400() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let (status, json) = send(
        app(&db),
        json_request("PUT", "/updateTask/1", r#"{"title": "ignored"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&json, "NO_VALID_FIELDS");
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_update_task_with_empty_body_is_400() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let (status, json) = send(app(&db), json_request("PUT", "/updateTask/1", "")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&json, "NO_VALID_FIELDS");
}

#[tokio::test]
async fn test_update_task_rejects_non_integer_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let (status, json) = send(
        app(&db),
        json_request("PUT", "/updateTask/abc", r#"{"priority": "low"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&json, "INVALID_TASK_ID");
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_update_unknown_task_still_succeeds() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_ok(0)])
        .into_connection();

    let (status, json) = send(
        app(&db),
        json_request("PUT", "/updateTask/999", r#"{"priority": "low"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Task updated successfully");
}

#[tokio::test]
async fn test_update_task_store_failure_is_generic_500() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_errors([DbErr::Custom("lock timeout".to_string())])
        .into_connection();

    let (status, json) = send(
        app(&db),
        json_request("PUT", "/updateTask/1", r#"{"priority": "low"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_body(&json, "Internal Server Error");
}

// tasks

#[tokio::test]
async fn test_list_tasks_uses_default_page() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![task_row(1, "A"), task_row(2, "B")]])
        .into_connection();

    let (status, json) = send(app(&db), get("/tasks")).await;

    assert_eq!(status, StatusCode::OK);
    let tasks = json["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["id"], 1);
    assert_eq!(tasks[0]["task_name"], "A");
    assert_eq!(tasks[0]["taskStart"], "09:30:00");
    assert_eq!(tasks[0]["startDate"], "2024-05-20");
    assert_eq!(tasks[0]["task_details"], Json::Null);

    assert_eq!(
        db.into_transaction_log(),
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            format!("{SELECT_SQL} ORDER BY id LIMIT $1 OFFSET $2"),
            [Value::from(10i64), Value::from(0i64)],
        )]
    );
}

#[tokio::test]
async fn test_list_tasks_with_page_and_filters() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
        .into_connection();

    let (status, json) = send(
        app(&db),
        get("/tasks?page=3&perPage=5&startDate=2024-05-20&taskStart=09:30"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"tasks": []}));

    assert_eq!(
        db.into_transaction_log(),
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            format!(
                r#"{SELECT_SQL} AND "startDate" = $3 AND "taskStart" = $4 ORDER BY id LIMIT $1 OFFSET $2"#
            ),
            [
                Value::from(5i64),
                Value::from(10i64),
                Value::from(NaiveDate::from_ymd_opt(2024, 5, 20)),
                Value::from(NaiveTime::from_hms_opt(9, 30, 0)),
            ],
        )]
    );
}

#[tokio::test]
async fn test_list_tasks_falls_back_on_bad_paging() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
        .into_connection();

    let (status, _) = send(app(&db), get("/tasks?page=zero&perPage=-5&startDate=")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        db.into_transaction_log(),
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            format!("{SELECT_SQL} ORDER BY id LIMIT $1 OFFSET $2"),
            [Value::from(10i64), Value::from(0i64)],
        )]
    );
}

#[tokio::test]
async fn test_list_tasks_rejects_malformed_filter() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let (status, json) = send(app(&db), get("/tasks?startDate=20-05-2024")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&json, "INVALID_FILTER");
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_list_tasks_store_failure_is_generic_500() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("relation does not exist".to_string())])
        .into_connection();

    let (status, json) = send(app(&db), get("/tasks")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_body(&json, "Internal Server Error");
}

// taskStatus

#[tokio::test]
async fn test_task_status_overall() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![status_row(2, 3, 4)]])
        .into_connection();

    let (status, json) = send(app(&db), get("/taskStatus")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "date": "Overall",
            "metrics": {"open_tasks": 2, "inprogress_tasks": 3, "completed_tasks": 4}
        })
    );

    assert_eq!(
        db.into_transaction_log(),
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            STATUS_SQL,
            []
        )]
    );
}

#[tokio::test]
async fn test_task_status_for_month() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![status_row(0, 1, 1)]])
        .into_connection();

    let (status, json) = send(app(&db), get("/taskStatus?date=05-2024")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["date"], "05-2024");
    assert_eq!(json["metrics"]["completed_tasks"], 1);

    assert_eq!(
        db.into_transaction_log(),
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            format!("{STATUS_SQL} WHERE to_char(deadline, 'MM-YYYY') = $1"),
            [Value::from("05-2024")],
        )]
    );
}

#[tokio::test]
async fn test_task_status_empty_month_reports_nulls() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![BTreeMap::from([
            ("open_tasks", Value::from(None::<i64>)),
            ("inprogress_tasks", Value::from(None::<i64>)),
            ("completed_tasks", Value::from(None::<i64>)),
        ])]])
        .into_connection();

    let (status, json) = send(app(&db), get("/taskStatus?date=01-1990")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["metrics"],
        json!({"open_tasks": null, "inprogress_tasks": null, "completed_tasks": null})
    );
}

#[tokio::test]
async fn test_task_status_rejects_bad_date() {
    for date in ["13-2024", "5-2024", "2024-05", "05/2024"] {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let (status, json) = send(app(&db), get(&format!("/taskStatus?date={date}"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{date}");
        assert_error_body(&json, "DATE_ERR");
        assert!(db.into_transaction_log().is_empty());
    }
}

#[tokio::test]
async fn test_task_status_without_row_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
        .into_connection();

    let (status, json) = send(app(&db), get("/taskStatus")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&json, "DATA_NOT_FOUND");
}

#[tokio::test]
async fn test_task_status_store_failure_is_generic_500() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("timeout".to_string())])
        .into_connection();

    let (status, json) = send(app(&db), get("/taskStatus?date=05-2024")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_body(&json, "Internal Server Error");
}
