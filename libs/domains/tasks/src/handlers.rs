use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    IdPath, JsonBody, QueryParams,
    errors::responses::{
        DataNotFoundResponse, DateErrResponse, InternalServerErrorResponse,
        InvalidFilterResponse, InvalidJsonResponse, InvalidTaskIdResponse, NoValidFieldsResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::TaskResult;
use crate::models::{
    CreateTask, ListTasksQuery, MessageResponse, StatusCounts, StatusQuery, Task,
    TaskStatusReport, TasksResponse, UpdateTask,
};
use crate::repository::TaskRepository;
use crate::service::TaskService;

pub const TAG: &str = "Tasks";

pub const CREATED_MESSAGE: &str = "SUCCESS";
pub const UPDATED_MESSAGE: &str = "Task updated successfully";

/// OpenAPI documentation for the task endpoints
#[derive(OpenApi)]
#[openapi(
    paths(create_task, update_task, list_tasks, task_status),
    components(
        schemas(
            Task,
            CreateTask,
            UpdateTask,
            TasksResponse,
            TaskStatusReport,
            StatusCounts,
            MessageResponse
        ),
        responses(
            NoValidFieldsResponse,
            DateErrResponse,
            InvalidTaskIdResponse,
            InvalidFilterResponse,
            InvalidJsonResponse,
            DataNotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Task management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the task router with all HTTP endpoints
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/createTask", post(create_task))
        .route("/updateTask/{taskId}", put(update_task))
        .route("/tasks", get(list_tasks))
        .route("/taskStatus", get(task_status))
        .with_state(shared_service)
}

/// Create a task
#[utoipa::path(
    post,
    path = "/createTask",
    tag = TAG,
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = MessageResponse,
            example = json!({"message": "SUCCESS"})),
        (status = 400, response = InvalidJsonResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    JsonBody(input): JsonBody<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    service.create_task(input).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new(CREATED_MESSAGE))))
}

/// Update the fields present in the body
///
/// An id that matches no task still answers 200.
#[utoipa::path(
    put,
    path = "/updateTask/{taskId}",
    tag = TAG,
    params(
        ("taskId" = i64, Path, description = "Task ID")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated", body = MessageResponse,
            example = json!({"message": "Task updated successfully"})),
        (status = 400, response = NoValidFieldsResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<UpdateTask>,
) -> TaskResult<Json<MessageResponse>> {
    service.update_task(id, input).await?;
    Ok(Json(MessageResponse::new(UPDATED_MESSAGE)))
}

/// List tasks, one page at a time
#[utoipa::path(
    get,
    path = "/tasks",
    tag = TAG,
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Page of tasks", body = TasksResponse),
        (status = 400, response = InvalidFilterResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    QueryParams(query): QueryParams<ListTasksQuery>,
) -> TaskResult<Json<TasksResponse>> {
    let tasks = service.list_tasks(query).await?;
    Ok(Json(TasksResponse { tasks }))
}

/// Completion metrics, overall or for one month
#[utoipa::path(
    get,
    path = "/taskStatus",
    tag = TAG,
    params(StatusQuery),
    responses(
        (status = 200, description = "Status counts", body = TaskStatusReport),
        (status = 400, response = DateErrResponse),
        (status = 404, response = DataNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn task_status<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    QueryParams(query): QueryParams<StatusQuery>,
) -> TaskResult<Json<TaskStatusReport>> {
    let report = service.task_status(query).await?;
    Ok(Json(report))
}
