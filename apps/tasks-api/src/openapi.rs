use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Tasks API",
        version = "0.1.0",
        description = "Create, update and list tasks, with monthly completion metrics"
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
struct BaseDoc;

/// Service document: base info plus the task endpoints, which are mounted
/// directly under `/api`.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseDoc::openapi();
        doc.merge(domain_tasks::ApiDoc::openapi());
        doc
    }
}
