//! Reusable OpenAPI response types for the error markers.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({ "error": "Internal Server Error" })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - no recognised task field in the body",
    content_type = "application/json",
    example = json!({ "error": "NO_VALID_FIELDS" })
)]
pub struct NoValidFieldsResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - date is not MM-YYYY",
    content_type = "application/json",
    example = json!({ "error": "DATE_ERR" })
)]
pub struct DateErrResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - task id is not an integer",
    content_type = "application/json",
    example = json!({ "error": "INVALID_TASK_ID" })
)]
pub struct InvalidTaskIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - startDate or taskStart filter is malformed",
    content_type = "application/json",
    example = json!({ "error": "INVALID_FILTER" })
)]
pub struct InvalidFilterResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - body is not valid JSON for this endpoint",
    content_type = "application/json",
    example = json!({ "error": "INVALID_JSON" })
)]
pub struct InvalidJsonResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "No data for the requested period",
    content_type = "application/json",
    example = json!({ "error": "DATA_NOT_FOUND" })
)]
pub struct DataNotFoundResponse(pub ErrorResponse);
