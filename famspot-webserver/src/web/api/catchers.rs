use serde_json::Value;

use super::*;

type ErrorJson = (Status, Json<json::ErrorResponse>);

#[catch(400)]
pub fn bad_request() -> ErrorJson {
    error_response(ErrorCode::BadRequest, "Bad request", Value::Null)
}

#[catch(401)]
pub fn unauthorized() -> ErrorJson {
    error_response(
        ErrorCode::Unauthorized,
        "A valid bearer token is required",
        Value::Null,
    )
}

#[catch(403)]
pub fn forbidden() -> ErrorJson {
    error_response(ErrorCode::Forbidden, "Forbidden", Value::Null)
}

#[catch(404)]
pub fn not_found(req: &Request) -> ErrorJson {
    error_response(
        ErrorCode::NotFound,
        format!("No resource at {} {}", req.method(), req.uri().path()),
        Value::Null,
    )
}

#[catch(405)]
pub fn method_not_allowed(req: &Request) -> ErrorJson {
    error_response(
        ErrorCode::MethodNotAllowed,
        format!("Method {} is not allowed", req.method()),
        Value::Null,
    )
}

#[catch(422)]
pub fn unprocessable_entity() -> ErrorJson {
    error_response(ErrorCode::BadRequest, "Malformed request", Value::Null)
}

#[catch(429)]
pub fn too_many_requests() -> ErrorJson {
    error_response(ErrorCode::RateLimited, "Too many requests", Value::Null)
}

#[catch(500)]
pub fn internal_server_error() -> ErrorJson {
    error_response(
        ErrorCode::ServerError,
        "An unexpected error occurred",
        Value::Null,
    )
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request) -> ErrorJson {
    let (_, body) = if status.code < 500 {
        error_response(ErrorCode::BadRequest, status.to_string(), Value::Null)
    } else {
        error_response(
            ErrorCode::ServerError,
            "An unexpected error occurred",
            Value::Null,
        )
    };
    (status, body)
}
