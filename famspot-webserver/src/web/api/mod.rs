use std::result;

use rocket::{
    self, catch, catchers, get,
    http::Status,
    post,
    response::{self, status, Responder},
    routes,
    serde::json::{Error as JsonError, Json},
    Catcher, FromForm, Request, Route, State,
};
use uuid::Uuid;

use super::{guards::*, sqlite, Cfg};
use crate::{
    adapters::json::{self, from_json, to_json, ErrorCode},
    core::{prelude::*, usecases},
};
use famspot_application::prelude as flows;

mod catchers;
mod error;
mod places;
mod reviews;
mod util;

pub use self::error::Error as ApiError;


type Result<T> = result::Result<Json<T>, ApiError>;
type JsonResult<'a, T> = result::Result<Json<T>, JsonError<'a>>;

pub fn routes() -> Vec<Route> {
    routes![
        // ---   places   --- //
        places::get_places,
        places::get_place,
        places::get_place_reviews,
        // ---   reviews   --- //
        reviews::post_review,
        // ---   reference data   --- //
        util::get_categories,
        util::get_features,
        util::get_age_bands,
        util::get_review_axes,
        // ---   server   --- //
        util::get_ping,
        util::get_version,
    ]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![
        catchers::bad_request,
        catchers::unauthorized,
        catchers::forbidden,
        catchers::not_found,
        catchers::method_not_allowed,
        catchers::unprocessable_entity,
        catchers::too_many_requests,
        catchers::internal_server_error,
        catchers::default_catcher,
    ]
}

/// A fresh identifier for correlating an error response
/// with the server logs.
fn new_trace_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("req_{}", &uuid[..12])
}

fn error_response(
    code: ErrorCode,
    message: impl Into<String>,
    details: serde_json::Value,
) -> (Status, Json<json::ErrorResponse>) {
    let status = Status::from_code(code.status_code()).unwrap_or(Status::InternalServerError);
    let body = json::ErrorResponse {
        error: json::ErrorBody {
            code,
            message: message.into(),
            details,
            trace_id: new_trace_id(),
        },
    };
    (status, Json(body))
}

fn json_error_response<'r, 'o: 'r>(
    req: &'r Request<'_>,
    code: ErrorCode,
    message: String,
    details: serde_json::Value,
) -> response::Result<'o> {
    error_response(code, message, details).respond_to(req)
}
