use crate::models::ErrorResponse;
use log::debug;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, Request};

/// Errors Rocket raises before a handler runs (unmatched route, body that
/// does not parse) get the same `{detail}` body as handler errors.
#[catch(default)]
pub fn default_catcher(status: Status, req: &Request<'_>) -> (Status, Json<ErrorResponse>) {
    debug!("{} {} -> {}", req.method(), req.uri(), status);
    (
        status,
        Json(ErrorResponse {
            detail: status.to_string(),
        }),
    )
}
