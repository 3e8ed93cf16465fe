use rocket::{http::Status, serde::json::Json, Catcher, Request, Route};

use crate::error::{Error, ErrorBody};

pub mod admin;
pub mod auth;
pub mod public;
pub mod voter;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(admin::routes());
    routes.extend(public::routes());
    routes.extend(auth::routes());
    routes.extend(voter::routes());
    routes
}

/// Give failed guards and unmatched requests the same JSON body as handler errors.
pub fn catchers() -> Vec<Catcher> {
    catchers![
        bad_request,
        unauthorized,
        forbidden,
        not_found,
        unprocessable,
        internal_error
    ]
}

#[catch(400)]
fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody::new("Bad request"))
}

#[catch(401)]
fn unauthorized() -> Json<ErrorBody> {
    Json(ErrorBody::new(Error::Unauthenticated.to_string()))
}

#[catch(403)]
fn forbidden() -> Json<ErrorBody> {
    Json(ErrorBody::new(Error::Forbidden.to_string()))
}

#[catch(404)]
fn not_found(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new(format!("Not found: {}", req.uri())))
}

/// Bodies that parse but don't fit the expected shape are reported as plain bad input.
#[catch(422)]
fn unprocessable() -> (Status, Json<ErrorBody>) {
    (
        Status::BadRequest,
        Json(ErrorBody::new(Error::invalid_input("malformed request body").to_string())),
    )
}

#[catch(500)]
fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody::new("Internal server error"))
}
