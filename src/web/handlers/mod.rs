pub mod artists;
pub mod pages;
pub mod shows;
pub mod venues;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::mutations::{Failure, Notice};
use crate::views;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Send a mutation notice back with a status that matches its outcome.
pub(crate) fn notice_response(notice: Notice, redirect: Option<String>) -> Response {
    let status = match notice.failure {
        None => StatusCode::OK,
        Some(Failure::Validation) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(Failure::Form) => StatusCode::BAD_REQUEST,
        Some(Failure::NotFound) => StatusCode::NOT_FOUND,
        Some(Failure::Storage) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(views::notice(notice, redirect))).into_response()
}
