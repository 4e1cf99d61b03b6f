use axum::Json;

use crate::views::{self, HomePage};
use crate::web::AppError;

pub async fn home() -> Json<HomePage> {
    Json(views::home())
}

pub async fn not_found() -> AppError {
    AppError::page_not_found()
}
