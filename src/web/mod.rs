//! HTTP surface: routes, handlers and error pages.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppContext;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

pub fn router(ctx: AppContext) -> Router {
    use handlers::{artists, pages, shows, venues};

    Router::new()
        .route("/", get(pages::home))
        .route("/venues", get(venues::index))
        .route("/venues/search", post(venues::search))
        .route("/venues/create", get(venues::create_form).post(venues::create))
        .route("/venues/:id", get(venues::show).delete(venues::delete))
        .route("/venues/:id/edit", get(venues::edit_form).post(venues::edit))
        .route("/artists", get(artists::index))
        .route("/artists/search", post(artists::search))
        .route("/artists/create", get(artists::create_form).post(artists::create))
        .route("/artists/:id", get(artists::show).delete(artists::delete))
        .route("/artists/:id/edit", get(artists::edit_form).post(artists::edit))
        .route("/shows", get(shows::index))
        .route("/shows/create", get(shows::create_form).post(shows::create))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
