//! Request extractors shared by the handlers.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::web::AppError;

/// Numeric record id taken from the `:id` path segment.
///
/// Anything that does not parse as an `i64` (`/venues/abc`, an overflowing
/// number) matches no record, so it is answered with the 404 error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "unroutable record id");
                AppError::page_not_found()
            })?;
        Ok(Self(id))
    }
}
