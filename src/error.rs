use thiserror::Error;

use crate::dates::DateError;
use crate::models::Kind;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid form: {0}")]
    Form(#[from] FormError),
    #[error("{kind} {id} not found")]
    NotFound { kind: Kind, id: i64 },
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("worker failed: {0}")]
    Task(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("field `{0}` must be a number")]
    NotANumber(&'static str),
    #[error(transparent)]
    StartTime(#[from] DateError),
}

pub type BookingResult<T> = Result<T, BookingError>;
