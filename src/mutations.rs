use chrono_tz::Tz;

use crate::db::{self, Store};
use crate::error::{BookingError, BookingResult};
use crate::forms::FormFields;
use crate::models::{ArtistForm, Kind, ShowForm, VenueForm};
use crate::validation::phone_validator;

/// Why a mutation did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Validation,
    Form,
    NotFound,
    Storage,
}

impl From<&BookingError> for Failure {
    fn from(err: &BookingError) -> Self {
        match err {
            BookingError::Validation(_) => Failure::Validation,
            BookingError::Form(_) => Failure::Form,
            BookingError::NotFound { .. } => Failure::NotFound,
            BookingError::Storage(_) | BookingError::Task(_) => Failure::Storage,
        }
    }
}

/// Flash-style outcome of a create, update or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub failure: Option<Failure>,
    /// Id of the record written, when there is one.
    pub record_id: Option<i64>,
}

impl Notice {
    fn success(message: String, record_id: Option<i64>) -> Self {
        Self {
            message,
            failure: None,
            record_id,
        }
    }

    fn failed(message: String, failure: Failure) -> Self {
        Self {
            message,
            failure: Some(failure),
            record_id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Listed,
    Updated,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Listed => "listed",
            Action::Updated => "updated",
        }
    }
}

pub fn create_venue(store: &mut Store, fields: &FormFields) -> Notice {
    let result = VenueForm::from_fields(fields)
        .map_err(BookingError::from)
        .and_then(|mut venue| {
            venue.phone = phone_validator(&venue.phone)?;
            store.transaction(|tx| db::insert_venue(tx, &venue))
        });
    conclude(Kind::Venue, Action::Listed, display_name(fields), result)
}

/// Full replace of a venue's editable fields.
pub fn update_venue(store: &mut Store, id: i64, fields: &FormFields) -> Notice {
    let result = require_venue(store, id).and_then(|_| {
        let mut venue = VenueForm::from_fields(fields)?;
        venue.phone = phone_validator(&venue.phone)?;
        store.transaction(|tx| db::update_venue(tx, id, &venue))?;
        Ok(id)
    });
    conclude(Kind::Venue, Action::Updated, display_name(fields), result)
}

pub fn delete_venue(store: &mut Store, id: i64) -> Notice {
    let name = match require_venue(store, id) {
        Ok(venue) => venue.name,
        Err(err) => return delete_failed(Kind::Venue, &id.to_string(), &err),
    };
    match store.transaction(|tx| db::delete_venue(tx, id)) {
        Ok(()) => deleted(Kind::Venue, id, &name),
        Err(err) => delete_failed(Kind::Venue, &name, &err),
    }
}

pub fn create_artist(store: &mut Store, fields: &FormFields) -> Notice {
    let result = ArtistForm::from_fields(fields)
        .map_err(BookingError::from)
        .and_then(|mut artist| {
            artist.phone = phone_validator(&artist.phone)?;
            store.transaction(|tx| db::insert_artist(tx, &artist))
        });
    conclude(Kind::Artist, Action::Listed, display_name(fields), result)
}

pub fn update_artist(store: &mut Store, id: i64, fields: &FormFields) -> Notice {
    let result = require_artist(store, id).and_then(|_| {
        let mut artist = ArtistForm::from_fields(fields)?;
        artist.phone = phone_validator(&artist.phone)?;
        store.transaction(|tx| db::update_artist(tx, id, &artist))?;
        Ok(id)
    });
    conclude(Kind::Artist, Action::Updated, display_name(fields), result)
}

pub fn delete_artist(store: &mut Store, id: i64) -> Notice {
    let name = match require_artist(store, id) {
        Ok(artist) => artist.name,
        Err(err) => return delete_failed(Kind::Artist, &id.to_string(), &err),
    };
    match store.transaction(|tx| db::delete_artist(tx, id)) {
        Ok(()) => deleted(Kind::Artist, id, &name),
        Err(err) => delete_failed(Kind::Artist, &name, &err),
    }
}

pub fn create_show(store: &mut Store, fields: &FormFields, tz: Tz) -> Notice {
    let result = ShowForm::from_fields(fields, tz)
        .map_err(BookingError::from)
        .and_then(|show| store.transaction(|tx| db::insert_show(tx, &show)));
    match result {
        Ok(id) => {
            tracing::info!(show_id = id, "show listed");
            Notice::success("Show was successfully listed!".to_string(), Some(id))
        }
        Err(err) => {
            tracing::warn!(error = %err, "show could not be listed");
            Notice::failed(
                "An error occurred. Show could not be listed.".to_string(),
                Failure::from(&err),
            )
        }
    }
}

fn require_venue(store: &Store, id: i64) -> BookingResult<crate::models::Venue> {
    store.get_venue(id)?.ok_or(BookingError::NotFound {
        kind: Kind::Venue,
        id,
    })
}

fn require_artist(store: &Store, id: i64) -> BookingResult<crate::models::Artist> {
    store.get_artist(id)?.ok_or(BookingError::NotFound {
        kind: Kind::Artist,
        id,
    })
}

fn display_name(fields: &FormFields) -> &str {
    fields.get("name").map(str::trim).unwrap_or_default()
}

fn conclude(kind: Kind, action: Action, name: &str, result: BookingResult<i64>) -> Notice {
    match result {
        Ok(id) => {
            tracing::info!(kind = %kind, id, "{} {}", kind, action.verb());
            Notice::success(
                format!("{kind} {name} was successfully {}!", action.verb()),
                Some(id),
            )
        }
        Err(BookingError::Validation(err)) => {
            tracing::info!(kind = %kind, error = %err, "rejected by validation");
            Notice::failed(format!("An error occurred. {err}"), Failure::Validation)
        }
        Err(err) => {
            tracing::warn!(kind = %kind, error = %err, "{} could not be {}", kind, action.verb());
            let failure = Failure::from(&err);
            Notice::failed(
                format!("An error occurred. {kind} {name} could not be {}.", action.verb()),
                failure,
            )
        }
    }
}

fn deleted(kind: Kind, id: i64, name: &str) -> Notice {
    tracing::info!(kind = %kind, id, "{} deleted", kind);
    Notice::success(format!("{kind} {name} was successfully deleted."), None)
}

fn delete_failed(kind: Kind, name: &str, err: &BookingError) -> Notice {
    tracing::warn!(kind = %kind, error = %err, "{} could not be deleted", kind);
    Notice::failed(
        format!("An error occurred. {kind} {name} could not be deleted."),
        Failure::from(err),
    )
}
