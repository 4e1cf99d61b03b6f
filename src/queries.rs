use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::Store;
use crate::error::{BookingError, BookingResult};
use crate::models::{Artist, Booking, Kind, ShowListing, Summary, Venue};

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LocationGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<Summary>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<Summary>,
}

impl From<Vec<Summary>> for SearchResults {
    fn from(data: Vec<Summary>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Shows for one venue or artist split around a reference instant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schedule {
    pub past: Vec<Booking>,
    pub upcoming: Vec<Booking>,
}

impl Schedule {
    /// A show starting exactly at `now` counts as upcoming.
    pub fn split(bookings: Vec<Booking>, now: DateTime<Utc>) -> Self {
        let (past, upcoming) = bookings
            .into_iter()
            .partition(|booking| booking.start_time < now);
        Self { past, upcoming }
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.past.len() + self.upcoming.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VenueDetail {
    pub venue: Venue,
    pub schedule: Schedule,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArtistDetail {
    pub artist: Artist,
    pub schedule: Schedule,
}

/// Bucket venues by `(city, state)` in one pass. Groups come out sorted by
/// city then state; venues keep their incoming order inside a group.
pub fn group_by_location<I>(venues: I) -> Vec<LocationGroup>
where
    I: IntoIterator<Item = Venue>,
{
    let mut groups: BTreeMap<(String, String), Vec<Summary>> = BTreeMap::new();
    for venue in venues {
        groups
            .entry((venue.city, venue.state))
            .or_default()
            .push(Summary {
                id: venue.id,
                name: venue.name,
            });
    }

    groups
        .into_iter()
        .map(|((city, state), venues)| LocationGroup {
            city,
            state,
            venues,
        })
        .collect()
}

pub fn venues_by_location(store: &Store) -> BookingResult<Vec<LocationGroup>> {
    Ok(group_by_location(store.list_venues()?))
}

pub fn search_venues(store: &Store, term: &str) -> BookingResult<SearchResults> {
    Ok(store.search_venues(term)?.into())
}

pub fn search_artists(store: &Store, term: &str) -> BookingResult<SearchResults> {
    Ok(store.search_artists(term)?.into())
}

pub fn list_artists(store: &Store) -> BookingResult<Vec<Summary>> {
    store.list_artists()
}

pub fn list_shows(store: &Store) -> BookingResult<Vec<ShowListing>> {
    store.list_shows()
}

pub fn venue(store: &Store, id: i64) -> BookingResult<Venue> {
    store.get_venue(id)?.ok_or(BookingError::NotFound {
        kind: Kind::Venue,
        id,
    })
}

pub fn artist(store: &Store, id: i64) -> BookingResult<Artist> {
    store.get_artist(id)?.ok_or(BookingError::NotFound {
        kind: Kind::Artist,
        id,
    })
}

pub fn venue_detail(store: &Store, id: i64, now: DateTime<Utc>) -> BookingResult<VenueDetail> {
    let venue = venue(store, id)?;
    let schedule = Schedule::split(store.venue_bookings(id)?, now);
    Ok(VenueDetail { venue, schedule })
}

pub fn artist_detail(store: &Store, id: i64, now: DateTime<Utc>) -> BookingResult<ArtistDetail> {
    let artist = artist(store, id)?;
    let schedule = Schedule::split(store.artist_bookings(id)?, now);
    Ok(ArtistDetail { artist, schedule })
}
