//! View-ready shapes for every page. Templates (or any other renderer)
//! consume these as-is; no formatting happens after this point.

use chrono_tz::Tz;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::dates::{format_datetime, DateFormat};
use crate::models::{seeking_label, Artist, Booking, ShowListing, Summary, Venue};
use crate::mutations::Notice;
use crate::queries::{ArtistDetail, LocationGroup, SearchResults, VenueDetail};

pub const GENRES: [&str; 19] = [
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const VENUE_FIELDS: [&str; 11] = [
    "name",
    "city",
    "state",
    "address",
    "phone",
    "image_link",
    "genres",
    "facebook_link",
    "website",
    "seeking_talent",
    "seeking_description",
];

const ARTIST_FIELDS: [&str; 10] = [
    "name",
    "city",
    "state",
    "phone",
    "image_link",
    "genres",
    "facebook_link",
    "website",
    "seeking_venue",
    "seeking_description",
];

const SHOW_FIELDS: [&str; 3] = ["artist_id", "venue_id", "start_time"];

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub sections: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct Link {
    pub label: &'static str,
    pub href: &'static str,
}

pub fn home() -> HomePage {
    HomePage {
        sections: vec![
            Link {
                label: "Find a venue",
                href: "/venues",
            },
            Link {
                label: "Find an artist",
                href: "/artists",
            },
            Link {
                label: "Post a show",
                href: "/shows/create",
            },
        ],
    }
}

#[derive(Debug, Serialize)]
pub struct VenuesPage {
    pub areas: Vec<LocationGroup>,
}

#[derive(Debug, Serialize)]
pub struct ArtistsPage {
    pub artists: Vec<Summary>,
}

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Serialize)]
pub struct VenuePage {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ArtistPage {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ShowRow {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Serialize)]
pub struct ShowsPage {
    pub shows: Vec<ShowRow>,
}

/// Blank or prefilled form. `values` is empty for create forms.
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub form: &'static str,
    pub action: String,
    pub fields: &'static [&'static str],
    pub values: Map<String, Value>,
    pub choices: Map<String, Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct NoticePage {
    pub kind: NoticeKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

pub fn venues(areas: Vec<LocationGroup>) -> VenuesPage {
    VenuesPage { areas }
}

pub fn artists(artists: Vec<Summary>) -> ArtistsPage {
    ArtistsPage { artists }
}

pub fn search(search_term: String, results: SearchResults) -> SearchPage {
    SearchPage {
        search_term,
        results,
    }
}

pub fn venue(detail: VenueDetail, tz: Tz) -> VenuePage {
    let VenueDetail { venue, schedule } = detail;
    let to_view = |booking: Booking| VenueShow {
        artist_id: booking.counterpart_id,
        artist_name: booking.counterpart_name,
        artist_image_link: booking.counterpart_image_link,
        start_time: format_datetime(&booking.start_time, DateFormat::Medium, tz),
    };
    let past_shows: Vec<VenueShow> = schedule.past.into_iter().map(to_view).collect();
    let upcoming_shows: Vec<VenueShow> = schedule.upcoming.into_iter().map(to_view).collect();

    VenuePage {
        id: venue.id,
        name: venue.name,
        genres: venue.genres,
        address: venue.address,
        city: venue.city,
        state: venue.state,
        phone: venue.phone,
        website: venue.website,
        facebook_link: venue.facebook_link,
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description,
        image_link: venue.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }
}

pub fn artist(detail: ArtistDetail, tz: Tz) -> ArtistPage {
    let ArtistDetail { artist, schedule } = detail;
    let to_view = |booking: Booking| ArtistShow {
        venue_id: booking.counterpart_id,
        venue_name: booking.counterpart_name,
        venue_image_link: booking.counterpart_image_link,
        start_time: format_datetime(&booking.start_time, DateFormat::Medium, tz),
    };
    let past_shows: Vec<ArtistShow> = schedule.past.into_iter().map(to_view).collect();
    let upcoming_shows: Vec<ArtistShow> = schedule.upcoming.into_iter().map(to_view).collect();

    ArtistPage {
        id: artist.id,
        name: artist.name,
        genres: artist.genres,
        city: artist.city,
        state: artist.state,
        phone: artist.phone,
        website: artist.website,
        facebook_link: artist.facebook_link,
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description,
        image_link: artist.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }
}

pub fn shows(listings: Vec<ShowListing>, tz: Tz) -> ShowsPage {
    ShowsPage {
        shows: listings
            .into_iter()
            .map(|show| ShowRow {
                venue_id: show.venue_id,
                venue_name: show.venue_name,
                artist_id: show.artist_id,
                artist_name: show.artist_name,
                artist_image_link: show.artist_image_link,
                start_time: format_datetime(&show.start_time, DateFormat::Medium, tz),
            })
            .collect(),
    }
}

fn profile_choices() -> Map<String, Value> {
    let mut choices = Map::new();
    choices.insert("genres".to_string(), json!(GENRES.as_slice()));
    choices.insert("state".to_string(), json!(STATES.as_slice()));
    choices.insert("seeking".to_string(), json!(["Yes", "No"]));
    choices
}

pub fn new_venue_form() -> FormPage {
    FormPage {
        form: "venue",
        action: "/venues/create".to_string(),
        fields: &VENUE_FIELDS,
        values: Map::new(),
        choices: profile_choices(),
    }
}

pub fn new_artist_form() -> FormPage {
    FormPage {
        form: "artist",
        action: "/artists/create".to_string(),
        fields: &ARTIST_FIELDS,
        values: Map::new(),
        choices: profile_choices(),
    }
}

pub fn new_show_form() -> FormPage {
    FormPage {
        form: "show",
        action: "/shows/create".to_string(),
        fields: &SHOW_FIELDS,
        values: Map::new(),
        choices: Map::new(),
    }
}

pub fn edit_venue_form(venue: &Venue) -> FormPage {
    let mut values = Map::new();
    values.insert("id".to_string(), json!(venue.id));
    values.insert("name".to_string(), json!(venue.name));
    values.insert("city".to_string(), json!(venue.city));
    values.insert("state".to_string(), json!(venue.state));
    values.insert("address".to_string(), json!(venue.address));
    values.insert("phone".to_string(), json!(venue.phone));
    values.insert("image_link".to_string(), json!(venue.image_link));
    values.insert("genres".to_string(), json!(venue.genres));
    values.insert("facebook_link".to_string(), json!(venue.facebook_link));
    values.insert("website".to_string(), json!(venue.website));
    values.insert(
        "seeking_talent".to_string(),
        json!(seeking_label(venue.seeking_talent)),
    );
    values.insert(
        "seeking_description".to_string(),
        json!(venue.seeking_description),
    );

    FormPage {
        form: "venue",
        action: format!("/venues/{}/edit", venue.id),
        fields: &VENUE_FIELDS,
        values,
        choices: profile_choices(),
    }
}

pub fn edit_artist_form(artist: &Artist) -> FormPage {
    let mut values = Map::new();
    values.insert("id".to_string(), json!(artist.id));
    values.insert("name".to_string(), json!(artist.name));
    values.insert("city".to_string(), json!(artist.city));
    values.insert("state".to_string(), json!(artist.state));
    values.insert("phone".to_string(), json!(artist.phone));
    values.insert("image_link".to_string(), json!(artist.image_link));
    values.insert("genres".to_string(), json!(artist.genres));
    values.insert("facebook_link".to_string(), json!(artist.facebook_link));
    values.insert("website".to_string(), json!(artist.website));
    values.insert(
        "seeking_venue".to_string(),
        json!(seeking_label(artist.seeking_venue)),
    );
    values.insert(
        "seeking_description".to_string(),
        json!(artist.seeking_description),
    );

    FormPage {
        form: "artist",
        action: format!("/artists/{}/edit", artist.id),
        fields: &ARTIST_FIELDS,
        values,
        choices: profile_choices(),
    }
}

pub fn notice(notice: Notice, redirect: Option<String>) -> NoticePage {
    NoticePage {
        kind: if notice.is_success() {
            NoticeKind::Success
        } else {
            NoticeKind::Error
        },
        message: notice.message,
        record_id: notice.record_id,
        redirect,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::queries::Schedule;

    fn sample_venue() -> Venue {
        Venue {
            id: 1,
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: "123-123-1234".to_string(),
            image_link: None,
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".to_string()),
            website: Some("https://www.themusicalhop.com".to_string()),
            genres: vec!["Jazz".to_string(), "Reggae".to_string()],
            seeking_talent: true,
            seeking_description: Some("Local artists wanted".to_string()),
        }
    }

    #[test]
    fn venue_page_counts_and_formats_shows() {
        let start: DateTime<Utc> = "2019-05-21T21:30:00Z".parse().expect("timestamp");
        let booking = |offset: i64| Booking {
            counterpart_id: 4,
            counterpart_name: "Guns N Petals".to_string(),
            counterpart_image_link: None,
            start_time: start + Duration::days(offset),
        };
        let detail = VenueDetail {
            venue: sample_venue(),
            schedule: Schedule {
                past: vec![booking(0)],
                upcoming: vec![booking(1), booking(2)],
            },
        };

        let page = venue(detail, Tz::UTC);
        assert_eq!(page.past_shows_count, 1);
        assert_eq!(page.upcoming_shows_count, 2);
        assert_eq!(page.past_shows[0].start_time, "Tue 05, 21, 2019 9:30PM");
        assert_eq!(page.past_shows[0].artist_name, "Guns N Petals");
        assert_eq!(page.genres, vec!["Jazz", "Reggae"]);
    }

    #[test]
    fn edit_form_renders_seeking_as_yes_no() {
        let page = edit_venue_form(&sample_venue());
        assert_eq!(page.action, "/venues/1/edit");
        assert_eq!(page.values["seeking_talent"], json!("Yes"));
        assert_eq!(page.values["genres"], json!(["Jazz", "Reggae"]));
        assert_eq!(page.values["image_link"], Value::Null);
    }

    #[test]
    fn create_forms_carry_full_choice_lists() {
        let page = new_venue_form();
        assert_eq!(page.action, "/venues/create");
        assert!(page.values.is_empty());
        assert_eq!(page.choices["state"].as_array().map(Vec::len), Some(51));
        assert_eq!(page.choices["genres"].as_array().map(Vec::len), Some(19));

        let value = serde_json::to_value(new_artist_form()).expect("serialize");
        assert_eq!(value["choices"]["state"][0], "AL");
        assert_eq!(value["fields"][0], "name");

        assert!(new_show_form().choices.is_empty());
    }

    #[test]
    fn notice_page_serializes_kind() {
        let page = notice(
            Notice {
                message: "Show was successfully listed!".to_string(),
                failure: None,
                record_id: Some(3),
            },
            None,
        );
        let value = serde_json::to_value(&page).expect("serialize");
        assert_eq!(
            value,
            json!({
                "kind": "success",
                "message": "Show was successfully listed!",
                "record_id": 3
            })
        );
    }
}
