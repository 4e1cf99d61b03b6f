use chrono_tz::Tz;

use crate::dates::parse_start_time;
use crate::error::FormError;
use crate::models::{optional, seeking_flag, ArtistForm, ShowForm, VenueForm};

/// Decoded `application/x-www-form-urlencoded` body. Keys may repeat, the
/// way `genres` does for a multi-select.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Every non-blank value submitted under `key`, in submission order.
    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn require(&self, key: &'static str) -> Result<String, FormError> {
        self.get(key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or(FormError::Missing(key))
    }

    fn text(&self, key: &str) -> String {
        self.get(key).map(str::trim).unwrap_or_default().to_string()
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.get(key).and_then(optional)
    }

    fn id(&self, key: &'static str) -> Result<i64, FormError> {
        self.require(key)?
            .parse()
            .map_err(|_| FormError::NotANumber(key))
    }
}

impl VenueForm {
    /// `phone` is carried through unchecked; validation happens before the
    /// record is written.
    pub fn from_fields(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            name: fields.require("name")?,
            city: fields.require("city")?,
            state: fields.require("state")?,
            address: fields.require("address")?,
            phone: fields.text("phone"),
            image_link: fields.optional("image_link"),
            facebook_link: fields.optional("facebook_link"),
            website: fields.optional("website"),
            genres: fields.get_all("genres"),
            seeking_talent: fields.get("seeking_talent").map(seeking_flag).unwrap_or(false),
            seeking_description: fields.optional("seeking_description"),
        })
    }
}

impl ArtistForm {
    pub fn from_fields(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            name: fields.require("name")?,
            city: fields.require("city")?,
            state: fields.require("state")?,
            phone: fields.text("phone"),
            image_link: fields.optional("image_link"),
            facebook_link: fields.optional("facebook_link"),
            website: fields.optional("website"),
            genres: fields.get_all("genres"),
            seeking_venue: fields.get("seeking_venue").map(seeking_flag).unwrap_or(false),
            seeking_description: fields.optional("seeking_description"),
        })
    }
}

impl ShowForm {
    pub fn from_fields(fields: &FormFields, tz: Tz) -> Result<Self, FormError> {
        Ok(Self {
            artist_id: fields.id("artist_id")?,
            venue_id: fields.id("venue_id")?,
            start_time: parse_start_time(&fields.require("start_time")?, tz)?,
        })
    }
}
