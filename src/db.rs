use std::path::Path;

use chrono::{Duration, SubsecRound, Utc};
use rusqlite::{functions::FunctionFlags, params, Connection, OptionalExtension, Row, Transaction};

use crate::config;
use crate::error::{BookingError, BookingResult};
use crate::models::{
    Artist, ArtistForm, Booking, Kind, ShowForm, ShowListing, Summary, Venue, VenueForm,
};

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, facebook_link,
     website, genres, seeking_talent, seeking_description";
const ARTIST_COLUMNS: &str = "id, name, city, state, phone, image_link, facebook_link, website,
     genres, seeking_venue, seeking_description";

/// One open SQLite connection. A `Store` lives for a single request and is
/// closed explicitly once the request's work is done.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        config::ensure_parent(path);
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_casefold(&conn)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a store, hand it to `work`, then close it whatever `work` did.
    pub fn session<T, F>(path: &Path, work: F) -> BookingResult<T>
    where
        F: FnOnce(&mut Store) -> T,
    {
        let mut store = Store::open(path)?;
        let out = work(&mut store);
        if let Err(err) = store.close() {
            tracing::warn!(error = %err, "failed to close store session");
        }
        Ok(out)
    }

    pub fn close(self) -> rusqlite::Result<()> {
        self.conn.close().map_err(|(_, err)| err)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS venues(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                address TEXT NOT NULL,
                phone TEXT NOT NULL,
                image_link TEXT,
                facebook_link TEXT,
                website TEXT,
                genres TEXT NOT NULL DEFAULT '[]',
                seeking_talent INTEGER NOT NULL DEFAULT 0,
                seeking_description TEXT
            );
            CREATE TABLE IF NOT EXISTS artists(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                phone TEXT NOT NULL,
                image_link TEXT,
                facebook_link TEXT,
                website TEXT,
                genres TEXT NOT NULL DEFAULT '[]',
                seeking_venue INTEGER NOT NULL DEFAULT 0,
                seeking_description TEXT
            );
            CREATE TABLE IF NOT EXISTS shows(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                venue_id INTEGER NOT NULL REFERENCES venues(id) ON DELETE CASCADE,
                artist_id INTEGER NOT NULL REFERENCES artists(id) ON DELETE CASCADE,
                start_time TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS shows_venue_idx ON shows(venue_id);
            CREATE INDEX IF NOT EXISTS shows_artist_idx ON shows(artist_id);",
        )?;
        Ok(())
    }

    /// Run `work` inside a transaction: commit when it succeeds, roll back
    /// when it fails.
    pub fn transaction<T, F>(&mut self, work: F) -> BookingResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> BookingResult<T>,
    {
        let tx = self.conn.transaction()?;
        match work(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Insert a small demo catalog when no venues exist yet. Returns whether
    /// anything was written.
    pub fn seed_if_empty(&mut self) -> BookingResult<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM venues", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }

        let now = Utc::now().trunc_subsecs(0);
        self.transaction(|tx| {
            let sf = ("San Francisco", "CA");
            let ny = ("New York", "NY");
            let hop = insert_venue(tx, &sample_venue("The Musical Hop", sf, "123-123-1234", true))?;
            let park = insert_venue(
                tx,
                &sample_venue("Park Square Live Music & Coffee", sf, "415-000-1234", false),
            )?;
            let pianos = insert_venue(
                tx,
                &sample_venue("The Dueling Pianos Bar", ny, "914-003-1132", false),
            )?;

            let petals = insert_artist(tx, &sample_artist("Guns N Petals", sf, "326-123-5000", true))?;
            let quevedo = insert_artist(tx, &sample_artist("Matt Quevedo", ny, "300-400-5005", false))?;
            let sax = insert_artist(tx, &sample_artist("The Wild Sax Band", sf, "432-325-5432", false))?;

            let shows = [
                (hop, petals, now - Duration::days(120)),
                (park, quevedo, now + Duration::days(14)),
                (pianos, sax, now + Duration::days(45)),
                (park, sax, now + Duration::days(60)),
            ];
            for (venue_id, artist_id, start_time) in shows {
                insert_show(
                    tx,
                    &ShowForm {
                        venue_id,
                        artist_id,
                        start_time,
                    },
                )?;
            }
            Ok(())
        })?;

        tracing::info!("seeded demo catalog");
        Ok(true)
    }

    pub fn list_venues(&self) -> BookingResult<Vec<Venue>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id"))?;
        let venues = stmt
            .query_map([], venue_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(venues)
    }

    pub fn get_venue(&self, id: i64) -> BookingResult<Option<Venue>> {
        let venue = self
            .conn
            .query_row(
                &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"),
                params![id],
                venue_from_row,
            )
            .optional()?;
        Ok(venue)
    }

    pub fn search_venues(&self, term: &str) -> BookingResult<Vec<Summary>> {
        self.search("venues", term)
    }

    /// Shows at a venue, each paired with its artist, earliest first.
    pub fn venue_bookings(&self, venue_id: i64) -> BookingResult<Vec<Booking>> {
        self.bookings(
            "SELECT a.id, a.name, a.image_link, s.start_time
             FROM shows s
             INNER JOIN artists a ON a.id = s.artist_id
             WHERE s.venue_id = ?1
             ORDER BY s.start_time, s.id",
            venue_id,
        )
    }

    pub fn list_artists(&self) -> BookingResult<Vec<Summary>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM artists ORDER BY id")?;
        let artists = stmt
            .query_map([], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(artists)
    }

    pub fn get_artist(&self, id: i64) -> BookingResult<Option<Artist>> {
        let artist = self
            .conn
            .query_row(
                &format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?1"),
                params![id],
                artist_from_row,
            )
            .optional()?;
        Ok(artist)
    }

    pub fn search_artists(&self, term: &str) -> BookingResult<Vec<Summary>> {
        self.search("artists", term)
    }

    /// Shows by an artist, each paired with its venue, earliest first.
    pub fn artist_bookings(&self, artist_id: i64) -> BookingResult<Vec<Booking>> {
        self.bookings(
            "SELECT v.id, v.name, v.image_link, s.start_time
             FROM shows s
             INNER JOIN venues v ON v.id = s.venue_id
             WHERE s.artist_id = ?1
             ORDER BY s.start_time, s.id",
            artist_id,
        )
    }

    pub fn list_shows(&self) -> BookingResult<Vec<ShowListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT v.id, v.name, a.id, a.name, a.image_link, s.start_time
             FROM shows s
             INNER JOIN venues v ON v.id = s.venue_id
             INNER JOIN artists a ON a.id = s.artist_id
             ORDER BY s.start_time, s.id",
        )?;
        let shows = stmt
            .query_map([], |row| {
                Ok(ShowListing {
                    venue_id: row.get(0)?,
                    venue_name: row.get(1)?,
                    artist_id: row.get(2)?,
                    artist_name: row.get(3)?,
                    artist_image_link: row.get(4)?,
                    start_time: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(shows)
    }

    #[cfg(test)]
    pub fn count_shows(&self) -> BookingResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM shows", [], |row| row.get(0))?;
        Ok(count)
    }

    fn search(&self, table: &'static str, term: &str) -> BookingResult<Vec<Summary>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name FROM {table}
             WHERE instr(casefold(name), ?1) > 0
             ORDER BY id"
        ))?;
        let found = stmt
            .query_map(params![term.trim().to_lowercase()], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(found)
    }

    fn bookings(&self, sql: &str, id: i64) -> BookingResult<Vec<Booking>> {
        let mut stmt = self.conn.prepare(sql)?;
        let bookings = stmt
            .query_map(params![id], |row| {
                Ok(Booking {
                    counterpart_id: row.get(0)?,
                    counterpart_name: row.get(1)?,
                    counterpart_image_link: row.get(2)?,
                    start_time: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookings)
    }
}

/// Insert a venue whose phone has already been validated.
pub fn insert_venue(conn: &Connection, venue: &VenueForm) -> BookingResult<i64> {
    conn.execute(
        "INSERT INTO venues (name, city, state, address, phone, image_link, facebook_link,
             website, genres, seeking_talent, seeking_description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            venue.name,
            venue.city,
            venue.state,
            venue.address,
            venue.phone,
            venue.image_link,
            venue.facebook_link,
            venue.website,
            genres_to_sql(&venue.genres),
            venue.seeking_talent,
            venue.seeking_description,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_venue(conn: &Connection, id: i64, venue: &VenueForm) -> BookingResult<()> {
    let updated = conn.execute(
        "UPDATE venues SET name = ?2, city = ?3, state = ?4, address = ?5, phone = ?6,
             image_link = ?7, facebook_link = ?8, website = ?9, genres = ?10,
             seeking_talent = ?11, seeking_description = ?12
         WHERE id = ?1",
        params![
            id,
            venue.name,
            venue.city,
            venue.state,
            venue.address,
            venue.phone,
            venue.image_link,
            venue.facebook_link,
            venue.website,
            genres_to_sql(&venue.genres),
            venue.seeking_talent,
            venue.seeking_description,
        ],
    )?;
    require_row(updated, Kind::Venue, id)
}

pub fn delete_venue(conn: &Connection, id: i64) -> BookingResult<()> {
    let deleted = conn.execute("DELETE FROM venues WHERE id = ?1", params![id])?;
    require_row(deleted, Kind::Venue, id)
}

/// Insert an artist whose phone has already been validated.
pub fn insert_artist(conn: &Connection, artist: &ArtistForm) -> BookingResult<i64> {
    conn.execute(
        "INSERT INTO artists (name, city, state, phone, image_link, facebook_link, website,
             genres, seeking_venue, seeking_description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            artist.name,
            artist.city,
            artist.state,
            artist.phone,
            artist.image_link,
            artist.facebook_link,
            artist.website,
            genres_to_sql(&artist.genres),
            artist.seeking_venue,
            artist.seeking_description,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_artist(conn: &Connection, id: i64, artist: &ArtistForm) -> BookingResult<()> {
    let updated = conn.execute(
        "UPDATE artists SET name = ?2, city = ?3, state = ?4, phone = ?5, image_link = ?6,
             facebook_link = ?7, website = ?8, genres = ?9, seeking_venue = ?10,
             seeking_description = ?11
         WHERE id = ?1",
        params![
            id,
            artist.name,
            artist.city,
            artist.state,
            artist.phone,
            artist.image_link,
            artist.facebook_link,
            artist.website,
            genres_to_sql(&artist.genres),
            artist.seeking_venue,
            artist.seeking_description,
        ],
    )?;
    require_row(updated, Kind::Artist, id)
}

pub fn delete_artist(conn: &Connection, id: i64) -> BookingResult<()> {
    let deleted = conn.execute("DELETE FROM artists WHERE id = ?1", params![id])?;
    require_row(deleted, Kind::Artist, id)
}

/// Insert a show. Unknown venue or artist ids fail on the foreign keys.
pub fn insert_show(conn: &Connection, show: &ShowForm) -> BookingResult<i64> {
    conn.execute(
        "INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?1, ?2, ?3)",
        params![show.venue_id, show.artist_id, show.start_time],
    )?;
    Ok(conn.last_insert_rowid())
}

fn require_row(changed: usize, kind: Kind, id: i64) -> BookingResult<()> {
    if changed == 0 {
        Err(BookingError::NotFound { kind, id })
    } else {
        Ok(())
    }
}

/// `casefold(text)`: Unicode lowercase, so name search folds accented
/// letters as well as ASCII.
fn register_casefold(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: String = ctx.get(0)?;
            Ok(text.to_lowercase())
        },
    )
}

fn genres_to_sql(genres: &[String]) -> String {
    serde_json::Value::from(genres.to_vec()).to_string()
}

fn genres_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let payload: String = row.get(idx)?;
    serde_json::from_str(&payload).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}

fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        address: row.get(4)?,
        phone: row.get(5)?,
        image_link: row.get(6)?,
        facebook_link: row.get(7)?,
        website: row.get(8)?,
        genres: genres_from_row(row, 9)?,
        seeking_talent: row.get(10)?,
        seeking_description: row.get(11)?,
    })
}

fn artist_from_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        phone: row.get(4)?,
        image_link: row.get(5)?,
        facebook_link: row.get(6)?,
        website: row.get(7)?,
        genres: genres_from_row(row, 8)?,
        seeking_venue: row.get(9)?,
        seeking_description: row.get(10)?,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<Summary> {
    Ok(Summary {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn sample_venue(name: &str, (city, state): (&str, &str), phone: &str, seeking: bool) -> VenueForm {
    VenueForm {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: phone.to_string(),
        image_link: None,
        facebook_link: None,
        website: None,
        genres: vec!["Jazz".to_string(), "Folk".to_string()],
        seeking_talent: seeking,
        seeking_description: seeking
            .then(|| "We are on the lookout for a local artist to play every two weeks.".to_string()),
    }
}

fn sample_artist(name: &str, (city, state): (&str, &str), phone: &str, seeking: bool) -> ArtistForm {
    ArtistForm {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: phone.to_string(),
        image_link: None,
        facebook_link: None,
        website: None,
        genres: vec!["Rock n Roll".to_string()],
        seeking_venue: seeking,
        seeking_description: seeking
            .then(|| "Looking for shows to perform at in the San Francisco Bay Area!".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue_form(name: &str, city: &str, state: &str) -> VenueForm {
        sample_venue(name, (city, state), "415-555-0100", false)
    }

    fn artist_form(name: &str) -> ArtistForm {
        sample_artist(name, ("Boise", "ID"), "208-555-0100", false)
    }

    #[test]
    fn venue_round_trips_through_sql() {
        let mut store = Store::open_in_memory().expect("open store");
        let mut form = venue_form("Treefort Music Hall", "Boise", "ID");
        form.website = Some("https://treefortmusichall.com".to_string());
        form.genres = vec!["Indie".to_string(), "Punk".to_string()];
        form.seeking_talent = true;
        form.seeking_description = Some("Openers wanted".to_string());

        let id = store
            .transaction(|tx| insert_venue(tx, &form))
            .expect("insert venue");
        let venue = store.get_venue(id).expect("query").expect("venue exists");

        assert_eq!(venue.name, form.name);
        assert_eq!(venue.website, form.website);
        assert_eq!(venue.genres, form.genres);
        assert!(venue.seeking_talent);
        assert_eq!(venue.seeking_description.as_deref(), Some("Openers wanted"));
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let mut store = Store::open_in_memory().expect("open store");
        let form = venue_form("Neurolux", "Boise", "ID");

        let result: BookingResult<()> = store.transaction(|tx| {
            insert_venue(tx, &form)?;
            Err(BookingError::NotFound {
                kind: Kind::Artist,
                id: 99,
            })
        });

        assert!(result.is_err());
        assert!(store.list_venues().expect("list").is_empty());
    }

    #[test]
    fn show_requires_existing_venue_and_artist() {
        let mut store = Store::open_in_memory().expect("open store");
        let artist_id = store
            .transaction(|tx| insert_artist(tx, &artist_form("Built to Spill")))
            .expect("insert artist");

        let result = store.transaction(|tx| {
            insert_show(
                tx,
                &ShowForm {
                    venue_id: 404,
                    artist_id,
                    start_time: Utc::now(),
                },
            )
        });

        assert!(matches!(result, Err(BookingError::Storage(_))));
        assert_eq!(store.count_shows().expect("count"), 0);
    }

    #[test]
    fn deleting_a_venue_cascades_to_its_shows() {
        let mut store = Store::open_in_memory().expect("open store");
        let (venue_id, artist_id) = store
            .transaction(|tx| {
                let venue_id = insert_venue(tx, &venue_form("Knitting Factory", "Boise", "ID"))?;
                let artist_id = insert_artist(tx, &artist_form("Desert Dwellers"))?;
                insert_show(
                    tx,
                    &ShowForm {
                        venue_id,
                        artist_id,
                        start_time: Utc::now(),
                    },
                )?;
                Ok((venue_id, artist_id))
            })
            .expect("seed rows");

        store
            .transaction(|tx| delete_venue(tx, venue_id))
            .expect("delete venue");

        assert_eq!(store.count_shows().expect("count"), 0);
        assert!(store.artist_bookings(artist_id).expect("bookings").is_empty());
    }

    #[test]
    fn updating_a_missing_row_reports_not_found() {
        let mut store = Store::open_in_memory().expect("open store");
        let result = store.transaction(|tx| update_artist(tx, 7, &artist_form("Nobody")));
        assert!(matches!(
            result,
            Err(BookingError::NotFound { id: 7, .. })
        ));
    }

    #[test]
    fn search_matches_wildcards_literally() {
        let mut store = Store::open_in_memory().expect("open store");
        store
            .transaction(|tx| {
                insert_venue(tx, &venue_form("100% Club", "Boise", "ID"))?;
                insert_venue(tx, &venue_form("1000 Club", "Boise", "ID"))?;
                Ok(())
            })
            .expect("seed venues");

        let found = store.search_venues("0%").expect("search");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "100% Club");

        let found = store.search_venues("_").expect("search");
        assert!(found.is_empty());
    }

    #[test]
    fn seeds_only_an_empty_catalog() {
        let mut store = Store::open_in_memory().expect("open store");
        assert!(store.seed_if_empty().expect("first seed"));
        assert!(!store.seed_if_empty().expect("second seed"));
        assert_eq!(store.list_venues().expect("venues").len(), 3);
        assert_eq!(store.count_shows().expect("shows"), 4);
    }
}
