use std::{path::PathBuf, sync::Arc};

use chrono_tz::Tz;

use crate::db::Store;
use crate::error::{BookingError, BookingResult};

/// Everything a handler needs, built once at startup and cloned into each
/// request.
#[derive(Clone)]
pub struct AppContext {
    database_path: Arc<PathBuf>,
    timezone: Tz,
}

impl AppContext {
    pub fn new(database_path: PathBuf, timezone: Tz) -> Self {
        Self {
            database_path: Arc::new(database_path),
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Run blocking store work on the blocking pool inside a fresh session.
    pub async fn with_store<T, F>(&self, work: F) -> BookingResult<T>
    where
        F: FnOnce(&mut Store) -> T + Send + 'static,
        T: Send + 'static,
    {
        let path = Arc::clone(&self.database_path);
        tokio::task::spawn_blocking(move || Store::session(&path, work))
            .await
            .map_err(|err| BookingError::Task(err.to_string()))?
    }
}
