use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use chrono_tz::Tz;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR: &str = "show-booking";
const CONFIG_FILE: &str = "config.json";
const DATABASE_FILE: &str = "show-booking.sqlite";
const DEFAULT_TIMEZONE: &str = "UTC";

static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let root = dirs::data_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    ensure_dir(&root);
    root
});

/// Per-user directory holding `config.json` and the default database.
pub fn data_root() -> &'static Path {
    &DATA_ROOT
}

/// Create the directory `path` lives in, if any. Failure is logged; opening
/// the file afterwards reports the real error.
pub fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent);
    }
}

fn ensure_dir(dir: &Path) {
    if let Err(err) = fs::create_dir_all(dir) {
        tracing::warn!(path = %dir.display(), error = %err, "failed to create directory");
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid bind address `{0}`")]
    InvalidBind(String),
    #[error("invalid port `{0}`")]
    InvalidPort(String),
    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub database_path: Option<PathBuf>,
    /// IANA name used to read submitted start times and to display them.
    pub timezone: String,
    pub error_log: Option<PathBuf>,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            database_path: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            error_log: None,
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    /// `config.json` from the data root, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = read_config(&data_root().join(CONFIG_FILE))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.display_timezone()?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("BOOKING_BIND") {
            self.bind = bind
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;
        }
        if let Some(port) = lookup("PORT") {
            let parsed = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
            self.bind.set_port(parsed);
        }
        if let Some(path) = lookup("BOOKING_DATABASE").filter(|p| !p.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(tz) = lookup("BOOKING_TIMEZONE").filter(|t| !t.trim().is_empty()) {
            self.timezone = tz.trim().to_string();
        }
        if let Some(path) = lookup("BOOKING_ERROR_LOG").filter(|p| !p.trim().is_empty()) {
            self.error_log = Some(PathBuf::from(path.trim()));
        }
        if let Some(seed) = lookup("BOOKING_SEED") {
            self.seed_demo_data = matches!(
                seed.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_root().join(DATABASE_FILE))
    }

    pub fn display_timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
