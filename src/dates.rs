use chrono::{DateTime, LocalResult, NaiveDateTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unrecognized start time: {0}")]
    Unrecognized(String),
    #[error("start time {0} does not exist in {1}")]
    Nonexistent(String, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Tue 05, 21, 2019 9:30PM`
    Medium,
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
        }
    }
}

/// Parse a submitted show start time. Inputs without an offset are read as
/// wall-clock time in `tz`. Sub-second precision is dropped.
pub fn parse_start_time(text: &str, tz: Tz) -> Result<DateTime<Utc>, DateError> {
    let cleaned = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Ok(dt.with_timezone(&Utc).trunc_subsecs(0));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
        .ok_or_else(|| DateError::Unrecognized(cleaned.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc).trunc_subsecs(0)),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc).trunc_subsecs(0)),
        LocalResult::None => Err(DateError::Nonexistent(cleaned.to_string(), tz.name())),
    }
}

pub fn format_datetime(instant: &DateTime<Utc>, format: DateFormat, tz: Tz) -> String {
    instant
        .with_timezone(&tz)
        .format(format.pattern())
        .to_string()
}
