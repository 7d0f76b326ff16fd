use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Date-time patterns tried, in order, after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only patterns; these resolve to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a timestamp cell into a UTC [`DateTime`].
///
/// Accepts RFC 3339 (either `Z` or a fixed offset, converted to UTC) and a few
/// common naive layouts, which are taken to be UTC already. Surrounding
/// whitespace is ignored. Returns `None` for empty or unrecognised input.
///
/// # Examples
///
/// ```
/// use fleet_core::time_utils::parse_timestamp;
///
/// assert!(parse_timestamp("2024-01-01 10:30:00").is_some());
/// assert!(parse_timestamp("2024-01-01T10:30:00Z").is_some());
/// assert!(parse_timestamp("2024-01-05").is_some());
/// assert!(parse_timestamp("last tuesday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(start_of_day(date));
        }
    }

    None
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// The last whole second (23:59:59) of `date`, in UTC.
///
/// Used to turn a calendar end date into an inclusive upper bound.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + chrono::Duration::seconds(SECONDS_PER_DAY - 1)
}

/// Format a timestamp the way the loader reads it back:
/// `YYYY-MM-DD HH:MM:SS` with a fractional part only when non-zero.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

// ── TimeBucket ────────────────────────────────────────────────────────────────

/// Fixed-width window used to group records in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Hour,
    Day,
}

impl TimeBucket {
    /// Bucket width in whole seconds.
    pub fn width_secs(self) -> i64 {
        match self {
            TimeBucket::Hour => SECONDS_PER_HOUR,
            TimeBucket::Day => SECONDS_PER_DAY,
        }
    }

    /// Start of the bucket containing `ts`.
    ///
    /// Buckets are half-open, `[start, start + width)`, counted from the Unix
    /// epoch, so a timestamp exactly on a boundary opens the next bucket.
    /// Euclidean division keeps this monotonic for pre-epoch timestamps too.
    pub fn floor(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let width = self.width_secs();
        let start = ts.timestamp().div_euclid(width) * width;
        // `start` never exceeds `ts`, which is already representable.
        DateTime::from_timestamp(start, 0).unwrap_or(ts)
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::Hour => write!(f, "hour"),
            TimeBucket::Day => write!(f, "day"),
        }
    }
}

impl FromStr for TimeBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "H" | "h" | "hour" | "hourly" | "Hour" | "Hourly" => Ok(TimeBucket::Hour),
            "D" | "d" | "day" | "daily" | "Day" | "Daily" => Ok(TimeBucket::Day),
            other => Err(format!("unknown time bucket \"{other}\"")),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
