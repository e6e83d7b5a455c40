//! Parsing and formatting of user-supplied timestamps.

use std::sync::LazyLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use regex::Regex;
use thiserror::Error;

/// Default display format for entry timestamps.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").expect("relative time regex")
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Naive formats accepted as UTC wall-clock time.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Years that survive a round trip through four-digit RFC 3339 text.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Errors from [`parse_datetime_at`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateTimeParseError {
    /// The input matched none of the accepted formats.
    #[error(
        "invalid datetime: {0}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), 'YYYY-MM-DD HH:MM' or relative (e.g., '2 hours ago')"
    )]
    Invalid(String),
    /// A relative time was too far in the past to represent.
    #[error("relative time value too large: {value} {unit}")]
    OutOfRange { value: String, unit: String },
}

/// Parse a datetime string relative to the current wall clock.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DateTimeParseError> {
    parse_datetime_at(s, Utc::now())
}

/// Parse a datetime string as ISO 8601, a naive UTC timestamp, or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Naive UTC: "2026-01-15 10:30", "2026-01-15 10:30:00"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime_at(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DateTimeParseError> {
    let s = s.trim();
    let parsed = parse_unchecked(s, now)?;
    if STORABLE_YEARS.contains(&parsed.year()) {
        Ok(parsed)
    } else {
        Err(DateTimeParseError::Invalid(s.to_string()))
    }
}

fn parse_unchecked(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DateTimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        return Err(DateTimeParseError::Invalid(s.to_string()));
    };

    let out_of_range = || DateTimeParseError::OutOfRange {
        value: caps[1].to_string(),
        unit: caps[2].to_string(),
    };

    let n: i64 = caps[1].parse().map_err(|_| out_of_range())?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        _ => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
    };

    if n > max_for_unit {
        return Err(out_of_range());
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Returns true if `format` is a usable strftime pattern.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Formats a timestamp with a strftime pattern.
///
/// Invalid patterns fall back to [`DEFAULT_DATETIME_FORMAT`] rather than panicking
/// inside `Display`.
pub fn format_datetime(timestamp: DateTime<Utc>, format: &str) -> String {
    let format = if is_valid_format(format) {
        format
    } else {
        DEFAULT_DATETIME_FORMAT
    };
    timestamp.format(format).to_string()
}
