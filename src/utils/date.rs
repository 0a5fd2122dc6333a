//! Timestamp parsing and formatting for `dateAdded` values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive date-time layouts accepted after RFC 3339 fails; read as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse an ISO 8601 timestamp.
///
/// Accepts RFC 3339 (`2024-01-15T10:30:00Z`, with optional fraction and offset),
/// a naive date-time (`2024-01-15T10:30:00`) and a bare date (`2024-01-15`).
/// Returns `None` for anything else.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format as RFC 2822 with a `GMT` zone, e.g. `Mon, 15 Jan 2024 10:30:00 GMT`.
pub fn to_rfc2822(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Format for humans, e.g. `January 15, 2024`.
pub fn to_human(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}
