//! Timestamp parsing.
//!
//! Timestamps reach the formatter as strings from the backend or from the
//! rendering layer. Everything is normalized to `DateTime<Utc>`; input that
//! does not describe an instant is rejected with [`Error::InvalidTimestamp`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// Date-times carrying an explicit offset that RFC 3339 parsing rejects,
/// e.g. `2024-05-10 08:00:00+00` as rendered for `timestamptz` columns.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Offset-less date-times, read in the caller's display offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Fewest digits read as epoch milliseconds. Shorter digit runs such as
/// `20240510` look like dates and are rejected rather than landing in 1970.
const MIN_EPOCH_MILLIS_DIGITS: usize = 10;

/// Parse a timestamp string into an instant.
///
/// Accepted forms, tried in order:
/// - RFC 3339 (`2024-05-10T08:00:00Z`, `2024-05-10T08:00:00.123456+00:00`)
/// - date-time with a short or space-separated offset (`2024-05-10 08:00:00+00`)
/// - naive date-time, interpreted in `offset`
/// - date only (`2024-05-10`), year-month (`2024-05`) or year (`2024`),
///   interpreted as UTC midnight on the first day
/// - integer epoch milliseconds, at least ten digits
pub fn parse_timestamp(input: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_timestamp(input));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return offset
                .from_local_datetime(&naive)
                .single()
                .map(|ts| ts.with_timezone(&Utc))
                .ok_or_else(|| Error::invalid_timestamp(input));
        }
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_reduced_date(trimmed));
    if let Some(date) = date {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| Error::invalid_timestamp(input));
    }

    if is_epoch_millis(trimmed) {
        return trimmed
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| Error::invalid_timestamp(input));
    }

    Err(Error::invalid_timestamp(input))
}

/// ISO-8601 reduced precision: `YYYY` or `YYYY-MM`.
fn parse_reduced_date(s: &str) -> Option<NaiveDate> {
    let (year, month) = match s.split_once('-') {
        Some((year, month)) => (year, Some(month)),
        None => (s, None),
    };
    if !is_digits(year, 4) {
        return None;
    }
    let year = year.parse().ok()?;

    let month = match month {
        Some(month) if is_digits(month, 2) => month.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_epoch_millis(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    digits.len() >= MIN_EPOCH_MILLIS_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
}
