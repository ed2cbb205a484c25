//! Relative date labels shared across feed, card and entry views.
//!
//! A timestamp is bucketed by its distance from a reference instant
//! ("now"): `Today`, `Yesterday`, `N days ago`, or a long-form date such as
//! `Apr 20` / `Apr 20, 2023`.
//!
//! Buckets are rolling 24-hour windows measured on the absolute gap, so a
//! target one hour in the future is labeled the same as one an hour in the
//! past.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::timestamp::parse_timestamp;

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Tokens substituted for the relative buckets.
///
/// The long-form date is never localized through these labels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DateLabels {
    /// Label for targets less than a day away
    pub today: String,
    /// Label for targets one to two days away
    pub yesterday: String,
    /// Suffix after the day count, e.g. "days ago"
    pub days_ago: String,
}

impl Default for DateLabels {
    fn default() -> Self {
        Self {
            today: "Today".to_string(),
            yesterday: "Yesterday".to_string(),
            days_ago: "days ago".to_string(),
        }
    }
}

impl DateLabels {
    /// Apply partial overrides; unset fields keep their current value.
    pub fn with_overrides(mut self, overrides: &DateLabelOverrides) -> Self {
        if let Some(today) = &overrides.today {
            self.today = today.clone();
        }
        if let Some(yesterday) = &overrides.yesterday {
            self.yesterday = yesterday.clone();
        }
        if let Some(days_ago) = &overrides.days_ago {
            self.days_ago = days_ago.clone();
        }
        self
    }
}

/// Optional per-call label overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DateLabelOverrides {
    pub today: Option<String>,
    pub yesterday: Option<String>,
    pub days_ago: Option<String>,
}

/// Display bucket selected for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBucket {
    Today,
    Yesterday,
    /// Whole days before "today", between 2 and 6
    DaysAgo(u32),
    LongForm,
}

impl DayBucket {
    /// Select the bucket for a day difference as computed by [`day_difference`].
    pub fn from_day_difference(days: i64) -> Self {
        match days {
            i64::MIN..=1 => DayBucket::Today,
            2 => DayBucket::Yesterday,
            3..=7 => DayBucket::DaysAgo((days - 1) as u32),
            _ => DayBucket::LongForm,
        }
    }
}

/// Number of started days between two instants.
///
/// `ceil(|reference - target| / 1 day)`, so any positive sub-day gap is one
/// day. Identical instants also count as one day.
///
/// Both instants are truncated to whole milliseconds before subtracting.
pub fn day_difference(target: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    let gap_ms = reference
        .timestamp_millis()
        .saturating_sub(target.timestamp_millis())
        .saturating_abs();
    let days = gap_ms / MS_PER_DAY + i64::from(gap_ms % MS_PER_DAY != 0);
    days.max(1)
}

/// Formats instants as short labels relative to a reference instant.
#[derive(Debug, Clone)]
pub struct RelativeDateFormatter {
    labels: DateLabels,
    offset: FixedOffset,
}

impl Default for RelativeDateFormatter {
    fn default() -> Self {
        Self::new(DateLabels::default())
    }
}

impl RelativeDateFormatter {
    /// Create a formatter that renders long-form dates in UTC.
    pub fn new(labels: DateLabels) -> Self {
        Self {
            labels,
            offset: Utc.fix(),
        }
    }

    /// Use `offset` for long-form dates, the year comparison and
    /// offset-less input.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn labels(&self) -> &DateLabels {
        &self.labels
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Label `target` relative to the current wall clock.
    pub fn format(&self, target: &str) -> Result<String> {
        self.format_at(target, Utc::now())
    }

    /// Label `target` relative to `reference`.
    ///
    /// Returns [`Error::InvalidTimestamp`](crate::Error::InvalidTimestamp)
    /// if `target` does not parse.
    pub fn format_at(&self, target: &str, reference: DateTime<Utc>) -> Result<String> {
        let target = parse_timestamp(target, self.offset)?;
        Ok(self.format_instant(target, reference))
    }

    /// Like [`format_at`](Self::format_at), but renders `placeholder` for
    /// unparseable input.
    pub fn format_or(&self, target: &str, reference: DateTime<Utc>, placeholder: &str) -> String {
        match self.format_at(target, reference) {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!(error = %e, "Rendering placeholder for timestamp");
                placeholder.to_string()
            }
        }
    }

    /// Label an already-parsed instant.
    pub fn format_instant(&self, target: DateTime<Utc>, reference: DateTime<Utc>) -> String {
        let days = day_difference(target, reference);
        let bucket = DayBucket::from_day_difference(days);
        tracing::debug!(days, ?bucket, "Selected date bucket");

        match bucket {
            DayBucket::Today => self.labels.today.clone(),
            DayBucket::Yesterday => self.labels.yesterday.clone(),
            DayBucket::DaysAgo(n) => format!("{} {}", n, self.labels.days_ago),
            DayBucket::LongForm => self.long_form(target, reference),
        }
    }

    fn long_form(&self, target: DateTime<Utc>, reference: DateTime<Utc>) -> String {
        let target = target.with_timezone(&self.offset);
        let reference = reference.with_timezone(&self.offset);

        if target.year() == reference.year() {
            target.format("%b %-d").to_string()
        } else {
            target.format("%b %-d, %Y").to_string()
        }
    }
}

/// Label `target` relative to the current wall clock with default labels
/// and any `options` applied.
pub fn format_date(target: &str, options: Option<&DateLabelOverrides>) -> Result<String> {
    format_date_at(target, Utc::now(), options)
}

/// Label `target` relative to `reference` with default labels and any
/// `options` applied.
pub fn format_date_at(
    target: &str,
    reference: DateTime<Utc>,
    options: Option<&DateLabelOverrides>,
) -> Result<String> {
    let labels = match options {
        Some(overrides) => DateLabels::default().with_overrides(overrides),
        None => DateLabels::default(),
    };
    RelativeDateFormatter::new(labels).format_at(target, reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_day_difference_rounds_up() {
        let reference = at("2024-05-10T12:00:00Z");
        assert_eq!(day_difference(reference - Duration::milliseconds(1), reference), 1);
        assert_eq!(day_difference(reference - Duration::days(1), reference), 1);
        assert_eq!(
            day_difference(reference - Duration::days(1) - Duration::milliseconds(1), reference),
            2
        );
        assert_eq!(day_difference(reference - Duration::days(7), reference), 7);
    }

    #[test]
    fn test_day_difference_rounds_up_sub_millisecond_overshoot() {
        let reference = at("2024-05-10T12:00:00Z");
        let target = reference - Duration::days(1) - Duration::microseconds(500);
        assert_eq!(day_difference(target, reference), 2);

        let formatter = RelativeDateFormatter::default();
        assert_eq!(formatter.format_instant(target, reference), "Yesterday");
    }

    #[test]
    fn test_day_difference_zero_gap_is_today() {
        let reference = at("2024-05-10T12:00:00Z");
        assert_eq!(day_difference(reference, reference), 1);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(DayBucket::from_day_difference(1), DayBucket::Today);
        assert_eq!(DayBucket::from_day_difference(2), DayBucket::Yesterday);
        assert_eq!(DayBucket::from_day_difference(3), DayBucket::DaysAgo(2));
        assert_eq!(DayBucket::from_day_difference(7), DayBucket::DaysAgo(6));
        assert_eq!(DayBucket::from_day_difference(8), DayBucket::LongForm);
    }

    #[test]
    fn test_long_form_single_digit_day_is_unpadded() {
        let formatter = RelativeDateFormatter::default();
        let label =
            formatter.format_instant(at("2024-03-05T12:00:00Z"), at("2024-05-10T12:00:00Z"));
        assert_eq!(label, "Mar 5");
    }

    #[test]
    fn test_long_form_year_uses_display_offset() {
        // 23:30 UTC on Dec 31 is already Jan 1 at +02:00.
        let target = at("2023-12-31T23:30:00Z");
        let reference = at("2024-02-01T12:00:00Z");

        let utc = RelativeDateFormatter::default();
        assert_eq!(utc.format_instant(target, reference), "Dec 31, 2023");

        let plus_two = RelativeDateFormatter::default()
            .with_offset(FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(plus_two.format_instant(target, reference), "Jan 1");
    }

    #[test]
    fn test_days_ago_uses_custom_suffix() {
        let labels = DateLabels {
            days_ago: "Tage her".to_string(),
            ..Default::default()
        };
        let formatter = RelativeDateFormatter::new(labels);
        let label =
            formatter.format_instant(at("2024-05-06T12:00:00Z"), at("2024-05-10T12:00:00Z"));
        assert_eq!(label, "3 Tage her");
    }

    #[test]
    fn test_with_overrides_keeps_unset_defaults() {
        let labels = DateLabels::default().with_overrides(&DateLabelOverrides {
            yesterday: Some("Gestern".to_string()),
            ..Default::default()
        });
        assert_eq!(labels.today, "Today");
        assert_eq!(labels.yesterday, "Gestern");
        assert_eq!(labels.days_ago, "days ago");
    }

    #[test]
    fn test_format_or_falls_back_to_placeholder() {
        let formatter = RelativeDateFormatter::default();
        let reference = at("2024-05-10T12:00:00Z");
        assert_eq!(formatter.format_or("garbage", reference, "-"), "-");
        assert_eq!(
            formatter.format_or("2024-05-10T08:00:00Z", reference, "-"),
            "Today"
        );
    }
}
