//! Pluggable readers for the two kinds of interval sections.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};

use crate::calendar::{NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_SECOND};
use crate::decimal::Parts;
use crate::duration::{DurationField, IsoDuration};
use crate::numeral::NumeralConvention;

/// Reads a point in time. Failure is a routing signal for the classifier,
/// not an error, hence `Option`.
pub trait TimestampParser {
    fn parse_timestamp(&self, text: &str) -> Option<DateTime<FixedOffset>>;
}

impl<F> TimestampParser for F
where
    F: Fn(&str) -> Option<DateTime<FixedOffset>>,
{
    fn parse_timestamp(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        self(text)
    }
}

/// Reads a fixed-length span of time.
pub trait SpanParser {
    fn parse_span(&self, text: &str) -> Option<TimeDelta>;

    /// `text` is written as a duration, even when [`parse_span`] cannot
    /// represent its length.
    ///
    /// [`parse_span`]: SpanParser::parse_span
    fn is_span(&self, text: &str) -> bool {
        self.parse_span(text).is_some()
    }
}

impl<F> SpanParser for F
where
    F: Fn(&str) -> Option<TimeDelta>,
{
    fn parse_span(&self, text: &str) -> Option<TimeDelta> {
        self(text)
    }
}

/// RFC 3339 timestamps, plus ISO 8601 date-times and dates written without
/// an offset (or with a bare `Z`), which are read as UTC since no time zone
/// database is consulted.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsoTimestamps;

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

impl TimestampParser for IsoTimestamps {
    fn parse_timestamp(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt);
        }

        let local = text.strip_suffix('Z').unwrap_or(text);
        let naive = NAIVE_DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(local, "%Y-%m-%d")
                    .ok()?
                    .and_hms_opt(0, 0, 0)
            })?;
        Some(Utc.from_utc_datetime(&naive).fixed_offset())
    }
}

/// Durations as exact spans, in the manner of XML Schema: a year is 365
/// days, a month 30 days and a week 7 days.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedSpans {
    pub convention: NumeralConvention,
}

impl FixedSpans {
    fn unit_nanos(field: DurationField) -> i128 {
        match field {
            DurationField::Years => 365 * NANOS_PER_DAY,
            DurationField::Months => 30 * NANOS_PER_DAY,
            DurationField::Weeks => 7 * NANOS_PER_DAY,
            DurationField::Days => NANOS_PER_DAY,
            DurationField::Hours => NANOS_PER_HOUR,
            DurationField::Minutes => NANOS_PER_MINUTE,
            DurationField::Seconds => NANOS_PER_SECOND,
        }
    }

    /// Total length of `duration` under the fixed unit lengths.
    pub fn span_of(duration: &IsoDuration) -> Option<TimeDelta> {
        let mut total: i128 = 0;
        for (field, value) in duration.components() {
            let nanos = Parts::of(value)?.total_nanos(Self::unit_nanos(field))?;
            total = total.checked_add(nanos)?;
        }
        let secs = i64::try_from(total.div_euclid(NANOS_PER_SECOND)).ok()?;
        let subsec = u32::try_from(total.rem_euclid(NANOS_PER_SECOND)).ok()?;
        TimeDelta::new(secs, subsec)
    }
}

impl SpanParser for FixedSpans {
    fn parse_span(&self, text: &str) -> Option<TimeDelta> {
        let duration = IsoDuration::parse_with(text, &self.convention).ok()?;
        Self::span_of(&duration)
    }

    fn is_span(&self, text: &str) -> bool {
        IsoDuration::parse_with(text, &self.convention).is_ok()
    }
}
