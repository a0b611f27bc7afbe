use chrono::{DateTime, Datelike, Months, TimeDelta, TimeZone};

use super::{DurationField, IsoDuration};
use crate::calendar::{self, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_SECOND};
use crate::decimal::Parts;
use crate::error::AddError;

/// Applies each non-zero component in canonical order. Years and months
/// move along the calendar (clamping the day of month); their fractional
/// remainder is a share of the year or month reached. Everything from weeks
/// down is a fixed length.
pub(super) fn add<Tz: TimeZone>(
    duration: &IsoDuration,
    start: DateTime<Tz>,
) -> Result<DateTime<Tz>, AddError> {
    let mut current = start;
    for (field, value) in duration.components() {
        let overflow = || AddError::Overflow { field };
        let parts = Parts::of(value).ok_or_else(overflow)?;
        current = add_field(current, field, &parts).ok_or_else(overflow)?;
    }
    Ok(current)
}

fn add_field<Tz: TimeZone>(
    start: DateTime<Tz>,
    field: DurationField,
    parts: &Parts,
) -> Option<DateTime<Tz>> {
    match field {
        DurationField::Years => {
            let shifted = add_months(start, parts.whole.checked_mul(12)?)?;
            if !parts.has_fraction() {
                return Some(shifted);
            }
            let days = i128::from(calendar::days_in_year(shifted.year()));
            let nanos = parts.fraction_nanos(days * NANOS_PER_DAY)?;
            add_nanos(shifted, nanos)
        }
        DurationField::Months => {
            let shifted = add_months(start, parts.whole)?;
            if !parts.has_fraction() {
                return Some(shifted);
            }
            let days = i128::from(calendar::days_in_month(shifted.year(), shifted.month()));
            let nanos = parts.fraction_nanos(days * NANOS_PER_DAY)?;
            add_nanos(shifted, nanos)
        }
        DurationField::Weeks => add_nanos(start, parts.total_nanos(7 * NANOS_PER_DAY)?),
        DurationField::Days => add_nanos(start, parts.total_nanos(NANOS_PER_DAY)?),
        DurationField::Hours => add_nanos(start, parts.total_nanos(NANOS_PER_HOUR)?),
        DurationField::Minutes => add_nanos(start, parts.total_nanos(NANOS_PER_MINUTE)?),
        DurationField::Seconds => add_nanos(start, parts.total_nanos(NANOS_PER_SECOND)?),
    }
}

fn add_months<Tz: TimeZone>(start: DateTime<Tz>, months: i128) -> Option<DateTime<Tz>> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        start.checked_add_months(count)
    } else {
        start.checked_sub_months(count)
    }
}

fn add_nanos<Tz: TimeZone>(start: DateTime<Tz>, nanos: i128) -> Option<DateTime<Tz>> {
    let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).ok()?;
    let subsec = u32::try_from(nanos.rem_euclid(NANOS_PER_SECOND)).ok()?;
    start.checked_add_signed(TimeDelta::new(secs, subsec)?)
}
