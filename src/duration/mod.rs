//! ISO 8601 durations: `[-]PnYnMnWnDTnHnMnS`.

mod arith;
mod field;
mod format;
mod parser;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use fixed_decimal::Decimal;
use writeable::Writeable;

use crate::decimal;
use crate::error::{AddError, ParseError};
use crate::numeral::NumeralConvention;

/// One component of a duration, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DurationField {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DurationField {
    pub const ALL: [DurationField; 7] = [
        DurationField::Years,
        DurationField::Months,
        DurationField::Weeks,
        DurationField::Days,
        DurationField::Hours,
        DurationField::Minutes,
        DurationField::Seconds,
    ];

    /// The unit letter following the number. Months and minutes share `M`;
    /// the `T` separator tells them apart.
    pub fn designator(self) -> char {
        match self {
            DurationField::Years => 'Y',
            DurationField::Months => 'M',
            DurationField::Weeks => 'W',
            DurationField::Days => 'D',
            DurationField::Hours => 'H',
            DurationField::Minutes => 'M',
            DurationField::Seconds => 'S',
        }
    }

    pub fn is_date(self) -> bool {
        self <= DurationField::Days
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DurationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DurationField::Years => "years",
            DurationField::Months => "months",
            DurationField::Weeks => "weeks",
            DurationField::Days => "days",
            DurationField::Hours => "hours",
            DurationField::Minutes => "minutes",
            DurationField::Seconds => "seconds",
        };
        f.write_str(name)
    }
}

/// A signed span of years, months, weeks, days, hours, minutes and seconds.
///
/// Each component is an exact decimal, so `PT0.10S` keeps both of its
/// fraction digits. The sign is carried by every non-zero component as well
/// as by [`is_negative`](IsoDuration::is_negative), and at most the last
/// non-zero component has a fractional part. A zero component is stored as
/// the plain zero however it was written, so it compares equal to an absent
/// one.
#[derive(Clone, Debug, PartialEq)]
pub struct IsoDuration {
    negative: bool,
    fields: [Decimal; 7],
}

// `Decimal` only derives `PartialEq`, which is reflexive.
impl Eq for IsoDuration {}

impl Hash for IsoDuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.negative.hash(state);
        for value in &self.fields {
            // equal decimals render the same digits
            value.write_to_string().hash(state);
        }
    }
}

impl Default for IsoDuration {
    fn default() -> Self {
        IsoDuration {
            negative: false,
            fields: std::array::from_fn(|_| decimal::zero()),
        }
    }
}

impl IsoDuration {
    /// Parses `text` with the given numeral convention.
    pub fn parse_with(text: &str, convention: &NumeralConvention) -> Result<Self, ParseError> {
        parser::parse(text, convention)
    }

    /// Builds a duration from raw components, taking the sign from them: the
    /// duration is negative when any component is negative.
    ///
    /// Non-zero components are stored as given. Use
    /// [`IsoDuration::builder`] for a validated construction.
    pub fn from_fields(mut fields: [Decimal; 7]) -> Self {
        for value in fields.iter_mut().filter(|v| decimal::is_zero(v)) {
            *value = decimal::zero();
        }
        let negative = fields.iter().any(decimal::is_negative);
        IsoDuration { negative, fields }
    }

    pub fn builder() -> DurationBuilder {
        DurationBuilder::default()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn get(&self, field: DurationField) -> &Decimal {
        &self.fields[field.index()]
    }

    pub fn years(&self) -> &Decimal {
        self.get(DurationField::Years)
    }

    pub fn months(&self) -> &Decimal {
        self.get(DurationField::Months)
    }

    pub fn weeks(&self) -> &Decimal {
        self.get(DurationField::Weeks)
    }

    pub fn days(&self) -> &Decimal {
        self.get(DurationField::Days)
    }

    pub fn hours(&self) -> &Decimal {
        self.get(DurationField::Hours)
    }

    pub fn minutes(&self) -> &Decimal {
        self.get(DurationField::Minutes)
    }

    pub fn seconds(&self) -> &Decimal {
        self.get(DurationField::Seconds)
    }

    /// Non-zero components in canonical order.
    pub fn components(&self) -> impl Iterator<Item = (DurationField, &Decimal)> {
        DurationField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .filter(|(_, value)| !decimal::is_zero(value))
    }

    /// All components are zero.
    pub fn is_empty(&self) -> bool {
        self.components().next().is_none()
    }

    /// Any of years, months, weeks or days is non-zero.
    pub fn has_date(&self) -> bool {
        self.components().any(|(field, _)| field.is_date())
    }

    /// Any of hours, minutes or seconds is non-zero.
    pub fn has_time(&self) -> bool {
        self.components().any(|(field, _)| !field.is_date())
    }

    /// The elapsed time depends on where the duration is applied (leap
    /// years, month lengths, daylight saving changes).
    pub fn is_ambiguous(&self) -> bool {
        self.has_date()
    }

    pub fn is_exact(&self) -> bool {
        !self.is_ambiguous()
    }

    /// Canonical text using `convention` for fractional digits.
    pub fn format(&self, convention: &NumeralConvention) -> String {
        format::format(self, convention)
    }

    /// Applies the duration to `start`, calendar units first.
    pub fn add_to<Tz: TimeZone>(&self, start: DateTime<Tz>) -> Result<DateTime<Tz>, AddError> {
        arith::add(self, start)
    }
}

/// Parses `text` as an ISO 8601 duration.
pub fn parse_duration(text: &str, convention: &NumeralConvention) -> Result<IsoDuration, ParseError> {
    IsoDuration::parse_with(text, convention)
}

/// Renders `duration` in canonical form.
pub fn format_duration(duration: &IsoDuration, convention: &NumeralConvention) -> String {
    duration.format(convention)
}

/// Applies `duration` to `start`, see [`IsoDuration::add_to`].
pub fn add_duration<Tz: TimeZone>(
    duration: &IsoDuration,
    start: DateTime<Tz>,
) -> Result<DateTime<Tz>, AddError> {
    duration.add_to(start)
}

impl FromStr for IsoDuration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IsoDuration::parse_with(s, &NumeralConvention::default())
    }
}

impl TryFrom<&str> for IsoDuration {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&NumeralConvention::default()))
    }
}

/// Why [`DurationBuilder::build`] refused its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("{field} has a different sign than the rest of the duration")]
    MixedSigns { field: DurationField },

    #[error("only the last non-zero component may have a fraction, {field} follows one")]
    NonFinalFraction { field: DurationField },
}

/// Programmatic construction of an [`IsoDuration`] from unsigned
/// magnitudes plus an overall sign.
#[derive(Clone, Debug, Default)]
pub struct DurationBuilder {
    negative: bool,
    fields: [Option<Decimal>; 7],
}

impl DurationBuilder {
    pub fn negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    pub fn field(mut self, field: DurationField, value: Decimal) -> Self {
        self.fields[field.index()] = Some(value);
        self
    }

    pub fn years(self, value: Decimal) -> Self {
        self.field(DurationField::Years, value)
    }

    pub fn months(self, value: Decimal) -> Self {
        self.field(DurationField::Months, value)
    }

    pub fn weeks(self, value: Decimal) -> Self {
        self.field(DurationField::Weeks, value)
    }

    pub fn days(self, value: Decimal) -> Self {
        self.field(DurationField::Days, value)
    }

    pub fn hours(self, value: Decimal) -> Self {
        self.field(DurationField::Hours, value)
    }

    pub fn minutes(self, value: Decimal) -> Self {
        self.field(DurationField::Minutes, value)
    }

    pub fn seconds(self, value: Decimal) -> Self {
        self.field(DurationField::Seconds, value)
    }

    /// Checks the sign and single-fraction rules, then distributes the sign
    /// over the non-zero components. Magnitudes may be given either unsigned
    /// or already carrying the duration's sign.
    pub fn build(self) -> Result<IsoDuration, BuildError> {
        let mut duration = IsoDuration {
            negative: self.negative,
            ..IsoDuration::default()
        };
        let mut seen_fraction = false;
        for (field, value) in DurationField::ALL.into_iter().zip(self.fields) {
            let Some(mut value) = value else {
                continue;
            };
            if decimal::is_zero(&value) {
                continue;
            }
            if decimal::is_negative(&value) && !self.negative {
                return Err(BuildError::MixedSigns { field });
            }
            if seen_fraction {
                return Err(BuildError::NonFinalFraction { field });
            }
            seen_fraction = decimal::has_fraction_digits(&value);
            if self.negative {
                decimal::negate(&mut value);
            }
            duration.fields[field.index()] = value;
        }
        Ok(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dec(s: &str) -> Decimal {
        Decimal::try_from_str(s).unwrap()
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_send_sync() {
        assert_send_sync::<IsoDuration>();
        assert_send_sync::<DurationField>();
        assert_send_sync::<DurationBuilder>();
        assert_send_sync::<BuildError>();
        assert_send_sync::<ParseError>();
        assert_send_sync::<AddError>();
    }

    #[test]
    fn parsing_from_many_threads() {
        let handles: Vec<_> = (1..=8)
            .map(|n| std::thread::spawn(move || format!("PT{n}.5S").parse::<IsoDuration>()))
            .collect();
        for (n, handle) in (1..=8).zip(handles) {
            let d = handle.join().unwrap().unwrap();
            assert_eq!(d.to_string(), format!("PT{n}.5S"));
        }
    }

    #[test]
    fn zero_components_equal_absent_ones() {
        let point = NumeralConvention::point();
        let empty = IsoDuration::parse_with("P", &point).unwrap();
        let written_zero = IsoDuration::parse_with("P0.0D", &point).unwrap();
        let comma_zero = IsoDuration::parse_with("PT0,00S", &NumeralConvention::comma()).unwrap();
        assert_eq!(written_zero, empty);
        assert_eq!(comma_zero, empty);
        assert_eq!(IsoDuration::from_fields(std::array::from_fn(|_| dec("0.000"))), empty);

        let set: HashSet<_> = [empty, written_zero, comma_zero].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn equal_durations_hash_alike() {
        let set: HashSet<IsoDuration> = ["P1Y2D", "P1Y0M2D", "P1Y2DT0H", "P2D"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(set.len(), 2);
    }

    fn texts(d: &IsoDuration) -> Vec<String> {
        DurationField::ALL
            .iter()
            .map(|f| d.get(*f).write_to_string().into_owned())
            .collect()
    }

    #[test]
    fn designators_and_order() {
        let letters: String = DurationField::ALL.iter().map(|f| f.designator()).collect();
        assert_eq!(letters, "YMWDHMS");
        assert!(DurationField::Days.is_date());
        assert!(!DurationField::Hours.is_date());
    }

    #[test]
    fn default_is_empty_and_exact() {
        let d = IsoDuration::default();
        assert!(d.is_empty());
        assert!(d.is_exact());
        assert!(!d.has_date());
        assert!(!d.has_time());
        assert!(!d.is_negative());
    }

    #[test]
    fn predicates() {
        let d: IsoDuration = "P1DT12H".parse().unwrap();
        assert!(d.has_date());
        assert!(d.has_time());
        assert!(d.is_ambiguous());
        assert!(!d.is_exact());

        let t: IsoDuration = "PT36H".parse().unwrap();
        assert!(t.is_exact());
        assert!(!t.has_date());
    }

    #[test]
    fn from_fields_infers_sign() {
        let mut fields = std::array::from_fn(|_| decimal::zero());
        fields[3] = dec("-4");
        let d = IsoDuration::from_fields(fields);
        assert!(d.is_negative());
        assert_eq!(d.to_string(), "-P4D");
    }

    #[test]
    fn builder_distributes_sign() {
        let d = IsoDuration::builder()
            .negative(true)
            .years(dec("3"))
            .seconds(dec("5.123"))
            .build()
            .unwrap();
        assert_eq!(texts(&d), ["-3", "0", "0", "0", "0", "0", "-5.123"]);
        assert_eq!(d.to_string(), "-P3YT5.123S");
    }

    #[test]
    fn builder_rejects_mixed_signs() {
        let err = IsoDuration::builder().days(dec("-1")).hours(dec("2")).build();
        assert_eq!(
            err,
            Err(BuildError::MixedSigns {
                field: DurationField::Days
            })
        );
    }

    #[test]
    fn builder_rejects_early_fraction() {
        let err = IsoDuration::builder()
            .months(dec("1.5"))
            .days(dec("2"))
            .build();
        assert_eq!(
            err,
            Err(BuildError::NonFinalFraction {
                field: DurationField::Days
            })
        );
    }

    #[test]
    fn builder_rejects_fraction_too_large_to_split() {
        let err = IsoDuration::builder()
            .days(dec("123456789012345678901234567890123456789012.5"))
            .hours(dec("1"))
            .build();
        assert_eq!(
            err,
            Err(BuildError::NonFinalFraction {
                field: DurationField::Hours
            })
        );
    }

    #[test]
    fn try_from_and_from_str_agree() {
        let a = IsoDuration::try_from("P3Y6M4DT12H30M5S").unwrap();
        let b: IsoDuration = "P3Y6M4DT12H30M5S".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(texts(&a), ["3", "6", "0", "4", "12", "30", "5"]);
    }

    #[test]
    fn sign_is_carried_by_every_component() {
        for text in ["-P3Y6M4DT12H30M5.123S", "P3Y6M4DT12H30M5S", "-P2W", "-P1DT2H3M4S", "PT22.22S"] {
            let d: IsoDuration = text.parse().unwrap();
            for (field, value) in d.components() {
                assert_eq!(decimal::is_negative(value), d.is_negative(), "{text} {field}");
            }
        }
    }

    #[test]
    fn components_skip_zeros() {
        let d: IsoDuration = "P1Y0M2D".parse().unwrap();
        let fields: Vec<_> = d.components().map(|(f, _)| f).collect();
        assert_eq!(fields, [DurationField::Years, DurationField::Days]);
        assert_eq!(d.to_string(), "P1Y2D");
    }
}
