//! Parse, format and apply ISO 8601 durations and time intervals.
//!
//! ```
//! use iso8601_period::{IntervalKind, IsoDuration, parse_interval};
//!
//! let d: IsoDuration = "P3Y6M4DT12H30M5S".parse().unwrap();
//! assert!(d.is_ambiguous());
//! assert_eq!(d.to_string(), "P3Y6M4DT12H30M5S");
//!
//! let start = chrono::DateTime::parse_from_rfc3339("2000-02-29T00:00:00Z").unwrap();
//! let later = "P1Y".parse::<IsoDuration>().unwrap().add_to(start).unwrap();
//! assert_eq!(later.to_rfc3339(), "2001-02-28T00:00:00+00:00");
//!
//! let i = parse_interval("2007-03-01T13:00:00Z/P1Y2M10DT2H30M").unwrap();
//! assert_eq!(i.kind, IntervalKind::StartDuration);
//! ```
//!
//! Numbers inside a duration may use `.` or `,` as decimal separator; which
//! one is expected is chosen by the caller through [`NumeralConvention`].

pub mod calendar;
mod decimal;
pub mod duration;
pub mod error;
pub mod interval;
pub mod numeral;

pub use duration::{
    BuildError, DurationBuilder, DurationField, IsoDuration, add_duration, format_duration,
    parse_duration,
};
pub use error::{AddError, ParseError};
pub use interval::{
    FixedSpans, IntervalKind, IntervalParser, IsoInterval, IsoTimestamps, Solidus, SpanParser,
    TimestampParser, parse_interval,
};
pub use numeral::{DecimalSeparator, NumeralConvention};

/// Decimal type of duration components.
pub use fixed_decimal::Decimal;
