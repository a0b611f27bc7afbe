//! ISO 8601 time intervals: `start/end`, `start/duration`,
//! `duration/end`, open-ended forms and single points or spans.
//!
//! <https://en.wikipedia.org/wiki/ISO_8601#Time_intervals>

mod sources;

pub use sources::{FixedSpans, IsoTimestamps, SpanParser, TimestampParser};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeDelta};
use tracing::{debug, trace};

use crate::error::ParseError;

/// Token between the two sections of an interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Solidus {
    /// `/`
    #[default]
    Primary,
    /// `--`, for contexts where `/` is not allowed (file names, URLs)
    Secondary,
}

impl Solidus {
    pub fn as_str(self) -> &'static str {
        match self {
            Solidus::Primary => "/",
            Solidus::Secondary => "--",
        }
    }
}

impl fmt::Display for Solidus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a parsed interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntervalKind {
    /// No solidus, a single timestamp: `2018-01-01Z`
    DateTimeOnly,
    /// Solidus at the end: `2018-01-01Z/`
    StartOnly,
    /// Solidus at the start: `/2018-01-01Z`
    EndOnly,
    /// `2018-01-01Z/2018-01-02Z`
    StartEnd,
    /// `2018-01-01Z/P1DT12H30M`
    StartDuration,
    /// `P1DT12H30M/2018-01-01Z`
    DurationEnd,
    /// No solidus, a single duration: `P1DT12H30M`
    DurationOnly,
}

/// A classified interval expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IsoInterval {
    pub kind: IntervalKind,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub duration: Option<TimeDelta>,
    pub solidus: Solidus,
    input: String,
}

impl IsoInterval {
    /// The text this interval was parsed from.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The input split at the solidus; a single element when there was none.
    pub fn sections(&self) -> Vec<&str> {
        match self.kind {
            IntervalKind::DateTimeOnly | IntervalKind::DurationOnly => vec![self.input.as_str()],
            _ => self.input.split(self.solidus.as_str()).collect(),
        }
    }
}

impl FromStr for IsoInterval {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parser: IntervalParser = IntervalParser::default();
        parser.parse(s)
    }
}

/// Parses `text` with the default timestamp and span readers.
pub fn parse_interval(text: &str) -> Result<IsoInterval, ParseError> {
    text.parse()
}

#[derive(Clone, Copy, Debug)]
enum Section {
    Empty,
    Timestamp(DateTime<FixedOffset>),
    Span(TimeDelta),
}

/// Interval classifier with injectable section readers.
///
/// Each section is tried as a timestamp first and as a span second.
#[derive(Clone, Debug, Default)]
pub struct IntervalParser<T = IsoTimestamps, S = FixedSpans> {
    timestamps: T,
    spans: S,
}

impl<T: TimestampParser, S: SpanParser> IntervalParser<T, S> {
    pub fn new(timestamps: T, spans: S) -> Self {
        IntervalParser { timestamps, spans }
    }

    pub fn parse(&self, text: &str) -> Result<IsoInterval, ParseError> {
        let result = self.classify(text);
        match &result {
            Ok(interval) => trace!(input = text, kind = ?interval.kind, "classified interval"),
            Err(err) => debug!(input = text, error = %err, "rejected interval"),
        }
        result
    }

    fn classify(&self, text: &str) -> Result<IsoInterval, ParseError> {
        let Some((solidus, left, right)) = split(text)? else {
            return self.classify_single(text);
        };

        let mut interval = IsoInterval {
            kind: IntervalKind::StartEnd,
            start: None,
            end: None,
            duration: None,
            solidus,
            input: text.to_string(),
        };
        interval.kind = match (self.section(left)?, self.section(right)?) {
            (Section::Timestamp(start), Section::Timestamp(end)) => {
                interval.start = Some(start);
                interval.end = Some(end);
                IntervalKind::StartEnd
            }
            (Section::Timestamp(start), Section::Span(span)) => {
                interval.start = Some(start);
                interval.duration = Some(span);
                IntervalKind::StartDuration
            }
            (Section::Span(span), Section::Timestamp(end)) => {
                interval.end = Some(end);
                interval.duration = Some(span);
                IntervalKind::DurationEnd
            }
            (Section::Timestamp(start), Section::Empty) => {
                interval.start = Some(start);
                IntervalKind::StartOnly
            }
            (Section::Empty, Section::Timestamp(end)) => {
                interval.end = Some(end);
                IntervalKind::EndOnly
            }
            (Section::Span(_), Section::Span(_)) => return Err(ParseError::DurationOnBothSides),
            (Section::Empty, _) | (_, Section::Empty) => return Err(ParseError::MissingEndpoint),
        };
        Ok(interval)
    }

    fn classify_single(&self, text: &str) -> Result<IsoInterval, ParseError> {
        let mut interval = IsoInterval {
            kind: IntervalKind::DateTimeOnly,
            start: None,
            end: None,
            duration: None,
            solidus: Solidus::Primary,
            input: text.to_string(),
        };
        match self.section(text)? {
            Section::Timestamp(at) => {
                interval.start = Some(at);
            }
            Section::Span(span) => {
                interval.kind = IntervalKind::DurationOnly;
                interval.duration = Some(span);
            }
            Section::Empty => {
                return Err(ParseError::UnrecognizedSection {
                    section: String::new(),
                });
            }
        }
        Ok(interval)
    }

    fn section(&self, text: &str) -> Result<Section, ParseError> {
        if text.is_empty() {
            return Ok(Section::Empty);
        }
        if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
            return Err(ParseError::UnrecognizedSection {
                section: text.to_string(),
            });
        }
        if let Some(at) = self.timestamps.parse_timestamp(text) {
            trace!(section = text, "section is a timestamp");
            return Ok(Section::Timestamp(at));
        }
        if let Some(span) = self.spans.parse_span(text) {
            trace!(section = text, "section is a duration");
            return Ok(Section::Span(span));
        }
        if self.spans.is_span(text) {
            return Err(ParseError::SpanOutOfRange {
                section: text.to_string(),
            });
        }
        Err(ParseError::UnrecognizedSection {
            section: text.to_string(),
        })
    }
}

/// Finds the solidus: `/` when present, otherwise `--`. More than one
/// occurrence of the chosen token is an error.
fn split(text: &str) -> Result<Option<(Solidus, &str, &str)>, ParseError> {
    for solidus in [Solidus::Primary, Solidus::Secondary] {
        let mut parts = text.split(solidus.as_str());
        let left = parts.next().unwrap_or_default();
        let Some(right) = parts.next() else {
            continue;
        };
        if parts.next().is_some() {
            return Err(ParseError::SeparatorCount { solidus });
        }
        return Ok(Some((solidus, left, right)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    fn span(text: &str) -> TimeDelta {
        FixedSpans::default().parse_span(text).unwrap()
    }

    #[test]
    fn start_end() {
        let i = parse_interval("2007-03-01T13:00:00Z/2008-05-11T15:30:00Z").unwrap();
        assert_eq!(i.kind, IntervalKind::StartEnd);
        assert_eq!(i.start, Some(at("2007-03-01T13:00:00Z")));
        assert_eq!(i.end, Some(at("2008-05-11T15:30:00Z")));
        assert_eq!(i.duration, None);
        assert_eq!(i.solidus, Solidus::Primary);
    }

    #[test]
    fn start_duration() {
        let i = parse_interval("2007-03-01T13:00:00Z/P1Y2M10DT2H30M").unwrap();
        assert_eq!(i.kind, IntervalKind::StartDuration);
        assert_eq!(i.start, Some(at("2007-03-01T13:00:00Z")));
        assert_eq!(i.end, None);
        assert_eq!(i.duration, Some(span("P1Y2M10DT2H30M")));
    }

    #[test]
    fn duration_end() {
        let i = parse_interval("P1Y2M10DT2H30M/2008-05-11T15:30:00Z").unwrap();
        assert_eq!(i.kind, IntervalKind::DurationEnd);
        assert_eq!(i.start, None);
        assert_eq!(i.end, Some(at("2008-05-11T15:30:00Z")));
        assert!(i.duration.is_some());
    }

    #[test]
    fn duration_only() {
        let i = parse_interval("P1Y2M10DT2H30M").unwrap();
        assert_eq!(i.kind, IntervalKind::DurationOnly);
        assert_eq!(i.duration, Some(span("P1Y2M10DT2H30M")));
        assert_eq!(i.sections(), ["P1Y2M10DT2H30M"]);
    }

    #[test]
    fn date_time_only() {
        let i = parse_interval("2018-01-01Z").unwrap();
        assert_eq!(i.kind, IntervalKind::DateTimeOnly);
        assert_eq!(i.start, Some(at("2018-01-01T00:00:00Z")));
    }

    #[test]
    fn open_intervals() {
        let start = parse_interval("2018-01-01Z/").unwrap();
        assert_eq!(start.kind, IntervalKind::StartOnly);
        assert!(start.start.is_some() && start.end.is_none());

        let end = parse_interval("/2018-01-01Z").unwrap();
        assert_eq!(end.kind, IntervalKind::EndOnly);
        assert!(end.start.is_none() && end.end.is_some());
    }

    #[test]
    fn secondary_solidus() {
        let i = parse_interval("2007-03-01T13:00:00Z--2008-05-11T15:30:00Z").unwrap();
        assert_eq!(i.kind, IntervalKind::StartEnd);
        assert_eq!(i.solidus, Solidus::Secondary);
        assert_eq!(i.sections(), ["2007-03-01T13:00:00Z", "2008-05-11T15:30:00Z"]);
        assert_eq!(i.input(), "2007-03-01T13:00:00Z--2008-05-11T15:30:00Z");
    }

    #[test]
    fn too_many_separators() {
        assert_eq!(
            parse_interval("2007-03-01Z/P1D/2008-01-01Z"),
            Err(ParseError::SeparatorCount {
                solidus: Solidus::Primary
            })
        );
        assert_eq!(
            parse_interval("2007-03-01Z--P1D--2008-01-01Z"),
            Err(ParseError::SeparatorCount {
                solidus: Solidus::Secondary
            })
        );
    }

    #[test]
    fn duration_on_both_sides() {
        assert_eq!(parse_interval("P1D/PT1H"), Err(ParseError::DurationOnBothSides));
    }

    #[test]
    fn missing_endpoint() {
        assert_eq!(parse_interval("/"), Err(ParseError::MissingEndpoint));
        assert_eq!(parse_interval("P1D/"), Err(ParseError::MissingEndpoint));
        assert_eq!(parse_interval("/PT1H"), Err(ParseError::MissingEndpoint));
    }

    #[test]
    fn unrecognized_sections() {
        assert_eq!(
            parse_interval("2007-03-01Z/soon"),
            Err(ParseError::UnrecognizedSection {
                section: "soon".into()
            })
        );
        assert!(matches!(
            parse_interval("yesterday"),
            Err(ParseError::UnrecognizedSection { .. })
        ));
        assert!(matches!(
            parse_interval(""),
            Err(ParseError::UnrecognizedSection { .. })
        ));
    }

    #[test]
    fn overlong_duration_is_not_unrecognized() {
        let expected = Err(ParseError::SpanOutOfRange {
            section: "P999999999999999Y".into(),
        });
        assert!(crate::parse_duration("P999999999999999Y", &Default::default()).is_ok());
        assert_eq!(parse_interval("P999999999999999Y"), expected);
        assert_eq!(parse_interval("2007-03-01Z/P999999999999999Y"), expected);
    }

    #[test]
    fn surrounding_whitespace_is_rejected_on_both_sides() {
        for text in [
            " 2007-03-01T13:00:00Z/P1D",
            "2007-03-01T13:00:00Z /P1D",
            "2007-03-01T13:00:00Z/ P1D",
            " 2018-01-01Z",
        ] {
            assert!(
                matches!(parse_interval(text), Err(ParseError::UnrecognizedSection { .. })),
                "{text:?}"
            );
        }
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_send_sync() {
        assert_send_sync::<IsoInterval>();
        assert_send_sync::<IntervalParser>();
        assert_send_sync::<IntervalKind>();
        assert_send_sync::<Solidus>();
        assert_send_sync::<ParseError>();
    }

    #[test]
    fn one_parser_shared_across_threads() {
        let parser: IntervalParser = IntervalParser::default();
        std::thread::scope(|scope| {
            for text in ["2018-01-01Z/P1D", "P1D/2018-01-01Z", "P1D"] {
                let parser = &parser;
                scope.spawn(move || assert!(parser.parse(text).is_ok(), "{text}"));
            }
        });
    }

    #[test]
    fn custom_readers() {
        let epoch = at("1970-01-01T00:00:00Z");
        let parser = IntervalParser::new(
            move |s: &str| (s == "epoch").then_some(epoch),
            |s: &str| (s == "forever").then_some(TimeDelta::MAX),
        );
        let i = parser.parse("epoch/forever").unwrap();
        assert_eq!(i.kind, IntervalKind::StartDuration);
        assert_eq!(i.start, Some(epoch));
        assert_eq!(i.duration, Some(TimeDelta::MAX));
    }
}
