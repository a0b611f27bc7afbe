use thiserror::Error;

use crate::duration::DurationField;
use crate::interval::Solidus;

/// Why a duration or interval string was rejected.
///
/// Parsing is all-or-nothing: a `ParseError` is the only outcome of a
/// rejected input, there is no partially filled value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input does not match ISO 8601 duration grammar: {input:?}")]
    GrammarMismatch { input: String },

    #[error("cannot have both '.' and ',' in one number ({field} component {token:?})")]
    MixedFractionSeparator { field: DurationField, token: String },

    #[error("decimal fraction can only be specified in the last component (found before {field})")]
    NonFinalFraction { field: DurationField },

    #[error("invalid numeric component {token:?} for {field}")]
    InvalidNumber { field: DurationField, token: String },

    #[error("too many '{solidus}' separators, only one solidus is allowed")]
    SeparatorCount { solidus: Solidus },

    #[error("section {section:?} is neither a valid timestamp nor a valid duration")]
    UnrecognizedSection { section: String },

    #[error("duration {section:?} is too long to represent as a span")]
    SpanOutOfRange { section: String },

    #[error("a two-sided interval cannot have a duration on both sides")]
    DurationOnBothSides,

    #[error("an interval needs a timestamp on at least one side of the solidus")]
    MissingEndpoint,
}

/// Failure while applying a duration to a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddError {
    #[error("adding the {field} component leaves the representable date-time range")]
    Overflow { field: DurationField },
}
