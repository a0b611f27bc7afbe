// --- ISO 8601 duration scanner ---
// Format: [-]P[nY][nM][nW][nD][T[nH][nM][nS]], designators in this order.

use tracing::{debug, trace};

use super::field::FieldReader;
use super::{DurationField, IsoDuration};
use crate::error::ParseError;
use crate::numeral::NumeralConvention;

const DATE_FIELDS: [DurationField; 4] = [
    DurationField::Years,
    DurationField::Months,
    DurationField::Weeks,
    DurationField::Days,
];

const TIME_FIELDS: [DurationField; 3] = [
    DurationField::Hours,
    DurationField::Minutes,
    DurationField::Seconds,
];

/// Raw numeric tokens of a grammatically valid duration, indexed by field.
struct Captures<'a> {
    negative: bool,
    tokens: [Option<&'a str>; 7],
}

pub(super) fn parse(text: &str, convention: &NumeralConvention) -> Result<IsoDuration, ParseError> {
    let result = read_captures(text, convention);
    if let Err(err) = &result {
        debug!(input = text, error = %err, "rejected duration");
    }
    result
}

fn read_captures(text: &str, convention: &NumeralConvention) -> Result<IsoDuration, ParseError> {
    let captures = match_grammar(text).ok_or_else(|| ParseError::GrammarMismatch {
        input: text.to_string(),
    })?;
    trace!(input = text, negative = captures.negative, "matched duration grammar");

    let mut duration = IsoDuration {
        negative: captures.negative,
        ..IsoDuration::default()
    };
    let mut reader = FieldReader::new(captures.negative, *convention);
    for field in DurationField::ALL {
        if let Some(value) = reader.read(field, captures.tokens[field.index()])? {
            duration.fields[field.index()] = value;
        }
    }
    Ok(duration)
}

fn match_grammar(text: &str) -> Option<Captures<'_>> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative {
        pos += 1;
    }
    if bytes.get(pos) != Some(&b'P') {
        return None;
    }
    pos += 1;

    let mut tokens = [None; 7];
    pos = scan_section(text, pos, &DATE_FIELDS, &mut tokens)?;
    if bytes.get(pos) == Some(&b'T') {
        pos += 1;
        pos = scan_section(text, pos, &TIME_FIELDS, &mut tokens)?;
    }

    (pos == bytes.len()).then_some(Captures { negative, tokens })
}

/// Scans `number designator` pairs until `T` or end of input. Each
/// designator must come after the previous one in `fields`.
fn scan_section<'a>(
    text: &'a str,
    mut pos: usize,
    fields: &[DurationField],
    tokens: &mut [Option<&'a str>; 7],
) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut next = 0;
    while pos < bytes.len() && bytes[pos] != b'T' {
        let start = pos;
        while pos < bytes.len() && matches!(bytes[pos], b'0'..=b'9' | b'.' | b',') {
            pos += 1;
        }
        if pos == start || pos == bytes.len() {
            return None;
        }
        let designator = char::from(bytes[pos]);
        let offset = fields[next..]
            .iter()
            .position(|f| f.designator() == designator)?;
        let field = fields[next + offset];
        tokens[field.index()] = Some(&text[start..pos]);
        next += offset + 1;
        pos += 1;
    }
    Some(pos)
}
