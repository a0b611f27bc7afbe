use fixed_decimal::Decimal;

use crate::decimal;
use crate::duration::DurationField;
use crate::error::ParseError;
use crate::numeral::{DecimalSeparator, NumeralConvention};

/// Reads the numeric token of each component of one duration, in order.
///
/// A reader lives for exactly one parse call. It remembers whether a
/// component already carried a fraction, since any component after that one
/// makes the fraction non-final.
pub(crate) struct FieldReader {
    negative: bool,
    convention: NumeralConvention,
    fraction: Option<DecimalSeparator>,
}

impl FieldReader {
    pub(crate) fn new(negative: bool, convention: NumeralConvention) -> Self {
        FieldReader {
            negative,
            convention,
            fraction: None,
        }
    }

    /// `None` token means the designator was not present. The returned
    /// value is negated when the duration is negative, and any zero comes
    /// back as the plain zero so `P0.0D` equals `P`.
    pub(crate) fn read(
        &mut self,
        field: DurationField,
        token: Option<&str>,
    ) -> Result<Option<Decimal>, ParseError> {
        let Some(token) = token else {
            return Ok(None);
        };

        let has_point = token.contains('.');
        let has_comma = token.contains(',');
        if has_point && has_comma {
            return Err(ParseError::MixedFractionSeparator {
                field,
                token: token.to_string(),
            });
        }
        if self.fraction.is_some() {
            return Err(ParseError::NonFinalFraction { field });
        }
        if has_point {
            self.fraction = Some(DecimalSeparator::Point);
        } else if has_comma {
            self.fraction = Some(DecimalSeparator::Comma);
        }

        let mut value = self
            .parse_number(token)
            .ok_or_else(|| ParseError::InvalidNumber {
                field,
                token: token.to_string(),
            })?;
        if decimal::is_zero(&value) {
            value = decimal::zero();
        } else if self.negative {
            decimal::negate(&mut value);
        }
        Ok(Some(value))
    }

    /// `digits ((sep) digits)?` where `sep` must be the convention's
    /// separator.
    fn parse_number(&self, token: &str) -> Option<Decimal> {
        let bytes = token.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == 0 {
            return None;
        }
        if pos == bytes.len() {
            return decimal::parse_unsigned(token);
        }

        if DecimalSeparator::from_byte(bytes[pos])? != self.convention.decimal_separator {
            return None;
        }
        let int_end = pos;
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == frac_start || pos != bytes.len() {
            return None;
        }
        decimal::parse_unsigned(&format!("{}.{}", &token[..int_end], &token[frac_start..]))
    }
}
