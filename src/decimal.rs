//! Helpers over [`fixed_decimal::Decimal`] for duration magnitudes.
//!
//! Magnitudes keep the exact digits of the input. Arithmetic only ever
//! needs "integer part" and "fraction of a unit in nanoseconds", so both are
//! derived from the decimal's rendered digits instead of going through `f64`.

use fixed_decimal::{Decimal, Sign};
use writeable::Writeable;

use crate::numeral::DecimalSeparator;

/// Fraction digits beyond this do not change a nanosecond result: even a
/// leap year is under 10^17 ns.
const MAX_FRACTION_DIGITS: usize = 18;

pub(crate) fn zero() -> Decimal {
    Decimal::from(0i32)
}

pub(crate) fn is_zero(value: &Decimal) -> bool {
    value.absolute.is_zero()
}

pub(crate) fn is_negative(value: &Decimal) -> bool {
    value.sign == Sign::Negative && !is_zero(value)
}

/// Marks a non-zero value as negative. Zero stays unsigned so that `-P0D`
/// and `P0D` read the same.
pub(crate) fn negate(value: &mut Decimal) {
    if !is_zero(value) {
        value.sign = Sign::Negative;
    }
}

/// The digits carry a decimal separator, even one followed only by zeros.
/// This is how a component's text is judged to be fractional.
pub(crate) fn has_fraction_digits(value: &Decimal) -> bool {
    magnitude_text(value, DecimalSeparator::Point).contains('.')
}

/// Parses an unsigned `digits[.digits]` string.
pub(crate) fn parse_unsigned(digits: &str) -> Option<Decimal> {
    let value = Decimal::try_from_str(digits).ok()?;
    if value.sign != Sign::None {
        return None;
    }
    Some(value)
}

/// Absolute value rendered with the given separator, e.g. `12,5`.
pub(crate) fn magnitude_text(value: &Decimal, separator: DecimalSeparator) -> String {
    let rendered = value.write_to_string();
    let digits = rendered.trim_start_matches(['-', '+']);
    match separator {
        DecimalSeparator::Point => digits.to_string(),
        DecimalSeparator::Comma => digits.replace('.', ","),
    }
}

/// Signed integer part and signed fractional remainder of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Parts {
    pub whole: i128,
    numerator: i128,
    denominator: i128,
}

impl Parts {
    pub(crate) fn of(value: &Decimal) -> Option<Parts> {
        let text = magnitude_text(value, DecimalSeparator::Point);
        let (int_digits, frac_digits) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let frac_digits = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)];

        let mut whole: i128 = int_digits.parse().ok()?;
        let mut numerator: i128 = if frac_digits.is_empty() {
            0
        } else {
            frac_digits.parse().ok()?
        };
        let denominator = 10i128.checked_pow(frac_digits.len() as u32)?;
        if is_negative(value) {
            whole = -whole;
            numerator = -numerator;
        }
        Some(Parts {
            whole,
            numerator,
            denominator,
        })
    }

    pub(crate) fn has_fraction(&self) -> bool {
        self.numerator != 0
    }

    /// The fractional remainder scaled by `unit_nanos`, truncated toward
    /// zero.
    pub(crate) fn fraction_nanos(&self, unit_nanos: i128) -> Option<i128> {
        Some(self.numerator.checked_mul(unit_nanos)? / self.denominator)
    }

    /// The whole value scaled by `unit_nanos`.
    pub(crate) fn total_nanos(&self, unit_nanos: i128) -> Option<i128> {
        self.whole
            .checked_mul(unit_nanos)?
            .checked_add(self.fraction_nanos(unit_nanos)?)
    }
}
