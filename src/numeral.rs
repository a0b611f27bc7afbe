/// Character separating the integer and fractional digits of a component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecimalSeparator {
    /// `.` as in `PT1.5S`
    #[default]
    Point,
    /// `,` as in `PT1,5S`
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(self) -> char {
        match self {
            DecimalSeparator::Point => '.',
            DecimalSeparator::Comma => ',',
        }
    }

    pub(crate) fn from_byte(b: u8) -> Option<DecimalSeparator> {
        match b {
            b'.' => Some(DecimalSeparator::Point),
            b',' => Some(DecimalSeparator::Comma),
            _ => None,
        }
    }
}

/// How numbers inside a duration are written.
///
/// This is passed explicitly to every parse and format call; nothing is
/// read from the process environment. Components are read without digit
/// grouping, so the only knob is the decimal separator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NumeralConvention {
    pub decimal_separator: DecimalSeparator,
}

impl NumeralConvention {
    pub const fn new(decimal_separator: DecimalSeparator) -> Self {
        NumeralConvention { decimal_separator }
    }

    /// `.` decimals, the convention used by `Display` and `FromStr`.
    pub const fn point() -> Self {
        NumeralConvention::new(DecimalSeparator::Point)
    }

    /// `,` decimals, as written in most continental European locales.
    pub const fn comma() -> Self {
        NumeralConvention::new(DecimalSeparator::Comma)
    }
}
