use super::IsoDuration;
use crate::decimal;
use crate::numeral::NumeralConvention;

/// Writes `duration` as `[-]P[nY][nM][nW][nD][T[nH][nM][nS]]`, skipping
/// zero components. The empty duration is `P`.
///
/// Fractions are written with the separator of `convention`, whatever the
/// input used, so text parsed under one convention and formatted under
/// another does not round-trip.
pub(super) fn format(duration: &IsoDuration, convention: &NumeralConvention) -> String {
    let mut out = String::new();
    if duration.is_negative() {
        out.push('-');
    }
    out.push('P');

    let mut in_time = false;
    for (field, value) in duration.components() {
        if !field.is_date() && !in_time {
            out.push('T');
            in_time = true;
        }
        out.push_str(&decimal::magnitude_text(value, convention.decimal_separator));
        out.push(field.designator());
    }
    out
}
