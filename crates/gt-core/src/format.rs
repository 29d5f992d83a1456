//! Number-to-text helpers used for mixture names and output file names.

/// Separator substituted for `.` so that numbers can live inside file names.
pub const DECIMAL_SEPARATOR: char = 'p';

/// Strip trailing zeros, then a trailing decimal point.
///
/// `"2.3000"` becomes `"2.3"`, `"1.0000"` becomes `"1"`. Strings without a
/// decimal point are returned unchanged.
pub fn clean_number_string(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0');
    trimmed.trim_end_matches('.').to_string()
}

/// Round to three decimals and print without superfluous zeros.
pub fn number_to_clean_string(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let text = clean_number_string(&format!("{rounded:.6}"));
    // "-0" after rounding a tiny negative value
    if text == "-0" { "0".to_string() } else { text }
}

/// Replace the decimal point with [`DECIMAL_SEPARATOR`].
pub fn file_safe(number: &str) -> String {
    number.replace('.', &DECIMAL_SEPARATOR.to_string())
}

/// Percentage token for a unit fraction, e.g. `0.0999 -> "9p99"`.
pub fn percent_token(fraction: f64) -> String {
    file_safe(&clean_number_string(&format!("{:.6}", fraction * 100.0)))
}
