//! Byte quantity formatting and parsing.
//!
//! Formatting picks the largest unit not exceeding the byte count and
//! truncates the quotient to the configured number of fractional digits.
//! Truncation, not rounding, is the documented behavior: 1535 bytes with one
//! digit of precision is `"1.4 KiB"`, not `"1.5 KiB"`.
//!
//! Parsing is permissive: input without a leading number yields 0 and an
//! unknown unit is treated as plain bytes.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::codec::units::{canonical_unit, select_table, KbPolicy, COMBINED};
use crate::config::{Settings, DEFAULT_BYTE_PARSE_DIGITS};

lazy_static! {
    static ref QUANTITY: Regex =
        Regex::new(r"^\s*(?P<number>[0-9]+(?:\.[0-9]*)?|\.[0-9]+)\s*(?P<unit>[A-Za-z]+)?")
            .expect("quantity regex is valid");
}

/// Options for byte formatting and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteOptions {
    /// Unit table selection.
    pub policy: KbPolicy,
    /// Fractional digits shown when formatting.
    pub precision: usize,
    /// Fractional digits of the parsed number kept before multiplying by the
    /// unit and truncating to whole bytes.
    pub parse_digits: u32,
}

impl Default for ByteOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ByteOptions {
    /// Creates default options (combined table, one fractional digit).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options from process settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            policy: settings.kb_policy,
            precision: settings.byte_precision,
            parse_digits: DEFAULT_BYTE_PARSE_DIGITS,
        }
    }

    /// Sets the unit policy.
    pub fn policy(mut self, policy: KbPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the formatting precision.
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

/// Formats a byte count with the best-fitting unit of the selected table.
///
/// ```rust
/// use value_codec::codec::{format_bytes, ByteOptions};
///
/// let opts = ByteOptions::default();
/// assert_eq!(format_bytes(900, &opts), "900 B");
/// assert_eq!(format_bytes(1000, &opts), "1 KB");
/// assert_eq!(format_bytes(12345, &opts), "12 KiB");
/// ```
pub fn format_bytes(bytes: u128, options: &ByteOptions) -> String {
    let table = select_table(options.policy);
    for entry in table.entries_descending() {
        if entry.multiplier <= bytes {
            let quotient = truncated_quotient(bytes, entry.multiplier, options.precision);
            return format!("{} {}", quotient, entry.unit);
        }
    }
    bytes.to_string()
}

/// Formats a byte count in an explicitly named unit.
///
/// The quotient is rounded to `precision` digits and always shows them. The
/// unit is matched case-insensitively and printed in its canonical form; a
/// unit unknown to the selected table divides by 1 and is printed as given.
pub fn format_bytes_in(bytes: u128, unit: &str, options: &ByteOptions) -> String {
    let table = select_table(options.policy);
    let (multiplier, label) = match canonical_unit(unit) {
        Some(canonical) => match table.multiplier(&canonical) {
            Some(multiplier) => (multiplier, canonical),
            None => (1, unit.to_string()),
        },
        None => (1, unit.to_string()),
    };
    let quotient = bytes as f64 / multiplier as f64;
    format!("{:.*} {}", options.precision, quotient, label)
}

/// Divides exactly and keeps `precision` fractional digits without rounding.
///
/// A fractional part made only of zeros is dropped.
fn truncated_quotient(bytes: u128, multiplier: u128, precision: usize) -> String {
    let whole = bytes / multiplier;
    let mut remainder = bytes % multiplier;
    let mut fraction = String::with_capacity(precision);
    for _ in 0..precision {
        remainder *= 10;
        let digit = (remainder / multiplier) as u8;
        remainder %= multiplier;
        fraction.push(char::from(b'0' + digit));
    }

    if fraction.bytes().all(|b| b == b'0') {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Parses a human byte quantity such as `"1.5 KiB"` or `"20gb"`.
///
/// ```rust
/// use value_codec::codec::{parse_bytes, ByteOptions, KbPolicy};
///
/// assert_eq!(parse_bytes("1.5 KiB", &ByteOptions::default()), 1536);
/// let decimal = ByteOptions::default().policy(KbPolicy::Decimal);
/// assert_eq!(parse_bytes("1 gb", &decimal), 1_000_000_000);
/// ```
pub fn parse_bytes(input: &str, options: &ByteOptions) -> u128 {
    let Some(caps) = QUANTITY.captures(input) else {
        debug!(input, "no numeric literal in byte quantity");
        return 0;
    };
    let number = caps.name("number").map_or("", |m| m.as_str());
    let Some(scaled) = scale_decimal_literal(number, options.parse_digits) else {
        debug!(input, "byte quantity too large");
        return 0;
    };
    let unit = caps.name("unit").map(|m| m.as_str());
    apply_unit(scaled, unit, options)
}

/// Parses a (number, unit) pair, e.g. `(1.5, "KiB")`.
///
/// Negative and non-finite numbers yield 0.
pub fn parse_bytes_pair(value: f64, unit: &str, options: &ByteOptions) -> u128 {
    if !value.is_finite() || value < 0.0 {
        debug!(value, unit, "byte quantity is not a non-negative number");
        return 0;
    }
    let factor = 10f64.powi(options.parse_digits as i32);
    let scaled = (value * factor).trunc() as u128;
    apply_unit(scaled, Some(unit), options)
}

/// Scales a decimal literal by 10^digits, truncating extra fractional digits.
fn scale_decimal_literal(number: &str, digits: u32) -> Option<u128> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let mut fraction_value: u128 = 0;
    let mut fraction_digits = fraction.bytes();
    for _ in 0..digits {
        let digit = fraction_digits.next().map_or(0, |b| u128::from(b - b'0'));
        fraction_value = fraction_value * 10 + digit;
    }

    whole
        .checked_mul(10u128.checked_pow(digits)?)?
        .checked_add(fraction_value)
}

/// Multiplies a scaled quantity by its unit and truncates to whole bytes.
fn apply_unit(scaled: u128, unit: Option<&str>, options: &ByteOptions) -> u128 {
    let multiplier = unit.map_or(1, |unit| unit_multiplier(unit, options.policy));
    let Some(divisor) = 10u128.checked_pow(options.parse_digits) else {
        return 0;
    };
    match scaled.checked_mul(multiplier) {
        Some(product) => product / divisor,
        None => {
            debug!(scaled, multiplier, "byte quantity overflows u128");
            0
        }
    }
}

/// Looks a unit up in the policy table, then in the combined table.
fn unit_multiplier(unit: &str, policy: KbPolicy) -> u128 {
    let Some(canonical) = canonical_unit(unit) else {
        debug!(unit, "unrecognized byte unit, treating value as bytes");
        return 1;
    };
    select_table(policy)
        .multiplier(&canonical)
        .or_else(|| COMBINED.multiplier(&canonical))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(policy: KbPolicy) -> ByteOptions {
        ByteOptions::default().policy(policy)
    }

    #[test]
    fn test_format_combined() {
        let o = opts(KbPolicy::Combined);
        assert_eq!(format_bytes(900, &o), "900 B");
        assert_eq!(format_bytes(1000, &o), "1 KB");
        assert_eq!(format_bytes(12345, &o), "12 KiB");
        assert_eq!(format_bytes(1536, &o), "1.5 KiB");
    }

    #[test]
    fn test_format_zero_falls_back_to_plain_integer() {
        assert_eq!(format_bytes(0, &ByteOptions::default()), "0");
    }

    #[test]
    fn test_format_truncates_instead_of_rounding() {
        let o = opts(KbPolicy::Iec);
        // 1535 / 1024 = 1.499..., truncated to one digit
        assert_eq!(format_bytes(1535, &o), "1.4 KiB");
        // 2047 / 1024 = 1.999..., would round to 2.0
        assert_eq!(format_bytes(2047, &o), "1.9 KiB");
        assert_eq!(format_bytes(2047, &o.precision(3)), "1.999 KiB");
        assert_eq!(format_bytes(2047, &o.precision(0)), "1 KiB");
    }

    #[test]
    fn test_format_keeps_nonzero_trailing_digit() {
        let o = opts(KbPolicy::Decimal).precision(2);
        assert_eq!(format_bytes(1_500_000, &o), "1.50 MB");
        assert_eq!(format_bytes(2_000_000, &o), "2 MB");
    }

    #[test]
    fn test_format_policies() {
        assert_eq!(format_bytes(1024, &opts(KbPolicy::Jedec)), "1 KB");
        assert_eq!(format_bytes(1024, &opts(KbPolicy::Iec)), "1 KiB");
        assert_eq!(format_bytes(1024, &opts(KbPolicy::Decimal)), "1 KB");
        assert_eq!(format_bytes(1_000_000, &opts(KbPolicy::Jedec)), "976.5 KB");
    }

    #[test]
    fn test_format_huge() {
        let yib = 1024u128.pow(8);
        assert_eq!(format_bytes(yib * 3, &opts(KbPolicy::Iec)), "3 YiB");
    }

    #[test]
    fn test_format_in_unit() {
        let o = opts(KbPolicy::Combined).precision(2);
        assert_eq!(format_bytes_in(1536, "KiB", &o), "1.50 KiB");
        assert_eq!(format_bytes_in(1_234_567, "MB", &o), "1.23 MB");
        assert_eq!(format_bytes_in(42, "bogus", &o), "42.00 bogus");
    }

    #[test]
    fn test_format_in_unit_ignores_case() {
        let o = opts(KbPolicy::Combined).precision(2);
        assert_eq!(format_bytes_in(1536, "kib", &o), "1.50 KiB");
        assert_eq!(format_bytes_in(2_500_000, "mb", &o), "2.50 MB");
        // KiB is not in the decimal table
        assert_eq!(format_bytes_in(1536, "kib", &opts(KbPolicy::Decimal)), "1536.00 kib");
    }

    #[test]
    fn test_parse_strings() {
        let combined = ByteOptions::default();
        assert_eq!(parse_bytes("1.5 KiB", &combined), 1536);
        assert_eq!(parse_bytes("1 gb", &opts(KbPolicy::Decimal)), 1_000_000_000);
        assert_eq!(parse_bytes("2 KB", &opts(KbPolicy::Jedec)), 2048);
        assert_eq!(parse_bytes("2kib", &combined), 2048);
        assert_eq!(parse_bytes("512", &combined), 512);
        assert_eq!(parse_bytes("  7 B", &combined), 7);
    }

    #[test]
    fn test_parse_falls_back_to_combined_table() {
        // KiB is not in the decimal table
        assert_eq!(parse_bytes("1 KiB", &opts(KbPolicy::Decimal)), 1024);
    }

    #[test]
    fn test_parse_keeps_two_digits_before_truncating() {
        let o = ByteOptions::default();
        assert_eq!(parse_bytes("1.999 B", &o), 1);
        assert_eq!(parse_bytes("1.005 KB", &o), 1000);
        assert_eq!(parse_bytes("0.5 KiB", &o), 512);
        assert_eq!(parse_bytes(".25 KiB", &o), 256);
    }

    #[test]
    fn test_parse_permissive() {
        let o = ByteOptions::default();
        assert_eq!(parse_bytes("", &o), 0);
        assert_eq!(parse_bytes("lots", &o), 0);
        assert_eq!(parse_bytes("12 parsecs", &o), 12);
    }

    #[test]
    fn test_parse_rejects_non_ascii_digits() {
        let o = ByteOptions::default();
        // ARABIC-INDIC DIGIT FIVE ends the literal, so the unit is never reached
        assert_eq!(parse_bytes("1.\u{0665} KB", &o), 1);
        assert_eq!(parse_bytes("\u{0665} KB", &o), 0);
        assert_eq!(parse_bytes("\u{0967}\u{0968}", &o), 0);
    }

    #[test]
    fn test_parse_pair() {
        let o = ByteOptions::default();
        assert_eq!(parse_bytes_pair(1.5, "KiB", &o), 1536);
        assert_eq!(parse_bytes_pair(3.0, "mb", &opts(KbPolicy::Decimal)), 3_000_000);
        assert_eq!(parse_bytes_pair(-1.0, "KB", &o), 0);
        assert_eq!(parse_bytes_pair(f64::NAN, "KB", &o), 0);
    }

    #[test]
    fn test_format_then_parse_denotes_same_count() {
        let o = opts(KbPolicy::Iec).precision(2);
        for bytes in [1u128, 900, 1536, 10 * 1024 * 1024, 5 * 1024u128.pow(3)] {
            let text = format_bytes(bytes, &o);
            assert_eq!(parse_bytes(&text, &o), bytes, "{text}");
        }
    }
}
