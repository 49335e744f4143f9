//! Fixed-point decimal values stored as scaled integers.
//!
//! A fixed-point value with precision `p` is stored as `value * 10^p`, so
//! `12345` with precision 2 is `123.45`. A [`FixedPointRule`] describes how a
//! scaled integer is rendered as text and read back:
//!
//! - one pattern each for positive, negative, zero and missing values
//!   (see [`crate::codec::pattern`] for the pattern syntax)
//! - a decimal separator and a thousands delimiter
//! - a unit prefix such as `"$"`
//! - a blank value returned for unparseable input
//! - a regex recognizing negative input such as `"4.56CR"`

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::codec::pattern::Directive;
use crate::config::{Settings, DEFAULT_PRECISION};
use crate::error::CodecError;
use crate::limits::{pow10, MAX_PRECISION};

/// Pattern used when a rule sets no positive pattern.
pub const DEFAULT_PATTERN: &str = "%m";

lazy_static! {
    static ref DEFAULT_NEGATIVE_REGEX: Regex =
        Regex::new(r"(?i)^(?P<sign>-)?(?P<number>[0-9]*\.?[0-9]*)\s*(?P<marker>cr)?")
            .expect("default negative regex is valid");
}

/// Rendering and parsing rules for one fixed-point attribute.
#[derive(Debug, Clone)]
pub struct FixedPointRule {
    precision: u32,
    /// Replaces the `.` decimal point when set.
    pub separator: Option<String>,
    /// Thousands delimiter inserted into the integer part when set.
    pub delimiter: Option<String>,
    /// Pattern for positive values, and the fallback for the others.
    pub positive: String,
    /// Pattern for negative values. The value is negated before formatting,
    /// so the pattern itself must show the sign (e.g. `"%m CR"`).
    pub negative: Option<String>,
    /// Pattern for zero.
    pub zero: Option<String>,
    /// Pattern for a missing value, which is then formatted as zero.
    pub nil: Option<String>,
    /// Prefix prepended to every rendered value.
    pub unit: Option<String>,
    /// Value returned when parsing finds no digits.
    pub blank: Option<i64>,
    negative_regex: Regex,
}

impl Default for FixedPointRule {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            separator: None,
            delimiter: None,
            positive: DEFAULT_PATTERN.to_string(),
            negative: None,
            zero: None,
            nil: None,
            unit: None,
            blank: None,
            negative_regex: DEFAULT_NEGATIVE_REGEX.clone(),
        }
    }
}

impl FixedPointRule {
    /// Creates the default rule: precision 2, `.` separator, no delimiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rule with the given precision.
    pub fn with_precision(precision: u32) -> Result<Self, CodecError> {
        check_precision(precision)?;
        Ok(Self {
            precision,
            ..Self::default()
        })
    }

    /// Creates a rule using the precision from process settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, CodecError> {
        Self::with_precision(settings.fixed_point_precision)
    }

    /// Returns the number of implied decimal digits.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the regex used to recognize negative input.
    pub fn negative_regex(&self) -> &Regex {
        &self.negative_regex
    }

    /// Sets the decimal separator.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Sets the thousands delimiter.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Sets the positive pattern.
    pub fn positive(mut self, pattern: impl Into<String>) -> Self {
        self.positive = pattern.into();
        self
    }

    /// Sets the negative pattern.
    pub fn negative(mut self, pattern: impl Into<String>) -> Self {
        self.negative = Some(pattern.into());
        self
    }

    /// Sets the zero pattern.
    pub fn zero(mut self, pattern: impl Into<String>) -> Self {
        self.zero = Some(pattern.into());
        self
    }

    /// Sets the pattern for missing values.
    pub fn nil(mut self, pattern: impl Into<String>) -> Self {
        self.nil = Some(pattern.into());
        self
    }

    /// Sets the unit prefix.
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the value returned for unparseable input.
    pub fn blank(mut self, blank: Option<i64>) -> Self {
        self.blank = blank;
        self
    }

    /// Replaces the negative-input regex.
    ///
    /// The regex must define a `number` capture group holding the unsigned
    /// numeral. A participating `sign` or `marker` group marks the input as
    /// negative.
    pub fn with_negative_regex(mut self, regex: Regex) -> Result<Self, CodecError> {
        if !regex.capture_names().any(|name| name == Some("number")) {
            return Err(CodecError::InvalidNegativeRegex {
                pattern: regex.as_str().to_string(),
            });
        }
        self.negative_regex = regex;
        Ok(self)
    }

    fn scale(&self) -> u128 {
        // precision is validated on construction
        10u128.pow(self.precision)
    }
}

fn check_precision(precision: u32) -> Result<i64, CodecError> {
    pow10(precision).ok_or(CodecError::PrecisionOutOfRange {
        precision,
        max: MAX_PRECISION,
    })
}

/// Decimal point and thousands delimiter used while rendering.
struct Punctuation<'a> {
    separator: &'a str,
    delimiter: Option<&'a str>,
}

const PLAIN: Punctuation<'static> = Punctuation {
    separator: ".",
    delimiter: None,
};

/// Renders a scaled integer (or a missing value) with the rule.
///
/// ```rust
/// use value_codec::codec::{integer_to_fixed_point, FixedPointRule};
///
/// let rule = FixedPointRule::default();
/// assert_eq!(integer_to_fixed_point(Some(12345), &rule), "123.45");
/// assert_eq!(integer_to_fixed_point(Some(-1), &rule), "-0.01");
///
/// let euro = FixedPointRule::default().separator(",").delimiter(".").unit("€ ");
/// assert_eq!(integer_to_fixed_point(Some(123456789), &euro), "€ 1.234.567,89");
/// ```
pub fn integer_to_fixed_point(value: Option<i64>, rule: &FixedPointRule) -> String {
    let (pattern, number) = match value {
        None => (rule.nil.as_deref().unwrap_or(&rule.positive), 0i128),
        Some(v) if v > 0 => (rule.positive.as_str(), i128::from(v)),
        Some(0) => (rule.zero.as_deref().unwrap_or(&rule.positive), 0),
        Some(v) => match rule.negative.as_deref() {
            Some(negative) => (negative, -i128::from(v)),
            None => (rule.positive.as_str(), i128::from(v)),
        },
    };

    let punctuation = Punctuation {
        separator: rule.separator.as_deref().unwrap_or("."),
        delimiter: rule.delimiter.as_deref().filter(|d| !d.is_empty()),
    };
    let body = render(number, pattern, rule, &punctuation);
    match rule.unit.as_deref() {
        Some(unit) => format!("{unit}{body}"),
        None => body,
    }
}

/// Formats a scaled integer with a single pattern.
///
/// Separator, delimiter and unit are not applied. A pattern without a
/// `%...f`/`%...m` directive is returned unchanged.
pub fn format_fixed_point(value: i64, pattern: &str, rule: &FixedPointRule) -> String {
    render(i128::from(value), pattern, rule, &PLAIN)
}

fn render(value: i128, pattern: &str, rule: &FixedPointRule, punctuation: &Punctuation<'_>) -> String {
    let Some(directive) = Directive::parse(pattern) else {
        return pattern.to_string();
    };

    let scale = rule.scale();
    let magnitude = value.unsigned_abs();
    let whole = magnitude / scale;
    let cents = magnitude % scale;

    // "-0.01": the sign comes from the value, not from the integer part
    let mut integer = directive.pad_integer(whole, value < 0);
    if let Some(delimiter) = punctuation.delimiter {
        integer = group_thousands(&integer, delimiter);
    }

    let digits = directive.precision.unwrap_or(rule.precision) as usize;
    if digits == 0 {
        return format!("{}{}{}", directive.prefix, integer, directive.suffix);
    }

    let mut fraction = if rule.precision == 0 {
        String::new()
    } else {
        format!("{:0width$}", cents, width = rule.precision as usize)
    };
    if fraction.len() > digits {
        fraction.truncate(digits);
    } else {
        fraction.extend(std::iter::repeat_n('0', digits - fraction.len()));
    }

    format!(
        "{}{}{}{}{}",
        directive.prefix, integer, punctuation.separator, fraction, directive.suffix
    )
}

/// Inserts `delimiter` between groups of three digits in the first digit run.
fn group_thousands(text: &str, delimiter: &str) -> String {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return text.to_string();
    };
    let run_len = text[start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len() - start);
    let end = start + run_len;
    let digits = &text[start..end];

    let mut grouped = String::with_capacity(text.len() + run_len / 3 * delimiter.len());
    grouped.push_str(&text[..start]);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (run_len - i) % 3 == 0 {
            grouped.push_str(delimiter);
        }
        grouped.push(ch);
    }
    grouped.push_str(&text[end..]);
    grouped
}

/// Parses fixed-point text back into a scaled integer.
///
/// Input is permissive: delimiters and leading currency text are ignored,
/// extra fractional digits are truncated, and input without any digit
/// returns the rule's blank value.
///
/// ```rust
/// use value_codec::codec::{fixed_point_to_integer, FixedPointRule};
///
/// let rule = FixedPointRule::default();
/// assert_eq!(fixed_point_to_integer("123.45", &rule), Some(12345));
/// assert_eq!(fixed_point_to_integer("4.56CR", &rule), Some(-456));
/// assert_eq!(fixed_point_to_integer("-0.50", &rule), Some(-50));
/// assert_eq!(fixed_point_to_integer("n/a", &rule), None);
/// ```
pub fn fixed_point_to_integer(text: &str, rule: &FixedPointRule) -> Option<i64> {
    let mut normalized = text.to_string();
    if let Some(delimiter) = rule.delimiter.as_deref().filter(|d| !d.is_empty()) {
        normalized = normalized.replace(delimiter, "");
    }
    if let Some(separator) = rule.separator.as_deref().filter(|s| !s.is_empty()) {
        normalized = normalized.replace(separator, ".");
    }

    let trimmed = normalized
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | ',')));
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return rule.blank;
    }
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let Some(caps) = rule.negative_regex.captures(trimmed) else {
        debug!(text, "fixed-point input did not match the negative regex");
        return rule.blank;
    };
    let number = caps.name("number").map_or("", |m| m.as_str());
    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return rule.blank;
    }
    let negative = caps.name("sign").is_some() || caps.name("marker").is_some();

    match scale_numeral(number, rule.precision) {
        Some(magnitude) if negative => Some(-magnitude),
        Some(magnitude) => Some(magnitude),
        None => {
            debug!(text, "fixed-point input overflows i64");
            rule.blank
        }
    }
}

/// Converts an unsigned decimal numeral to `value * 10^precision`.
fn scale_numeral(number: &str, precision: u32) -> Option<i64> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let mut fraction_value = 0i64;
    let mut fraction_digits = fraction.bytes().filter(u8::is_ascii_digit);
    for _ in 0..precision {
        let digit = fraction_digits.next().map_or(0, |b| i64::from(b - b'0'));
        fraction_value = fraction_value * 10 + digit;
    }

    whole.checked_mul(pow10(precision)?)?.checked_add(fraction_value)
}

/// Converts a scaled integer to a float.
pub fn integer_to_float(value: i64, precision: u32) -> Result<f64, CodecError> {
    let scale = check_precision(precision)?;
    Ok(value as f64 / scale as f64)
}

/// Converts a float to a scaled integer, truncating toward zero.
///
/// The value is scaled by one extra digit and then divided by ten, so
/// `1.15` becomes `115` although `1.15 * 100` is `114.999...` in binary.
pub fn float_to_integer(value: f64, precision: u32) -> Result<i64, CodecError> {
    check_precision(precision)?;
    if !value.is_finite() {
        return Err(CodecError::NonFiniteFloat);
    }
    let scaled = (value * 10f64.powi(precision as i32 + 1)).trunc();
    // the extra digit can exceed i64 even when the result fits; `as` saturates
    i64::try_from(scaled as i128 / 10).map_err(|_| CodecError::Overflow {
        context: "float_to_integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(precision: u32) -> FixedPointRule {
        FixedPointRule::with_precision(precision).unwrap()
    }

    #[test]
    fn test_default_rendering() {
        let r = FixedPointRule::default();
        assert_eq!(integer_to_fixed_point(Some(12345), &r), "123.45");
        assert_eq!(integer_to_fixed_point(Some(-1), &r), "-0.01");
        assert_eq!(integer_to_fixed_point(Some(-12345), &r), "-123.45");
        assert_eq!(integer_to_fixed_point(Some(0), &r), "0.00");
        assert_eq!(integer_to_fixed_point(Some(5), &r), "0.05");
        assert_eq!(integer_to_fixed_point(None, &r), "0.00");
    }

    #[test]
    fn test_precision_zero() {
        let r = rule(0);
        assert_eq!(format_fixed_point(111, "%m", &r), "111");
        assert_eq!(integer_to_fixed_point(Some(111), &r), "111");
        assert_eq!(format_fixed_point(111, "%.2m", &r), "111.00");
    }

    #[test]
    fn test_pattern_selection() {
        let r = FixedPointRule::default()
            .negative("%m CR")
            .zero("free")
            .nil("n/a");
        assert_eq!(integer_to_fixed_point(Some(456), &r), "4.56");
        assert_eq!(integer_to_fixed_point(Some(-456), &r), "4.56 CR");
        assert_eq!(integer_to_fixed_point(Some(0), &r), "free");
        assert_eq!(integer_to_fixed_point(None, &r), "n/a");
    }

    #[test]
    fn test_nil_pattern_formats_zero() {
        let r = FixedPointRule::default().nil("(%m)");
        assert_eq!(integer_to_fixed_point(None, &r), "(0.00)");
    }

    #[test]
    fn test_negative_pattern_handles_min() {
        let r = rule(0).negative("%m-");
        assert_eq!(
            integer_to_fixed_point(Some(i64::MIN), &r),
            "9223372036854775808-"
        );
    }

    #[test]
    fn test_pattern_width_and_precision() {
        let r = FixedPointRule::default();
        assert_eq!(format_fixed_point(12345, "%07.2m", &r), "0000123.45");
        assert_eq!(format_fixed_point(12345, "%7.1m", &r), "    123.4");
        assert_eq!(format_fixed_point(12345, "%.3m", &r), "123.450");
        assert_eq!(format_fixed_point(12345, "%.0m", &r), "123");
        assert_eq!(format_fixed_point(12345, "$%m USD", &r), "$123.45 USD");
        assert_eq!(format_fixed_point(-5, "%05.2f", &r), "-0000.05");
        assert_eq!(format_fixed_point(12345, "%+m", &r), "+123.45");
    }

    #[test]
    fn test_literal_pattern_is_returned_verbatim() {
        let r = FixedPointRule::default();
        assert_eq!(format_fixed_point(12345, "free", &r), "free");
        assert_eq!(format_fixed_point(12345, "%d", &r), "%d");
    }

    #[test]
    fn test_oversized_width_pattern_is_literal() {
        let r = FixedPointRule::default();
        let pattern = "%99999999999999999999999m";
        assert_eq!(format_fixed_point(1, pattern, &r), pattern);
        assert_eq!(format_fixed_point(1, "%5000m", &r), "%5000m");
        assert_eq!(format_fixed_point(12345, "%.4000000000m", &r), "%.4000000000m");
    }

    #[test]
    fn test_separator_delimiter_unit() {
        let r = FixedPointRule::default().delimiter(",");
        assert_eq!(integer_to_fixed_point(Some(123456789), &r), "1,234,567.89");
        assert_eq!(integer_to_fixed_point(Some(-123456789), &r), "-1,234,567.89");
        assert_eq!(integer_to_fixed_point(Some(12345), &r), "123.45");

        let euro = FixedPointRule::default().separator(",").delimiter(" ").unit("EUR ");
        assert_eq!(integer_to_fixed_point(Some(100000000), &euro), "EUR 1 000 000,00");

        let dollars = FixedPointRule::default().unit("$").positive("%.0m");
        assert_eq!(integer_to_fixed_point(Some(123456), &dollars), "$1234");
    }

    #[test]
    fn test_parse_basic() {
        let r = FixedPointRule::default();
        assert_eq!(fixed_point_to_integer("123.45", &r), Some(12345));
        assert_eq!(fixed_point_to_integer("123", &r), Some(12300));
        assert_eq!(fixed_point_to_integer("123.4", &r), Some(12340));
        assert_eq!(fixed_point_to_integer("123.456", &r), Some(12345));
        assert_eq!(fixed_point_to_integer(".5", &r), Some(50));
        assert_eq!(fixed_point_to_integer("+7", &r), Some(700));
    }

    #[test]
    fn test_parse_negative_forms() {
        let r = FixedPointRule::default();
        assert_eq!(fixed_point_to_integer("4.56CR", &r), Some(-456));
        assert_eq!(fixed_point_to_integer("4.56 cr", &r), Some(-456));
        assert_eq!(fixed_point_to_integer("-4.56", &r), Some(-456));
        assert_eq!(fixed_point_to_integer("-0.50", &r), Some(-50));
        assert_eq!(fixed_point_to_integer("-.01", &r), Some(-1));
    }

    #[test]
    fn test_parse_strips_unit_and_delimiter() {
        let r = FixedPointRule::default().delimiter(",").unit("$");
        assert_eq!(fixed_point_to_integer("$1,234,567.89", &r), Some(123456789));
        assert_eq!(fixed_point_to_integer("USD -12.00", &r), Some(-1200));

        let euro = FixedPointRule::default().separator(",").delimiter(".");
        assert_eq!(fixed_point_to_integer("1.234,56", &euro), Some(123456));
    }

    #[test]
    fn test_parse_blank() {
        let r = FixedPointRule::default();
        assert_eq!(fixed_point_to_integer("", &r), None);
        assert_eq!(fixed_point_to_integer("abc", &r), None);
        assert_eq!(fixed_point_to_integer("-", &r), None);

        let zero_blank = FixedPointRule::default().blank(Some(0));
        assert_eq!(fixed_point_to_integer("n/a", &zero_blank), Some(0));
    }

    #[test]
    fn test_parse_overflow_is_blank() {
        let r = FixedPointRule::default().blank(Some(-1));
        assert_eq!(fixed_point_to_integer("99999999999999999999", &r), Some(-1));
    }

    #[test]
    fn test_custom_negative_regex() {
        let regex = Regex::new(r"^(?P<number>[0-9.]+)\s*(?P<marker>DR)?").unwrap();
        let r = FixedPointRule::default().with_negative_regex(regex).unwrap();
        assert_eq!(fixed_point_to_integer("10.00 DR", &r), Some(-1000));
        assert_eq!(fixed_point_to_integer("10.00", &r), Some(1000));

        let bad = Regex::new(r"^(\d+)").unwrap();
        assert!(matches!(
            FixedPointRule::default().with_negative_regex(bad),
            Err(CodecError::InvalidNegativeRegex { .. })
        ));
    }

    #[test]
    fn test_precision_validation() {
        assert!(FixedPointRule::with_precision(18).is_ok());
        assert_eq!(
            FixedPointRule::with_precision(19).unwrap_err(),
            CodecError::PrecisionOutOfRange { precision: 19, max: 18 }
        );
        assert!(integer_to_float(1, 19).is_err());
        assert!(float_to_integer(1.0, 19).is_err());
    }

    #[test]
    fn test_float_conversions() {
        assert_eq!(integer_to_float(12345, 2).unwrap(), 123.45);
        assert_eq!(integer_to_float(-5, 1).unwrap(), -0.5);
        assert_eq!(float_to_integer(1.15, 2).unwrap(), 115);
        assert_eq!(float_to_integer(-1.15, 2).unwrap(), -115);
        assert_eq!(float_to_integer(0.999, 2).unwrap(), 99);
        assert_eq!(float_to_integer(f64::NAN, 2), Err(CodecError::NonFiniteFloat));
        assert!(matches!(
            float_to_integer(1e30, 2),
            Err(CodecError::Overflow { .. })
        ));
    }

    #[test]
    fn test_float_to_integer_at_max_precision() {
        assert_eq!(float_to_integer(1.0, 18).unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(float_to_integer(-9.0, 18).unwrap(), -9_000_000_000_000_000_000);
        assert!(matches!(
            float_to_integer(10.0, 18),
            Err(CodecError::Overflow { .. })
        ));
        assert!(matches!(
            float_to_integer(f64::MAX, 2),
            Err(CodecError::Overflow { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            value in -999_999_999_999i64..999_999_999_999i64,
            precision in 0u32..6,
            european in any::<bool>(),
        ) {
            let base = rule(precision);
            let r = if european {
                base.separator(",").delimiter(".")
            } else {
                base.delimiter(",")
            };
            let text = integer_to_fixed_point(Some(value), &r);
            prop_assert_eq!(fixed_point_to_integer(&text, &r), Some(value), "{}", text);
        }
    }
}
