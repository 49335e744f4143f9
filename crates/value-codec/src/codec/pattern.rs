//! Parser for fixed-point format patterns.
//!
//! A pattern is `prefix%[flags][width][.precision](f|m)suffix`:
//! - flags: `-` (left-justify), `+` (always show sign), space (space for
//!   positive sign), `0` (zero-pad)
//! - width: minimum width of the integer part including its sign
//! - precision: number of fractional digits; absent means the rule precision
//! - `f` and `m` are equivalent
//!
//! Patterns without a directive are literal text (e.g. `"free"`). A `%` whose
//! width or precision exceeds the limits is not a directive either.

use crate::limits::{MAX_PATTERN_WIDTH, MAX_PRECISION};

/// Padding and sign flags of a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub left: bool,
    pub plus: bool,
    pub space: bool,
    pub zero: bool,
}

/// A parsed `%...m` directive and the literal text around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub prefix: &'a str,
    pub flags: Flags,
    pub width: usize,
    pub precision: Option<u32>,
    pub suffix: &'a str,
}

impl<'a> Directive<'a> {
    /// Finds the first directive in `pattern`, or `None` if it has none.
    pub fn parse(pattern: &'a str) -> Option<Directive<'a>> {
        let bytes = pattern.as_bytes();
        let mut search_from = 0;
        while let Some(offset) = pattern[search_from..].find('%') {
            let start = search_from + offset;
            if let Some((flags, width, precision, end)) = parse_body(bytes, start + 1) {
                return Some(Directive {
                    prefix: &pattern[..start],
                    flags,
                    width,
                    precision,
                    suffix: &pattern[end..],
                });
            }
            search_from = start + 1;
        }
        None
    }

    /// Renders the integer part with sign, width and padding applied.
    pub fn pad_integer(&self, magnitude: u128, negative: bool) -> String {
        let sign = if negative {
            "-"
        } else if self.flags.plus {
            "+"
        } else if self.flags.space {
            " "
        } else {
            ""
        };
        let digits = magnitude.to_string();
        let len = sign.len() + digits.len();
        if len >= self.width {
            return format!("{sign}{digits}");
        }

        let fill = self.width - len;
        if self.flags.left {
            format!("{sign}{digits}{}", " ".repeat(fill))
        } else if self.flags.zero {
            format!("{sign}{}{digits}", "0".repeat(fill))
        } else {
            format!("{}{sign}{digits}", " ".repeat(fill))
        }
    }
}

/// Parses a directive body starting right after a `%`.
///
/// Returns flags, width, precision and the index just past the conversion
/// character.
fn parse_body(bytes: &[u8], mut pos: usize) -> Option<(Flags, usize, Option<u32>, usize)> {
    let mut flags = Flags::default();
    while let Some(&b) = bytes.get(pos) {
        match b {
            b'-' => flags.left = true,
            b'+' => flags.plus = true,
            b' ' => flags.space = true,
            b'0' => flags.zero = true,
            _ => break,
        }
        pos += 1;
    }

    let (width, next) = read_number(bytes, pos)?;
    if width > MAX_PATTERN_WIDTH {
        return None;
    }
    pos = next;

    let mut precision = None;
    if bytes.get(pos) == Some(&b'.') {
        let (digits, next) = read_number(bytes, pos + 1)?;
        let digits = u32::try_from(digits).ok().filter(|d| *d <= MAX_PRECISION)?;
        precision = Some(digits);
        pos = next;
    }

    match bytes.get(pos) {
        Some(b'f' | b'm') => Some((flags, width, precision, pos + 1)),
        _ => None,
    }
}

/// Reads a run of ASCII digits; an empty run reads as 0.
///
/// Returns `None` when the number overflows `usize`.
fn read_number(bytes: &[u8], mut pos: usize) -> Option<(usize, usize)> {
    let mut value = 0usize;
    while let Some(&b) = bytes.get(pos) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.checked_mul(10)?.checked_add(usize::from(b - b'0'))?;
        pos += 1;
    }
    Some((value, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let d = Directive::parse("%m").unwrap();
        assert_eq!(d.prefix, "");
        assert_eq!(d.suffix, "");
        assert_eq!(d.width, 0);
        assert_eq!(d.precision, None);
    }

    #[test]
    fn test_parse_full() {
        let d = Directive::parse("$%07.2m CR").unwrap();
        assert_eq!(d.prefix, "$");
        assert_eq!(d.suffix, " CR");
        assert!(d.flags.zero);
        assert_eq!(d.width, 7);
        assert_eq!(d.precision, Some(2));
    }

    #[test]
    fn test_parse_flags() {
        let d = Directive::parse("%-+8.1f").unwrap();
        assert!(d.flags.left);
        assert!(d.flags.plus);
        assert!(!d.flags.zero);
        assert_eq!(d.width, 8);
        assert_eq!(d.precision, Some(1));
    }

    #[test]
    fn test_parse_skips_non_directives() {
        let d = Directive::parse("100% of %.0m").unwrap();
        assert_eq!(d.prefix, "100% of ");
        assert_eq!(d.precision, Some(0));
    }

    #[test]
    fn test_no_directive() {
        assert!(Directive::parse("free").is_none());
        assert!(Directive::parse("%d").is_none());
        assert!(Directive::parse("%").is_none());
        assert!(Directive::parse("").is_none());
    }

    #[test]
    fn test_oversized_width_is_not_a_directive() {
        assert!(Directive::parse("%99999999999999999999999m").is_none());
        assert!(Directive::parse("%1025m").is_none());
        assert!(Directive::parse("%.19m").is_none());
        assert_eq!(Directive::parse("%1024m").unwrap().width, 1024);

        let d = Directive::parse("%99999999999999999999999m then %3m").unwrap();
        assert_eq!(d.prefix, "%99999999999999999999999m then ");
        assert_eq!(d.width, 3);
    }

    #[test]
    fn test_pad_integer() {
        let zero = Directive::parse("%05m").unwrap();
        assert_eq!(zero.pad_integer(42, false), "00042");
        assert_eq!(zero.pad_integer(42, true), "-0042");

        let spaced = Directive::parse("%5m").unwrap();
        assert_eq!(spaced.pad_integer(42, false), "   42");

        let left = Directive::parse("%-5m").unwrap();
        assert_eq!(left.pad_integer(42, true), "-42  ");

        let plus = Directive::parse("%+m").unwrap();
        assert_eq!(plus.pad_integer(7, false), "+7");
        assert_eq!(plus.pad_integer(123456, false), "+123456");
    }
}
