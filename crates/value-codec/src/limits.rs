//! Numeric bounds enforced by the codecs and definitions.

/// Maximum number of implied decimal digits in a fixed-point value.
///
/// 10^18 is the largest power of ten representable in `i64`.
pub const MAX_PRECISION: u32 = 18;

/// Maximum field width of a fixed-point pattern directive.
pub const MAX_PATTERN_WIDTH: usize = 1024;

/// Maximum step accepted by `define_enum`.
pub const MAX_ENUM_STEP: usize = 1 << 20;

/// Returns 10^precision, or `None` when precision exceeds [`MAX_PRECISION`].
pub fn pow10(precision: u32) -> Option<i64> {
    if precision > MAX_PRECISION {
        return None;
    }
    10i64.checked_pow(precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow10_bounds() {
        assert_eq!(pow10(0), Some(1));
        assert_eq!(pow10(2), Some(100));
        assert_eq!(pow10(18), Some(1_000_000_000_000_000_000));
        assert_eq!(pow10(19), None);
    }
}
