//! Value types usable in definitions.
//!
//! Definitions map symbols to totally ordered values that know their own
//! successor. Integers are the common case; strings advance like odometers
//! (`"az"` → `"ba"`) and are supported for alphabetic sequences.

use std::fmt::Debug;

/// A totally ordered value with a successor.
pub trait EnumValue: Ord + Clone + Debug {
    /// Returns the next value in sequence.
    fn successor(&self) -> Self;

    /// Returns the value assigned to the first symbol added to an empty
    /// definition without an explicit value.
    fn first() -> Self;

    /// Applies [`EnumValue::successor`] `step` times.
    fn advance(&self, step: usize) -> Self {
        let mut value = self.clone();
        for _ in 0..step {
            value = value.successor();
        }
        value
    }
}

macro_rules! impl_enum_value_for_int {
    ($($t:ty),*) => {
        $(
            impl EnumValue for $t {
                #[inline]
                fn successor(&self) -> Self {
                    self.saturating_add(1)
                }

                #[inline]
                fn first() -> Self {
                    1
                }

                fn advance(&self, step: usize) -> Self {
                    <$t>::try_from(step).map_or(<$t>::MAX, |step| self.saturating_add(step))
                }
            }
        )*
    };
}

impl_enum_value_for_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl EnumValue for String {
    fn successor(&self) -> Self {
        string_successor(self)
    }

    fn first() -> Self {
        "a".to_string()
    }
}

/// Advances the rightmost alphanumeric character, carrying leftwards.
///
/// `"az"` → `"ba"`, `"zz"` → `"aaa"`, `"a9"` → `"b0"`, `"1.9"` → `"2.0"`.
/// Strings without alphanumerics advance their last character.
fn string_successor(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return String::from("a");
    }

    let alnum: Vec<usize> = (0..chars.len())
        .filter(|&i| chars[i].is_ascii_alphanumeric())
        .collect();

    let Some(&leftmost) = alnum.first() else {
        let last = chars.len() - 1;
        chars[last] = char::from_u32(chars[last] as u32 + 1).unwrap_or(chars[last]);
        return chars.into_iter().collect();
    };

    for &i in alnum.iter().rev() {
        let (next, carried) = match chars[i] {
            '9' => ('0', true),
            'z' => ('a', true),
            'Z' => ('A', true),
            c => (char::from(c as u8 + 1), false),
        };
        chars[i] = next;
        if !carried {
            return chars.into_iter().collect();
        }
    }

    let carry = match chars[leftmost] {
        '0' => '1',
        'a' => 'a',
        _ => 'A',
    };
    chars.insert(leftmost, carry);
    chars.into_iter().collect()
}
