//! Process defaults for definitions and codecs.
//!
//! [`Settings`] bundles the values that callers would otherwise have to pass
//! on every call. A [`DefinitionRegistry`](crate::model::DefinitionRegistry)
//! carries one `Settings` and hands it to every definition it creates.

use crate::codec::units::KbPolicy;
use crate::model::definition::ConflictPolicy;

/// Value assigned to the first symbol of `define_enum` when no start is given.
pub const DEFAULT_ENUM_START: i64 = 0;

/// Fractional digits shown by `format_bytes`.
pub const DEFAULT_BYTE_PRECISION: usize = 1;

/// Fractional digits kept by `parse_bytes` before truncating to whole bytes.
pub const DEFAULT_BYTE_PARSE_DIGITS: u32 = 2;

/// Implied decimal digits of a fixed-point value.
pub const DEFAULT_PRECISION: u32 = 2;

/// Process defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Start counter for `define_enum`.
    pub enum_start: i64,
    /// Unit table used when a caller does not name one.
    pub kb_policy: KbPolicy,
    /// Fractional digits shown by `format_bytes`.
    pub byte_precision: usize,
    /// Implied decimal digits for fixed-point rules.
    pub fixed_point_precision: u32,
    /// How definitions treat a symbol or value being redefined.
    pub conflict_policy: ConflictPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enum_start: DEFAULT_ENUM_START,
            kb_policy: KbPolicy::Combined,
            byte_precision: DEFAULT_BYTE_PRECISION,
            fixed_point_precision: DEFAULT_PRECISION,
            conflict_policy: ConflictPolicy::LastWriteWins,
        }
    }
}

impl Settings {
    /// Creates the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `define_enum` start counter.
    pub fn enum_start(mut self, start: i64) -> Self {
        self.enum_start = start;
        self
    }

    /// Sets the default byte unit policy.
    pub fn kb_policy(mut self, policy: KbPolicy) -> Self {
        self.kb_policy = policy;
        self
    }

    /// Sets the fractional digits shown by `format_bytes`.
    pub fn byte_precision(mut self, precision: usize) -> Self {
        self.byte_precision = precision;
        self
    }

    /// Sets the default fixed-point precision.
    pub fn fixed_point_precision(mut self, precision: u32) -> Self {
        self.fixed_point_precision = precision;
        self
    }

    /// Sets the conflict policy for definitions.
    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.enum_start, 0);
        assert_eq!(settings.kb_policy, KbPolicy::Combined);
        assert_eq!(settings.byte_precision, 1);
        assert_eq!(settings.fixed_point_precision, 2);
        assert_eq!(settings.conflict_policy, ConflictPolicy::LastWriteWins);
    }

    #[test]
    fn test_chained_setters() {
        let settings = Settings::new()
            .enum_start(1)
            .kb_policy(KbPolicy::Decimal)
            .conflict_policy(ConflictPolicy::Reject);
        assert_eq!(settings.enum_start, 1);
        assert_eq!(settings.kb_policy, KbPolicy::Decimal);
        assert_eq!(settings.conflict_policy, ConflictPolicy::Reject);
    }
}
