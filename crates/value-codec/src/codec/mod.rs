//! String conversions for byte quantities and fixed-point decimals.
//!
//! All functions here are pure: they read only their arguments and the
//! immutable unit tables, so they can be called from any thread.

pub mod bytes;
pub mod fixed_point;
pub mod pattern;
pub mod units;

pub use bytes::{format_bytes, format_bytes_in, parse_bytes, parse_bytes_pair, ByteOptions};
pub use fixed_point::{
    fixed_point_to_integer, float_to_integer, format_fixed_point, integer_to_fixed_point,
    integer_to_float, FixedPointRule,
};
pub use pattern::Directive;
pub use units::{canonical_unit, select_table, KbPolicy, UnitEntry, UnitTable};
