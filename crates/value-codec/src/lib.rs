//! Value codecs: symbol/value definitions, byte quantities and fixed-point
//! decimals.
//!
//! This crate converts between stored values and their human-facing forms.
//!
//! # Overview
//!
//! - **Definitions**: ordered, bidirectional tables between symbolic names
//!   and stored values for enumerated attributes, with range and neighbor
//!   queries
//! - **Byte quantities**: `12345` ⇄ `"12 KiB"` with decimal, JEDEC, IEC or
//!   combined unit tables
//! - **Fixed-point decimals**: `12345` ⇄ `"123.45"` with configurable
//!   separators, delimiters, sign patterns and unit prefixes
//!
//! # Quick Start
//!
//! ```rust
//! use value_codec::codec::{format_bytes, integer_to_fixed_point, ByteOptions, FixedPointRule};
//! use value_codec::model::{DefinitionRegistry, EnumOptions, EnumToken};
//!
//! let registry = DefinitionRegistry::<i64>::new();
//! let status = registry.find_or_create("status", std::iter::empty::<(String, i64)>()).unwrap();
//! status
//!     .write()
//!     .unwrap()
//!     .define_enum(
//!         [EnumToken::from("draft"), EnumToken::from("active")],
//!         EnumOptions::new(1),
//!     )
//!     .unwrap();
//! assert_eq!(status.read().unwrap().symbol_of(&2).unwrap(), "active");
//!
//! assert_eq!(format_bytes(12345, &ByteOptions::default()), "12 KiB");
//!
//! let rule = FixedPointRule::default().delimiter(",").unit("$");
//! assert_eq!(integer_to_fixed_point(Some(123456789), &rule), "$1,234,567.89");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Definitions, registry, bulk loading, typed accessors
//! - [`codec`]: Byte and fixed-point string conversions
//! - [`config`]: Process defaults
//! - [`error`]: Error types
//! - [`limits`]: Numeric bounds
//!
//! # Errors
//!
//! Strict lookups fail with [`DefinitionError::NotFound`]. Parsing is
//! permissive: unparseable byte quantities yield 0 and unparseable
//! fixed-point text yields the rule's blank value. Library misuse, such as
//! a precision beyond [`limits::MAX_PRECISION`], is rejected with
//! [`CodecError`].

pub mod codec;
pub mod config;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{
    fixed_point_to_integer, float_to_integer, format_bytes, format_bytes_in, format_fixed_point,
    integer_to_fixed_point, integer_to_float, parse_bytes, parse_bytes_pair, select_table,
    ByteOptions, FixedPointRule, KbPolicy, UnitTable,
};
pub use config::Settings;
pub use error::{CodecError, DefinitionError, ErrorCode};
pub use model::{
    ConflictPolicy, Definition, DefinitionRegistry, EnumAttribute, EnumOptions, EnumToken,
    EnumValue, SharedDefinition, SymbolMeta,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
