//! Symbol/value definitions.
//!
//! This module contains the enumerated-attribute side of the crate:
//! - Value types with a successor (integers, strings)
//! - Definitions (symbol ↔ value tables)
//! - The registry of shared definitions
//! - Bulk loading from tab-separated records
//! - Typed accessors over a stored raw value

pub mod accessor;
pub mod definition;
pub mod loader;
pub mod registry;
pub mod value;

pub use accessor::EnumAttribute;
pub use definition::{ConflictPolicy, Definition, EnumOptions, EnumToken, SymbolMeta};
pub use loader::{load_records, LoadSummary, Record};
pub use registry::{global, reset_global, DefinitionRegistry, SharedDefinition};
pub use value::EnumValue;
