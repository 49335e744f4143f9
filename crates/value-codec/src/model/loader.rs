//! Bulk loading of definitions from tab-separated records.
//!
//! Each line is one record:
//!
//! ```text
//! attribute <TAB> value <TAB> role <TAB> symbol <TAB> short_name <TAB> description
//! ```
//!
//! Records with fewer than six fields, an empty symbol or description, or a
//! value that does not parse are skipped. Under
//! [`ConflictPolicy::Reject`](crate::model::ConflictPolicy::Reject) a record
//! that conflicts with an earlier one is skipped too, and loading continues.

use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::DefinitionError;
use crate::model::definition::SymbolMeta;
use crate::model::registry::{write, DefinitionRegistry};
use crate::model::value::EnumValue;

const FIELD_COUNT: usize = 6;

/// One parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<V> {
    pub attribute: String,
    pub value: V,
    pub symbol: String,
    pub meta: SymbolMeta,
}

impl<V: FromStr> Record<V> {
    /// Parses one tab-separated line, or returns `None` if it is incomplete.
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() < FIELD_COUNT {
            return None;
        }
        let [attribute, value, role, symbol, short_name, description] = [
            fields[0], fields[1], fields[2], fields[3], fields[4], fields[5],
        ];
        if attribute.is_empty() || symbol.is_empty() || description.is_empty() {
            return None;
        }
        let value = value.parse().ok()?;

        Some(Self {
            attribute: attribute.to_string(),
            value,
            symbol: symbol.to_string(),
            meta: SymbolMeta {
                short_name: non_empty(short_name),
                description: Some(description.to_string()),
                role: non_empty(role),
                ..SymbolMeta::default()
            },
        })
    }
}

fn non_empty(field: &str) -> Option<String> {
    (!field.is_empty()).then(|| field.to_string())
}

/// Counts of loaded and skipped records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Folds every valid record of `text` into the registry.
///
/// Blank lines and lines starting with `#` are ignored without counting as
/// skipped. Only lock poisoning aborts the load.
pub fn load_records<V>(registry: &DefinitionRegistry<V>, text: &str) -> Result<LoadSummary, DefinitionError>
where
    V: EnumValue + FromStr,
{
    let mut summary = LoadSummary::default();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(record) = Record::<V>::parse(line) else {
            debug!(line = index + 1, "skipping malformed definition record");
            summary.skipped += 1;
            continue;
        };

        let shared = registry.find_or_create(&record.attribute, std::iter::empty::<(String, V)>())?;
        match write(&shared)?.add_symbol_with(record.symbol, Some(record.value), record.meta) {
            Ok(_) => summary.loaded += 1,
            Err(err @ DefinitionError::ValueConflict { .. }) => {
                warn!(line = index + 1, error = %err, "skipping conflicting definition record");
                summary.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(summary)
}
