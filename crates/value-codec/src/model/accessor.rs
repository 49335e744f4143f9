//! Typed accessor for one enumerated attribute value.
//!
//! An [`EnumAttribute`] pairs a stored raw value with the shared definition
//! that interprets it, so a record field can be read and written by symbol.
//!
//! ```rust
//! use value_codec::model::{DefinitionRegistry, EnumAttribute};
//!
//! let registry = DefinitionRegistry::<i64>::new();
//! let status = registry
//!     .find_or_create("status", [("draft", 1), ("active", 2), ("archived", 3)])
//!     .unwrap();
//!
//! let mut field = EnumAttribute::new(status, Some(1));
//! assert_eq!(field.symbol().unwrap().as_deref(), Some("draft"));
//! field.set_symbol("active").unwrap();
//! assert_eq!(field.raw(), Some(&2));
//! assert!(field.in_range("draft", "active").unwrap());
//! ```

use std::cmp::Ordering;

use crate::error::DefinitionError;
use crate::model::registry::{read, SharedDefinition};
use crate::model::value::EnumValue;

/// A raw attribute value read and written through a shared definition.
#[derive(Debug, Clone)]
pub struct EnumAttribute<V = i64> {
    definition: SharedDefinition<V>,
    raw: Option<V>,
}

impl<V: EnumValue> EnumAttribute<V> {
    /// Wraps a raw value.
    pub fn new(definition: SharedDefinition<V>, raw: Option<V>) -> Self {
        Self { definition, raw }
    }

    /// Returns the shared definition.
    pub fn definition(&self) -> &SharedDefinition<V> {
        &self.definition
    }

    /// Returns the stored raw value.
    pub fn raw(&self) -> Option<&V> {
        self.raw.as_ref()
    }

    /// Replaces the stored raw value without validation.
    pub fn set_raw(&mut self, raw: Option<V>) {
        self.raw = raw;
    }

    /// Returns the symbol of the stored value.
    ///
    /// `Ok(None)` when no value is stored or the value has no symbol.
    pub fn symbol(&self) -> Result<Option<String>, DefinitionError> {
        let Some(raw) = &self.raw else {
            return Ok(None);
        };
        Ok(read(&self.definition)?.get_symbol(raw).map(str::to_string))
    }

    /// Stores the value of `symbol`, failing if the symbol is undefined.
    pub fn set_symbol(&mut self, symbol: &str) -> Result<(), DefinitionError> {
        let value = read(&self.definition)?.value_of(symbol)?.clone();
        self.raw = Some(value);
        Ok(())
    }

    /// Clears the stored value.
    pub fn clear(&mut self) {
        self.raw = None;
    }

    /// Returns true if the stored value is the value of `symbol`.
    pub fn is(&self, symbol: &str) -> Result<bool, DefinitionError> {
        Ok(self.compare_to(symbol)? == Some(Ordering::Equal))
    }

    /// Returns true if the stored value's symbol is one of `symbols`.
    pub fn is_any(&self, symbols: &[&str]) -> Result<bool, DefinitionError> {
        let Some(raw) = &self.raw else {
            return Ok(false);
        };
        Ok(read(&self.definition)?.matches_any(raw, symbols))
    }

    /// Returns true if the stored value lies between the values of `low`
    /// and `high`, inclusive.
    pub fn in_range(&self, low: &str, high: &str) -> Result<bool, DefinitionError> {
        let definition = read(&self.definition)?;
        match &self.raw {
            Some(raw) => definition.value_in_range(raw, low, high),
            None => {
                definition.value_of(low)?;
                definition.value_of(high)?;
                Ok(false)
            }
        }
    }

    /// Compares the stored value with the value of `symbol`.
    ///
    /// `Ok(None)` when no value is stored.
    pub fn compare_to(&self, symbol: &str) -> Result<Option<Ordering>, DefinitionError> {
        let definition = read(&self.definition)?;
        let target = definition.value_of(symbol)?;
        Ok(self.raw.as_ref().map(|raw| raw.cmp(target)))
    }

    /// Moves the stored value to the next defined value, if any.
    pub fn advance(&mut self) -> Result<bool, DefinitionError> {
        let next = {
            let definition = read(&self.definition)?;
            match &self.raw {
                Some(raw) => definition.next_value(raw).cloned(),
                None => definition.values().next().map(|(v, _)| v.clone()),
            }
        };
        match next {
            Some(value) => {
                self.raw = Some(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
