//! Bidirectional symbol ↔ value tables.
//!
//! A [`Definition`] holds, for one attribute, the mapping from symbolic names
//! to stored values and its inverse. Symbols keep their definition order (for
//! option lists); values are kept sorted (for range and neighbor queries).
//!
//! ## Conflicts
//!
//! Redefining a symbol with a different value, or giving a value to a second
//! symbol, is a conflict. Each definition has one [`ConflictPolicy`]:
//!
//! - `LastWriteWins` (default): the write is applied and a warning is logged.
//!   When two symbols share a value, `symbol_of` returns the one defined
//!   later in symbol order, while `value_of` still resolves both.
//! - `Reject`: the whole call fails with
//!   [`DefinitionError::ValueConflict`] and the definition is unchanged.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::config::DEFAULT_ENUM_START;
use crate::error::DefinitionError;
use crate::limits::MAX_ENUM_STEP;
use crate::model::value::EnumValue;

/// How a definition treats conflicting writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConflictPolicy {
    /// Apply the write and log a warning.
    #[default]
    LastWriteWins,
    /// Fail with `ValueConflict`.
    Reject,
}

/// Optional annotations attached to a symbol.
///
/// Opaque to lookups; `select_pairs` reads the display-name fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMeta {
    pub name: Option<String>,
    pub title: Option<String>,
    pub option_name: Option<String>,
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub role: Option<String>,
}

impl SymbolMeta {
    /// Returns the display-name override: option name, then title, then name.
    pub fn display_name(&self) -> Option<&str> {
        self.option_name
            .as_deref()
            .or(self.title.as_deref())
            .or(self.name.as_deref())
    }
}

/// One token of an enum sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumToken<V> {
    /// Assign the current counter to this symbol, then advance.
    Symbol(String),
    /// Advance the counter without assigning.
    Skip,
    /// Set the counter to this value without assigning.
    Reset(V),
}

impl<V> EnumToken<V> {
    /// Creates a symbol token.
    pub fn symbol(symbol: impl Into<String>) -> Self {
        EnumToken::Symbol(symbol.into())
    }
}

impl<V> From<&str> for EnumToken<V> {
    fn from(symbol: &str) -> Self {
        EnumToken::Symbol(symbol.to_string())
    }
}

/// Start value and step of an enum sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumOptions<V> {
    pub start: V,
    pub step: usize,
}

impl<V> EnumOptions<V> {
    /// Creates options starting at `start` with step 1.
    pub fn new(start: V) -> Self {
        Self { start, step: 1 }
    }

    /// Sets the step.
    pub fn step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }
}

impl Default for EnumOptions<i64> {
    fn default() -> Self {
        Self::new(DEFAULT_ENUM_START)
    }
}

/// Symbol ↔ value table for one attribute.
#[derive(Debug, Clone)]
pub struct Definition<V = i64> {
    name: String,
    /// Symbols in definition order.
    order: Vec<String>,
    symbols: FxHashMap<String, V>,
    values: BTreeMap<V, String>,
    metadata: FxHashMap<String, SymbolMeta>,
    conflict_policy: ConflictPolicy,
}

impl<V: EnumValue> Definition<V> {
    /// Creates an empty definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: Vec::new(),
            symbols: FxHashMap::default(),
            values: BTreeMap::new(),
            metadata: FxHashMap::default(),
            conflict_policy: ConflictPolicy::default(),
        }
    }

    /// Creates a definition from an initial symbol set.
    pub fn with_pairs<S, I>(name: impl Into<String>, pairs: I) -> Result<Self, DefinitionError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, V)>,
    {
        let mut definition = Self::new(name);
        definition.define(pairs)?;
        Ok(definition)
    }

    /// Sets the conflict policy.
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Returns the attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the conflict policy.
    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.conflict_policy
    }

    /// Returns the number of symbols.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no symbol is defined.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates `(symbol, value)` in definition order.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.order
            .iter()
            .filter_map(|s| self.symbols.get(s).map(|v| (s.as_str(), v)))
    }

    /// Iterates `(value, symbol)` in ascending value order.
    pub fn values(&self) -> impl Iterator<Item = (&V, &str)> + '_ {
        self.values.iter().map(|(v, s)| (v, s.as_str()))
    }

    /// Returns the metadata stored for a symbol.
    pub fn metadata(&self, symbol: &str) -> Option<&SymbolMeta> {
        self.metadata.get(symbol)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Merges symbol → value pairs into the definition.
    ///
    /// Under [`ConflictPolicy::Reject`] the merge is all-or-nothing.
    pub fn define<S, I>(&mut self, pairs: I) -> Result<(), DefinitionError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, V)>,
    {
        match self.conflict_policy {
            ConflictPolicy::LastWriteWins => {
                for (symbol, value) in pairs {
                    self.insert(symbol.into(), value)?;
                }
                self.rebuild_values();
            }
            ConflictPolicy::Reject => {
                let mut staged = self.clone();
                for (symbol, value) in pairs {
                    staged.insert(symbol.into(), value)?;
                    staged.rebuild_values();
                }
                *self = staged;
            }
        }
        Ok(())
    }

    /// Adds one symbol and returns its value.
    ///
    /// Without an explicit value the symbol gets the successor of the
    /// current maximum value, or [`EnumValue::first`] if the definition is
    /// empty.
    pub fn add_symbol(
        &mut self,
        symbol: impl Into<String>,
        value: Option<V>,
    ) -> Result<V, DefinitionError> {
        self.add_symbol_with(symbol, value, SymbolMeta::default())
    }

    /// Adds one symbol with metadata and returns its value.
    pub fn add_symbol_with(
        &mut self,
        symbol: impl Into<String>,
        value: Option<V>,
        meta: SymbolMeta,
    ) -> Result<V, DefinitionError> {
        let symbol = symbol.into();
        let value = value.unwrap_or_else(|| {
            self.values
                .keys()
                .next_back()
                .map_or_else(V::first, V::successor)
        });
        self.define([(symbol.clone(), value.clone())])?;
        if meta != SymbolMeta::default() {
            self.metadata.insert(symbol, meta);
        }
        Ok(value)
    }

    /// Defines symbols from an enum sequence.
    ///
    /// A symbol takes the current counter and advances it by `step`; a
    /// [`EnumToken::Skip`] (or empty symbol) only advances it; a
    /// [`EnumToken::Reset`] sets it.
    ///
    /// ```rust
    /// use value_codec::model::{Definition, EnumOptions, EnumToken};
    ///
    /// let mut status = Definition::<i64>::new("status");
    /// status
    ///     .define_enum(
    ///         [
    ///             EnumToken::from("a"),
    ///             EnumToken::from("b"),
    ///             EnumToken::Skip,
    ///             EnumToken::from("c"),
    ///             EnumToken::Reset(100),
    ///             EnumToken::from("d"),
    ///         ],
    ///         EnumOptions::new(0),
    ///     )
    ///     .unwrap();
    /// assert_eq!(status.value_of("c").unwrap(), &3);
    /// assert_eq!(status.value_of("d").unwrap(), &100);
    /// ```
    pub fn define_enum<I>(&mut self, tokens: I, options: EnumOptions<V>) -> Result<(), DefinitionError>
    where
        I: IntoIterator<Item = EnumToken<V>>,
    {
        if options.step == 0 || options.step > MAX_ENUM_STEP {
            return Err(DefinitionError::InvalidArgument {
                reason: format!("enum step {} out of range [1, {}]", options.step, MAX_ENUM_STEP),
            });
        }

        let mut counter = options.start;
        let mut pairs = Vec::new();
        for token in tokens {
            match token {
                EnumToken::Symbol(symbol) if !symbol.is_empty() => {
                    let next = counter.advance(options.step);
                    pairs.push((symbol, counter));
                    counter = next;
                }
                EnumToken::Symbol(_) | EnumToken::Skip => {
                    counter = counter.advance(options.step);
                }
                EnumToken::Reset(value) => counter = value,
            }
        }

        if pairs.is_empty() {
            return Ok(());
        }
        self.define(pairs)
    }

    fn insert(&mut self, symbol: String, value: V) -> Result<(), DefinitionError> {
        if let Some(existing) = self.symbols.get(&symbol).filter(|v| **v != value) {
            self.conflict(&symbol, format!("{symbol} = {existing:?}"), &value)?;
        }
        if let Some(owner) = self.values.get(&value).filter(|s| **s != symbol) {
            self.conflict(&symbol, format!("{owner} = {value:?}"), &value)?;
        }

        if self.symbols.insert(symbol.clone(), value).is_none() {
            self.order.push(symbol);
        }
        Ok(())
    }

    fn conflict(&self, symbol: &str, existing: String, requested: &V) -> Result<(), DefinitionError> {
        match self.conflict_policy {
            ConflictPolicy::LastWriteWins => {
                warn!(
                    attribute = %self.name,
                    symbol,
                    existing = %existing,
                    requested = ?requested,
                    "definition conflict, last write wins"
                );
                Ok(())
            }
            ConflictPolicy::Reject => Err(DefinitionError::ValueConflict {
                attribute: self.name.clone(),
                symbol: symbol.to_string(),
                existing,
                requested: format!("{requested:?}"),
            }),
        }
    }

    /// Rebuilds the value → symbol map as the inverse of the symbol map.
    fn rebuild_values(&mut self) {
        self.values.clear();
        for symbol in &self.order {
            if let Some(value) = self.symbols.get(symbol) {
                self.values.insert(value.clone(), symbol.clone());
            }
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the value of a symbol, if defined.
    pub fn get_value(&self, symbol: &str) -> Option<&V> {
        self.symbols.get(symbol)
    }

    /// Returns the value of a symbol or a `NotFound` error.
    pub fn value_of(&self, symbol: &str) -> Result<&V, DefinitionError> {
        self.get_value(symbol)
            .ok_or_else(|| DefinitionError::not_found(&self.name, symbol))
    }

    /// Returns the value of a symbol or `default`.
    pub fn value_of_or(&self, symbol: &str, default: V) -> V {
        self.get_value(symbol).cloned().unwrap_or(default)
    }

    /// Returns the value of a symbol or computes one from the symbol.
    pub fn value_of_or_else<F>(&self, symbol: &str, fallback: F) -> V
    where
        F: FnOnce(&str) -> V,
    {
        self.get_value(symbol)
            .cloned()
            .unwrap_or_else(|| fallback(symbol))
    }

    /// Returns the symbol of a value, if defined.
    pub fn get_symbol(&self, value: &V) -> Option<&str> {
        self.values.get(value).map(String::as_str)
    }

    /// Returns the symbol of a value or a `NotFound` error.
    pub fn symbol_of(&self, value: &V) -> Result<&str, DefinitionError> {
        self.get_symbol(value)
            .ok_or_else(|| DefinitionError::not_found(&self.name, value))
    }

    /// Returns the symbol of a value or `default`.
    pub fn symbol_of_or<'a>(&'a self, value: &V, default: &'a str) -> &'a str {
        self.get_symbol(value).unwrap_or(default)
    }

    /// Returns the symbol of a value or computes one from the value.
    pub fn symbol_of_or_else<F>(&self, value: &V, fallback: F) -> String
    where
        F: FnOnce(&V) -> String,
    {
        self.get_symbol(value)
            .map_or_else(|| fallback(value), str::to_string)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Compares `value` with the value of `symbol`.
    pub fn compare(&self, value: &V, symbol: &str) -> Result<Ordering, DefinitionError> {
        Ok(value.cmp(self.value_of(symbol)?))
    }

    /// Returns true if `value_of(low) <= value <= value_of(high)`.
    pub fn value_in_range(&self, value: &V, low: &str, high: &str) -> Result<bool, DefinitionError> {
        let low = self.value_of(low)?;
        let high = self.value_of(high)?;
        Ok(low <= value && value <= high)
    }

    /// Returns true if the symbol of `value` is one of `symbols`.
    pub fn matches_any(&self, value: &V, symbols: &[&str]) -> bool {
        self.get_symbol(value)
            .is_some_and(|symbol| symbols.contains(&symbol))
    }

    /// Returns the smallest defined value strictly greater than `value`.
    pub fn next_value(&self, value: &V) -> Option<&V> {
        self.values
            .range((Bound::Excluded(value), Bound::Unbounded))
            .next()
            .map(|(v, _)| v)
    }

    /// Returns the largest defined value strictly less than `value`.
    pub fn previous_value(&self, value: &V) -> Option<&V> {
        self.values
            .range((Bound::Unbounded, Bound::Excluded(value)))
            .next_back()
            .map(|(v, _)| v)
    }

    /// Returns `(display name, value)` pairs in definition order.
    pub fn select_pairs(&self) -> Vec<(String, V)> {
        self.select_pairs_with(|_, _| None)
    }

    /// Like [`Definition::select_pairs`], asking `resolver` for each display
    /// name first.
    ///
    /// Names not supplied by the resolver come from the symbol metadata
    /// (option name, title, name), then from the capitalized symbol.
    pub fn select_pairs_with<F>(&self, resolver: F) -> Vec<(String, V)>
    where
        F: Fn(&str, Option<&SymbolMeta>) -> Option<String>,
    {
        self.symbols()
            .map(|(symbol, value)| {
                let meta = self.metadata.get(symbol);
                let display = resolver(symbol, meta)
                    .or_else(|| meta.and_then(SymbolMeta::display_name).map(str::to_string))
                    .unwrap_or_else(|| capitalize(symbol));
                (display, value.clone())
            })
            .collect()
    }
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
