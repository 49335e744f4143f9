//! Named directory of shared definitions.
//!
//! Call sites that refer to the same attribute name converge on one shared,
//! mutable [`Definition`]. The registry is an explicit context object; a
//! process-wide instance is available through [`global`] for callers that
//! cannot thread one through, with [`reset_global`] for test isolation.
//!
//! Mutations of the name map and of each definition are serialized by
//! read-write locks. Definitions are expected to be populated at start-up
//! and read concurrently afterwards.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::Settings;
use crate::error::DefinitionError;
use crate::model::definition::{Definition, EnumOptions};
use crate::model::value::EnumValue;

/// A definition shared between call sites.
pub type SharedDefinition<V = i64> = Arc<RwLock<Definition<V>>>;

/// Acquires a read guard on a shared definition.
pub fn read<V>(definition: &SharedDefinition<V>) -> Result<RwLockReadGuard<'_, Definition<V>>, DefinitionError>
where
    V: EnumValue,
{
    definition.read().map_err(|poisoned| DefinitionError::LockPoisoned {
        attribute: poisoned.get_ref().name().to_string(),
    })
}

/// Acquires a write guard on a shared definition.
pub fn write<V>(definition: &SharedDefinition<V>) -> Result<RwLockWriteGuard<'_, Definition<V>>, DefinitionError>
where
    V: EnumValue,
{
    definition.write().map_err(|poisoned| DefinitionError::LockPoisoned {
        attribute: poisoned.get_ref().name().to_string(),
    })
}

/// Find-or-create directory of definitions keyed by attribute name.
#[derive(Debug)]
pub struct DefinitionRegistry<V = i64> {
    settings: Settings,
    definitions: RwLock<FxHashMap<String, SharedDefinition<V>>>,
}

impl<V: EnumValue> Default for DefinitionRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: EnumValue> DefinitionRegistry<V> {
    /// Creates an empty registry with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Creates an empty registry whose definitions follow `settings`.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            definitions: RwLock::new(FxHashMap::default()),
        }
    }

    /// Returns the registry settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the shared definition for `name`, creating it if absent.
    ///
    /// `initial_pairs` are merged into the definition when it is created
    /// and ignored when it already exists.
    pub fn find_or_create<S, I>(&self, name: &str, initial_pairs: I) -> Result<SharedDefinition<V>, DefinitionError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, V)>,
    {
        if let Some(existing) = self.get(name)? {
            return Ok(existing);
        }

        let mut definitions = self.lock_write()?;
        // another caller may have created it between the two locks
        if let Some(existing) = definitions.get(name) {
            return Ok(Arc::clone(existing));
        }

        let mut definition =
            Definition::new(name).with_conflict_policy(self.settings.conflict_policy);
        definition.define(initial_pairs)?;
        debug!(name, symbols = definition.len(), "created definition");

        let shared = Arc::new(RwLock::new(definition));
        definitions.insert(name.to_string(), Arc::clone(&shared));
        Ok(shared)
    }

    /// Returns the shared definition for `name`, if registered.
    pub fn get(&self, name: &str) -> Result<Option<SharedDefinition<V>>, DefinitionError> {
        Ok(self.lock_read()?.get(name).map(Arc::clone))
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Result<Vec<String>, DefinitionError> {
        let mut names: Vec<String> = self.lock_read()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Returns the number of registered definitions.
    pub fn len(&self) -> usize {
        self.lock_read().map_or(0, |definitions| definitions.len())
    }

    /// Returns true if no definition is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every definition.
    ///
    /// Handles obtained earlier stay valid but are no longer shared with
    /// later `find_or_create` calls.
    pub fn clear(&self) {
        match self.definitions.write() {
            Ok(mut definitions) => definitions.clear(),
            Err(poisoned) => {
                let mut definitions = poisoned.into_inner();
                definitions.clear();
                self.definitions.clear_poison();
            }
        }
    }

    fn lock_read(&self) -> Result<RwLockReadGuard<'_, FxHashMap<String, SharedDefinition<V>>>, DefinitionError> {
        self.definitions
            .read()
            .map_err(|_| DefinitionError::LockPoisoned {
                attribute: "<registry>".to_string(),
            })
    }

    fn lock_write(&self) -> Result<RwLockWriteGuard<'_, FxHashMap<String, SharedDefinition<V>>>, DefinitionError> {
        self.definitions
            .write()
            .map_err(|_| DefinitionError::LockPoisoned {
                attribute: "<registry>".to_string(),
            })
    }
}

impl DefinitionRegistry<i64> {
    /// Returns enum options starting at the configured `enum_start`.
    pub fn enum_options(&self) -> EnumOptions<i64> {
        EnumOptions::new(self.settings.enum_start)
    }
}

lazy_static! {
    static ref GLOBAL: DefinitionRegistry<i64> = DefinitionRegistry::new();
}

/// Returns the process-wide registry of integer definitions.
pub fn global() -> &'static DefinitionRegistry<i64> {
    &GLOBAL
}

/// Clears the process-wide registry.
pub fn reset_global() {
    GLOBAL.clear();
}
