//! Name → plugin lookup table.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::ConstraintValidator;
use crate::constraints::{self, All, Any, Valid};

/// Plugins keyed by the constraint name they implement.
///
/// [`ConstraintRegistry::new`] pre-registers the structural constraints
/// (`Valid`, `All`, `Any`); registering a name again replaces the plugin.
#[derive(Clone)]
pub struct ConstraintRegistry {
    validators: IndexMap<String, Arc<dyn ConstraintValidator>>,
}

impl ConstraintRegistry {
    /// Registry holding the structural constraints.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(constraints::VALID, Valid);
        registry.register(constraints::ALL, All);
        registry.register(constraints::ANY, Any);
        registry
    }

    /// Registry without any plugin.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            validators: IndexMap::new(),
        }
    }

    /// Registers (or replaces) the plugin for `name`.
    pub fn register<V>(&mut self, name: impl Into<String>, validator: V)
    where
        V: ConstraintValidator + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    /// Registers an already shared plugin.
    pub fn register_shared(&mut self, name: impl Into<String>, validator: Arc<dyn ConstraintValidator>) {
        self.validators.insert(name.into(), validator);
    }

    /// Plugin registered for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ConstraintValidator>> {
        self.validators.get(name)
    }

    /// Returns `true` if a plugin is registered for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered constraint names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }
}

impl Default for ConstraintRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConstraintRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintRegistry")
            .field("constraints", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
