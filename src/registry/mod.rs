//! Capability registry
//!
//! A name-keyed table of UI capability providers, populated once at startup
//! and read by name afterwards.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

pub mod icons;

pub use icons::Icon;

/// Registry of named capability implementations.
///
/// Registering a name twice replaces the earlier entry.
pub struct CapabilityRegistry<C> {
    entries: DashMap<String, Arc<C>>,
}

impl<C> CapabilityRegistry<C> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register `implementation` under `name`, returning the entry it
    /// replaced, if any.
    pub fn register(&self, name: impl Into<String>, implementation: C) -> Option<Arc<C>> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), Arc::new(implementation));
        if previous.is_some() {
            debug!("Capability '{}' re-registered, previous entry replaced", name);
        }
        previous
    }

    /// Register every entry of `capabilities` in iteration order. Returns the
    /// number of entries processed.
    pub fn register_all<N, I>(&self, capabilities: I) -> usize
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, C)>,
    {
        let mut count = 0;
        for (name, implementation) in capabilities {
            self.register(name, implementation);
            count += 1;
        }
        count
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<C>> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C> Default for CapabilityRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
