//! Process-wide context store
//!
//! Holds assigned raw context values and definition suppliers keyed by
//! context or functionality name. Constructed once by the application and
//! shared through `Arc`.

use super::definition::{ContextDefinition, DefinitionSupplier, EmptyDefinitions};
use super::repository::ContextRepository;
use crate::error::Result;
use dashmap::{DashMap, DashSet};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

/// Concurrent store of context values and definition suppliers
///
/// Accessors create missing entries (empty set, empty supplier) so callers
/// never see a miss. Use [`ContextRegistry::contains`] and
/// [`ContextRegistry::has_definition`] to test for existence without
/// creating anything.
///
/// # Thread Safety
///
/// Backed by `DashMap`/`DashSet`; no external locking is needed. Suppliers
/// are cloned out of the map before they run, so repository I/O never
/// happens under a shard lock.
pub struct ContextRegistry {
    /// Assigned raw values per name
    values: DashMap<String, Arc<DashSet<String>>>,

    /// Definition suppliers per name
    definitions: DashMap<String, Arc<dyn DefinitionSupplier>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
            definitions: DashMap::new(),
        }
    }

    fn value_set(&self, name: &str) -> Arc<DashSet<String>> {
        if let Some(set) = self.values.get(name) {
            return Arc::clone(set.value());
        }

        let set = self
            .values
            .entry(name.to_string())
            .or_insert_with(|| {
                trace!(name, "creating context value set");
                Arc::new(DashSet::new())
            });
        Arc::clone(set.value())
    }

    /// Add a value to the set for `name`, creating the set if absent
    pub fn put(&self, name: &str, value: impl Into<String>) {
        let set = self.value_set(name);
        set.insert(value.into());
    }

    /// Snapshot of the set for `name`; creates an empty set on miss
    pub fn get(&self, name: &str) -> HashSet<String> {
        self.value_set(name).iter().map(|v| v.key().clone()).collect()
    }

    /// Remove the entry for `name`
    pub fn delete(&self, name: &str) {
        self.values.remove(name);
    }

    /// Whether a value set exists for `name`, without creating one
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Register or overwrite the definition supplier for `name`
    ///
    /// The supplier is not evaluated here.
    pub fn put_definition(&self, name: &str, supplier: Arc<dyn DefinitionSupplier>) {
        self.definitions.insert(name.to_string(), supplier);
    }

    /// Supplier registered for `name`, or the empty supplier
    ///
    /// On a miss the empty supplier is registered under `name`.
    pub fn get_definition(&self, name: &str) -> Arc<dyn DefinitionSupplier> {
        if let Some(supplier) = self.definitions.get(name) {
            return Arc::clone(supplier.value());
        }

        let supplier = self
            .definitions
            .entry(name.to_string())
            .or_insert_with(|| {
                trace!(name, "registering empty definition supplier");
                Arc::new(EmptyDefinitions)
            });
        Arc::clone(supplier.value())
    }

    /// Remove the supplier for `name`
    pub fn delete_definition(&self, name: &str) {
        self.definitions.remove(name);
    }

    /// Whether a supplier exists for `name`, without creating one
    pub fn has_definition(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Run the supplier for `name` against `repository`
    ///
    /// The supplier handle is cloned first; the map is not locked while it runs.
    pub async fn definitions(
        &self,
        name: &str,
        repository: &dyn ContextRepository,
    ) -> Result<Vec<ContextDefinition>> {
        let supplier = self.get_definition(name);
        supplier.supply(repository).await
    }

    /// Number of value sets
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}
