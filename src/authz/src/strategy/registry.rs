//! Strategy registry, indexed by context key

use super::builtin::{DepartmentContextStrategy, IdContextStrategy};
use super::ContextStrategy;
use crate::types::normalize_key;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable index of strategies by upper-cased context key
///
/// Built once at startup and shared through `Arc`.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn ContextStrategy>>,
}

impl StrategyRegistry {
    /// Build from every available strategy
    ///
    /// When two strategies declare the same key the later one wins and a
    /// warning is logged.
    pub fn new<I>(strategies: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ContextStrategy>>,
    {
        let mut index: HashMap<String, Arc<dyn ContextStrategy>> = HashMap::new();

        for strategy in strategies {
            let key = normalize_key(strategy.context_key());
            if index.insert(key.clone(), strategy).is_some() {
                warn!(context_key = %key, "duplicate context strategy registered, last one wins");
            }
        }

        debug!(count = index.len(), "context strategy registry built");

        Self { strategies: index }
    }

    /// Registry with the built-in `ID` and `DEPARTMENT` strategies
    pub fn with_defaults() -> Self {
        Self::new(Self::default_strategies())
    }

    /// Built-in strategies, for callers adding their own
    pub fn default_strategies() -> Vec<Arc<dyn ContextStrategy>> {
        vec![
            Arc::new(IdContextStrategy) as Arc<dyn ContextStrategy>,
            Arc::new(DepartmentContextStrategy),
        ]
    }

    /// Strategy for `key`; logs a warning and returns `None` on miss
    pub fn get_strategy(&self, key: &str) -> Option<Arc<dyn ContextStrategy>> {
        let found = self.strategies.get(&normalize_key(key)).cloned();
        if found.is_none() {
            warn!(context_key = key, "no context strategy registered");
        }
        found
    }

    pub fn has_strategy(&self, key: &str) -> bool {
        self.strategies.contains_key(&normalize_key(key))
    }

    /// Copy of the index
    pub fn get_all_strategies(&self) -> HashMap<String, Arc<dyn ContextStrategy>> {
        self.strategies.clone()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
