//! Context resolution strategies
//!
//! A strategy owns one context key (e.g. `ID`, `DEPARTMENT`). It turns raw
//! identifiers into display-ready values and decides whether a stored grant
//! value covers the value claimed for a request.
//!
//! # Example
//!
//! ```rust
//! use ctxauth_authz::strategy::{ContextStrategy, IdContextStrategy};
//!
//! let strategy = IdContextStrategy;
//! assert!(strategy.can_handle("id"));
//! assert!(strategy.matches(r#"["1","2","3"]"#, "2"));
//! assert!(!strategy.matches("not a list", "2"));
//! ```

pub mod builtin;
pub mod matcher;
pub mod registry;

pub use builtin::{AttributeContextStrategy, DepartmentContextStrategy, IdContextStrategy};
pub use matcher::ContextMatcher;
pub use registry::StrategyRegistry;

use crate::context::ContextRepository;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Raw context value resolved against the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedContextValue {
    pub context_key: String,
    pub value: String,
    pub label: String,
    /// False when the repository has no record for `value`; `label` is then the raw value
    pub found: bool,
}

/// Per-context-key resolution and matching logic
#[async_trait]
pub trait ContextStrategy: Send + Sync {
    /// The context key this strategy owns
    fn context_key(&self) -> &str;

    /// Whether this strategy handles `key` (case-insensitive by default)
    fn can_handle(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(self.context_key())
    }

    /// Matching rule for stored values of this key
    fn matcher(&self) -> ContextMatcher;

    /// Whether the stored value covers the claimed value. Never panics.
    fn matches(&self, stored: &str, claimed: &str) -> bool {
        self.matcher().matches(stored, claimed)
    }

    /// Whether a stored value is parseable at all
    fn is_well_formed(&self, stored: &str) -> bool {
        self.matcher().is_well_formed(stored)
    }

    /// Turn raw identifiers into display-ready values
    ///
    /// Serialized lists among the raw values are flattened. Output follows
    /// input order without duplicates. Empty input returns an empty list
    /// without a repository call.
    async fn resolve_context_values(
        &self,
        raw: &[String],
        repository: &dyn ContextRepository,
    ) -> Result<Vec<ResolvedContextValue>> {
        resolve_with_repository(self.context_key(), raw, repository).await
    }
}

/// Default resolution: flatten, dedupe, look up labels in the repository
pub async fn resolve_with_repository(
    context_key: &str,
    raw: &[String],
    repository: &dyn ContextRepository,
) -> Result<Vec<ResolvedContextValue>> {
    let ids = flatten_raw(raw);
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let records = repository.find_by_ids(context_key, &ids).await?;
    let labels: HashMap<String, String> = records.into_iter().map(|r| (r.id, r.label)).collect();

    debug!(
        context_key,
        requested = ids.len(),
        found = labels.len(),
        "resolved context values"
    );

    Ok(ids
        .into_iter()
        .map(|value| match labels.get(&value) {
            Some(label) => ResolvedContextValue {
                context_key: context_key.to_string(),
                label: label.clone(),
                value,
                found: true,
            },
            None => ResolvedContextValue {
                context_key: context_key.to_string(),
                label: value.clone(),
                value,
                found: false,
            },
        })
        .collect())
}

fn flatten_raw(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for entry in raw {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }

        let values = if trimmed.starts_with('[') {
            matcher::parse_list(trimmed).unwrap_or_default()
        } else {
            vec![trimmed.to_string()]
        };

        for value in values {
            if seen.insert(value.clone()) {
                ids.push(value);
            }
        }
    }

    ids
}
