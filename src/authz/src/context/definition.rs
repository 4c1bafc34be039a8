//! Context definitions and their suppliers

use super::repository::ContextRepository;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Selectable context value shown to administrators
///
/// Never persisted; produced on demand by a [`DefinitionSupplier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextDefinition {
    pub key: String,
    pub label: String,
}

impl ContextDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Lazily evaluated source of context definitions
///
/// The repository is passed on every call instead of being captured, so a
/// long-lived supplier never holds a stale handle. Results are not cached;
/// each call may hit the repository again.
#[async_trait]
pub trait DefinitionSupplier: Send + Sync {
    async fn supply(&self, repository: &dyn ContextRepository) -> Result<Vec<ContextDefinition>>;
}

/// Supplier producing nothing; installed on a registry miss
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDefinitions;

#[async_trait]
impl DefinitionSupplier for EmptyDefinitions {
    async fn supply(&self, _repository: &dyn ContextRepository) -> Result<Vec<ContextDefinition>> {
        Ok(Vec::new())
    }
}

/// Fixed list of definitions
#[derive(Debug, Clone, Default)]
pub struct StaticDefinitions(pub Vec<ContextDefinition>);

#[async_trait]
impl DefinitionSupplier for StaticDefinitions {
    async fn supply(&self, _repository: &dyn ContextRepository) -> Result<Vec<ContextDefinition>> {
        Ok(self.0.clone())
    }
}

/// Every repository record of a context key, as `(id, label)` definitions
#[derive(Debug, Clone)]
pub struct RepositoryDefinitions {
    context_key: String,
}

impl RepositoryDefinitions {
    pub fn new(context_key: impl Into<String>) -> Self {
        Self {
            context_key: context_key.into(),
        }
    }
}

#[async_trait]
impl DefinitionSupplier for RepositoryDefinitions {
    async fn supply(&self, repository: &dyn ContextRepository) -> Result<Vec<ContextDefinition>> {
        let records = repository.list(&self.context_key).await?;
        Ok(records
            .into_iter()
            .map(|r| ContextDefinition::new(r.id, r.label))
            .collect())
    }
}

/// Adapts a zero-argument closure
pub struct FnDefinitions<F>(pub F);

#[async_trait]
impl<F> DefinitionSupplier for FnDefinitions<F>
where
    F: Fn() -> Vec<ContextDefinition> + Send + Sync,
{
    async fn supply(&self, _repository: &dyn ContextRepository) -> Result<Vec<ContextDefinition>> {
        Ok((self.0)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::repository::{ContextRecord, InMemoryContextRepository};

    #[tokio::test]
    async fn test_repository_definitions() {
        let repo = InMemoryContextRepository::new();
        repo.insert("DEPARTMENT", ContextRecord::new("10", "Sales")).await;

        let defs = RepositoryDefinitions::new("DEPARTMENT")
            .supply(&repo)
            .await
            .unwrap();
        assert_eq!(defs, vec![ContextDefinition::new("10", "Sales")]);
    }

    #[tokio::test]
    async fn test_fn_definitions_rerun_each_call() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let supplier = FnDefinitions(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![ContextDefinition::new("DEPARTMENT", "Department")]
        });

        let repo = InMemoryContextRepository::new();
        supplier.supply(&repo).await.unwrap();
        supplier.supply(&repo).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
