//! Repository lookup contract for context values

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Record returned by a repository lookup: identifier plus display label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextRecord {
    pub id: String,
    pub label: String,
}

impl ContextRecord {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Read access to the records behind a context key
///
/// Implemented by the host application's persistence layer. Implementations
/// doing network or database I/O own their timeout policy.
#[async_trait]
pub trait ContextRepository: Send + Sync {
    /// Records whose id is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, context_key: &str, ids: &[String]) -> Result<Vec<ContextRecord>>;

    /// Every record of a context key
    async fn list(&self, context_key: &str) -> Result<Vec<ContextRecord>>;
}

/// In-memory repository, keyed by upper-cased context key
pub struct InMemoryContextRepository {
    records: Arc<RwLock<HashMap<String, Vec<ContextRecord>>>>,
}

impl InMemoryContextRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add or replace a record
    pub async fn insert(&self, context_key: &str, record: ContextRecord) {
        let mut records = self.records.write().await;
        let bucket = records.entry(context_key.to_ascii_uppercase()).or_default();
        bucket.retain(|r| r.id != record.id);
        bucket.push(record);
    }
}

impl Default for InMemoryContextRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextRepository for InMemoryContextRepository {
    async fn find_by_ids(&self, context_key: &str, ids: &[String]) -> Result<Vec<ContextRecord>> {
        let records = self.records.read().await;
        let Some(bucket) = records.get(&context_key.to_ascii_uppercase()) else {
            return Ok(Vec::new());
        };

        Ok(bucket
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn list(&self, context_key: &str) -> Result<Vec<ContextRecord>> {
        let records = self.records.read().await;
        Ok(records
            .get(&context_key.to_ascii_uppercase())
            .cloned()
            .unwrap_or_default())
    }
}
