//! Functionality registration at bootstrap
//!
//! Each feature module registers its functionality once at startup. The
//! registrar makes sure a SYSTEM privilege exists for it and wires its
//! context keys and definition supplier into the context registry.

use crate::catalog::PermissionCatalog;
use crate::context::{ContextRegistry, DefinitionSupplier};
use crate::error::{AuthzError, Result};
use crate::model::Privilege;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Functionality descriptor
#[derive(Clone)]
pub struct Functionality {
    pub name: String,

    /// Context keys the functionality's grants may be restricted by
    pub context_keys: BTreeSet<String>,

    /// Source of selectable context values for administrators
    pub definitions: Option<Arc<dyn DefinitionSupplier>>,
}

impl Functionality {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context_keys: BTreeSet::new(),
            definitions: None,
        }
    }

    pub fn with_context_key(mut self, key: impl Into<String>) -> Self {
        self.context_keys.insert(key.into());
        self
    }

    pub fn with_definitions(mut self, supplier: Arc<dyn DefinitionSupplier>) -> Self {
        self.definitions = Some(supplier);
        self
    }
}

/// Result of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Privilege created
    Created,
    /// Existing privilege gained context keys
    Updated,
    /// Nothing to do
    AlreadyRegistered,
}

/// Idempotent upsert of functionality privileges
pub struct FunctionalityRegistrar {
    catalog: Arc<dyn PermissionCatalog>,
    contexts: Arc<ContextRegistry>,
}

impl FunctionalityRegistrar {
    pub fn new(catalog: Arc<dyn PermissionCatalog>, contexts: Arc<ContextRegistry>) -> Self {
        Self { catalog, contexts }
    }

    /// Make sure a privilege exists for `name`
    pub async fn register_functionality(&self, name: &str) -> Result<RegistrationOutcome> {
        self.register(Functionality::new(name)).await
    }

    /// Register a functionality with its context keys and definitions
    pub async fn register(&self, functionality: Functionality) -> Result<RegistrationOutcome> {
        let name = functionality.name.trim();
        if name.is_empty() {
            return Err(AuthzError::InvalidInput(
                "Functionality name cannot be empty".to_string(),
            ));
        }

        let outcome = match self.catalog.find_privilege(name).await? {
            None => {
                let mut privilege = Privilege::system(name);
                privilege.values = functionality.context_keys.clone();
                self.catalog.save_privilege(privilege).await?;
                RegistrationOutcome::Created
            }
            Some(mut existing) => {
                if functionality.context_keys.is_subset(&existing.values) {
                    RegistrationOutcome::AlreadyRegistered
                } else {
                    existing.values.extend(functionality.context_keys.iter().cloned());
                    self.catalog.save_privilege(existing).await?;
                    RegistrationOutcome::Updated
                }
            }
        };

        // Context registry is updated only after the catalog write
        for key in &functionality.context_keys {
            self.contexts.put(name, key.clone());
        }
        if let Some(supplier) = functionality.definitions.clone() {
            self.contexts.put_definition(name, supplier);
        }

        match outcome {
            RegistrationOutcome::AlreadyRegistered => {
                debug!(functionality = name, "functionality already registered")
            }
            _ => info!(functionality = name, outcome = ?outcome, "functionality registered"),
        }

        Ok(outcome)
    }

    /// Register several functionalities, stopping at the first error
    pub async fn register_all<I>(&self, functionalities: I) -> Result<Vec<RegistrationOutcome>>
    where
        I: IntoIterator<Item = Functionality>,
    {
        let mut outcomes = Vec::new();
        for functionality in functionalities {
            outcomes.push(self.register(functionality).await?);
        }
        Ok(outcomes)
    }
}
