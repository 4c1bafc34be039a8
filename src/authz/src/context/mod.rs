//! Context store, definitions and repository contract
//!
//! # Example
//!
//! ```rust
//! use ctxauth_authz::context::ContextRegistry;
//!
//! let registry = ContextRegistry::new();
//! registry.put("DEPARTMENT", "10");
//! registry.put("DEPARTMENT", "10");
//! assert_eq!(registry.get("DEPARTMENT").len(), 1);
//! ```

pub mod definition;
pub mod registry;
pub mod repository;

pub use definition::{
    ContextDefinition, DefinitionSupplier, EmptyDefinitions, FnDefinitions,
    RepositoryDefinitions, StaticDefinitions,
};
pub use registry::ContextRegistry;
pub use repository::{ContextRecord, ContextRepository, InMemoryContextRepository};
