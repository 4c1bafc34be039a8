//! # ctxauth Authorization Engine
//!
//! Contextual, attribute-aware authorization decisions for enterprise
//! applications.
//!
//! ## Features
//!
//! - **CRUD permissions** per registered functionality (`READ.invoice`)
//! - **Context restrictions** on grants (department, record identity, any
//!   business dimension) evaluated through pluggable strategies
//! - **Fail-closed** decisions: unknown keys, malformed values and missing
//!   principals all deny
//! - **Concurrent context registry** backed by `DashMap`
//! - **Structured audit events** for every decision via `tracing`
//!
//! ## Example
//!
//! ```rust
//! use ctxauth_authz::{
//!     AccessTarget, AuthzEngine, Principal, StaticPrincipalProvider,
//!     model::{PrivilegeOperation, PrivilegeOperationContext, Role, User},
//!     Operation,
//! };
//! use std::sync::Arc;
//!
//! let clerk = Role::new("clerk").grant(
//!     "invoice",
//!     [PrivilegeOperation::new(Operation::Read)
//!         .with_context(PrivilegeOperationContext::new("DEPARTMENT", ["10", "20"]))],
//! );
//! let user = User::new("alice", "Alice").with_role(clerk);
//! let principal = Principal::from_user(&user).unwrap();
//!
//! let engine = AuthzEngine::with_defaults(Arc::new(StaticPrincipalProvider::new(principal)));
//!
//! let own = AccessTarget::new().with_attribute("DEPARTMENT", "10");
//! let other = AccessTarget::new().with_attribute("DEPARTMENT", "30");
//! assert!(engine.can_read("invoice", Some(&own)));
//! assert!(!engine.can_read("invoice", Some(&other)));
//! assert!(!engine.can_delete("invoice", None));
//! ```

pub mod admin;
pub mod catalog;
pub mod context;
pub mod engine;
pub mod error;
pub mod model;
pub mod principal;
pub mod registrar;
pub mod strategy;
pub mod types;

// Re-export commonly used types
pub use types::{AccessTarget, ContextKey, FunctionalityName, Operation, Permission};
pub use engine::{AccessDecision, AuthzEngine, DecisionReason, EngineConfig, OverrideFlags};
pub use context::{ContextDefinition, ContextRegistry, ContextRepository};
pub use strategy::{ContextMatcher, ContextStrategy, StrategyRegistry};
pub use principal::{Principal, PrincipalProvider, StaticPrincipalProvider};
pub use registrar::{Functionality, FunctionalityRegistrar, RegistrationOutcome};
pub use catalog::{InMemoryCatalog, PermissionCatalog};
pub use admin::PrivilegeAdmin;
pub use error::{AuthzError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
