//! Error types for the authorization engine
//!
//! Only the administrative and bootstrap surfaces return these. Access
//! decisions never fail; see [`crate::engine::DecisionReason`].

use thiserror::Error;

/// Authorization engine errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Permission identifier could not be parsed
    #[error("Invalid permission identifier: {0}")]
    InvalidPermission(String),

    /// Privilege not found in the catalog
    #[error("Privilege not found: {0}")]
    PrivilegeNotFound(String),

    /// Attempted to delete or duplicate a SYSTEM privilege
    #[error("Privilege '{0}' is a system privilege and cannot be modified")]
    SystemPrivilege(String),

    /// Privilege name already taken
    #[error("Privilege already exists: {0}")]
    DuplicatePrivilege(String),

    /// Context repository lookup failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// Permission catalog backend failed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
