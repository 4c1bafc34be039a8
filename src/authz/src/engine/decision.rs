//! Access decision types

use crate::model::GrantSource;
use crate::types::Permission;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why a decision came out the way it did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionReason {
    /// Administrative override flag
    Override,

    /// Permission held, no context check applied
    Granted,

    /// Permission held and a context-restricted grant matched
    ContextMatched { source: GrantSource },

    /// No authenticated principal
    MissingPrincipal,

    /// Permission identifier absent from the principal's set
    PermissionNotGranted,

    /// Grant references a context key with no strategy
    UnknownContextKey { context_key: String },

    /// No stored value for the key could be parsed
    MalformedContextValue { context_key: String },

    /// Stored values do not cover the claimed value
    ContextMismatch { context_key: String, claimed: String },

    /// Neither target nor principal carry a value for the key
    MissingClaim { context_key: String },
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => write!(f, "administrative override"),
            Self::Granted => write!(f, "permission granted"),
            Self::ContextMatched { source } => write!(f, "context matched ({:?})", source),
            Self::MissingPrincipal => write!(f, "no authenticated principal"),
            Self::PermissionNotGranted => write!(f, "permission not granted"),
            Self::UnknownContextKey { context_key } => {
                write!(f, "unknown context key '{}'", context_key)
            }
            Self::MalformedContextValue { context_key } => {
                write!(f, "malformed stored value for context '{}'", context_key)
            }
            Self::ContextMismatch { context_key, claimed } => {
                write!(f, "context '{}' does not cover '{}'", context_key, claimed)
            }
            Self::MissingClaim { context_key } => {
                write!(f, "no claimed value for context '{}'", context_key)
            }
        }
    }
}

/// Outcome of an access check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Unique decision identifier
    pub id: String,

    pub allowed: bool,

    /// Principal id, if one was available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,

    pub permission: Permission,

    pub reason: DecisionReason,

    pub timestamp: DateTime<Utc>,
}

impl AccessDecision {
    fn new(
        allowed: bool,
        principal: Option<String>,
        permission: Permission,
        reason: DecisionReason,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            allowed,
            principal,
            permission,
            reason,
            timestamp: Utc::now(),
        }
    }

    pub fn allow(principal: Option<String>, permission: Permission, reason: DecisionReason) -> Self {
        Self::new(true, principal, permission, reason)
    }

    pub fn deny(principal: Option<String>, permission: Permission, reason: DecisionReason) -> Self {
        Self::new(false, principal, permission, reason)
    }
}
