//! Flattened grants, as evaluated by the decision engine

use super::privilege::{PrivilegeOperation, PrivilegeOperationContext};
use crate::types::Permission;
use serde::{Deserialize, Serialize};

/// Where a grant came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum GrantSource {
    /// Direct user grant
    Direct,
    /// Inherited through a role
    Role(String),
}

/// One operation grant on one functionality, with its context restrictions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub permission: Permission,

    #[serde(default)]
    pub contexts: Vec<PrivilegeOperationContext>,

    pub source: GrantSource,
}

impl Grant {
    /// Unrestricted grant
    pub fn new(permission: Permission, source: GrantSource) -> Self {
        Self {
            permission,
            contexts: Vec::new(),
            source,
        }
    }

    pub fn with_context(mut self, context: PrivilegeOperationContext) -> Self {
        self.contexts.push(context);
        self
    }

    /// Grant for one operation record of a privilege
    pub(crate) fn from_operation(
        privilege: &str,
        operation: &PrivilegeOperation,
        source: GrantSource,
    ) -> Self {
        let mut contexts: Vec<_> = operation.contexts.iter().cloned().collect();
        // Sorted by key, upper-cased
        contexts.sort_by(|a, b| {
            a.context_key
                .to_ascii_uppercase()
                .cmp(&b.context_key.to_ascii_uppercase())
        });

        Self {
            permission: Permission::new(privilege, operation.operation),
            contexts,
            source,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.contexts.is_empty()
    }
}
