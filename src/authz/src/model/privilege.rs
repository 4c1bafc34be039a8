//! Privilege, operation grant and operation context records

use crate::types::Operation;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};

/// Who manages a privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrivilegeType {
    /// Created by functionality registration; never deleted or duplicated
    System,
    /// Created by administrators
    User,
}

/// Named permission record
///
/// Identity is the name. `values` lists the context keys the privilege is
/// aware of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Privilege {
    pub name: String,

    #[serde(rename = "type")]
    pub privilege_type: PrivilegeType,

    #[serde(default)]
    pub values: BTreeSet<String>,
}

impl Privilege {
    /// Create a privilege of the given type
    pub fn new(name: impl Into<String>, privilege_type: PrivilegeType) -> Self {
        Self {
            name: name.into(),
            privilege_type,
            values: BTreeSet::new(),
        }
    }

    /// SYSTEM privilege, as created by functionality registration
    pub fn system(name: impl Into<String>) -> Self {
        Self::new(name, PrivilegeType::System)
    }

    /// USER privilege, as created by administrators
    pub fn user(name: impl Into<String>) -> Self {
        Self::new(name, PrivilegeType::User)
    }

    /// Declare a context key this privilege is aware of
    pub fn with_value(mut self, context_key: impl Into<String>) -> Self {
        self.values.insert(context_key.into());
        self
    }

    pub fn is_system(&self) -> bool {
        self.privilege_type == PrivilegeType::System
    }
}

impl PartialEq for Privilege {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Privilege {}

impl Hash for Privilege {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Accepted attribute values under which an operation grant applies
///
/// Identity within the parent grant is the context key, compared
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeOperationContext {
    pub context_key: String,

    #[serde(default)]
    pub values: BTreeSet<String>,
}

impl PrivilegeOperationContext {
    pub fn new<I, S>(context_key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            context_key: context_key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl PartialEq for PrivilegeOperationContext {
    fn eq(&self, other: &Self) -> bool {
        self.context_key.eq_ignore_ascii_case(&other.context_key)
    }
}

impl Eq for PrivilegeOperationContext {}

impl Hash for PrivilegeOperationContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.context_key.bytes() {
            byte.to_ascii_uppercase().hash(state);
        }
    }
}

/// Operation granted on a privilege, optionally restricted by contexts
///
/// Identity within the parent grant is the operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeOperation {
    pub operation: Operation,

    #[serde(default)]
    pub contexts: HashSet<PrivilegeOperationContext>,
}

impl PrivilegeOperation {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            contexts: HashSet::new(),
        }
    }

    /// Attach a context restriction, replacing any existing one for the key
    pub fn with_context(mut self, context: PrivilegeOperationContext) -> Self {
        self.contexts.replace(context);
        self
    }

    /// True when the grant carries no context restriction
    pub fn is_unrestricted(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl PartialEq for PrivilegeOperation {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation
    }
}

impl Eq for PrivilegeOperation {}

impl Hash for PrivilegeOperation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operation.hash(state);
    }
}
