//! Roles and role-privilege joins

use super::privilege::PrivilegeOperation;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};

/// Role–privilege join carrying the operations granted through the role
///
/// Identity is `(role, privilege)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePrivilege {
    pub role: String,
    pub privilege: String,

    #[serde(default)]
    pub operations: HashSet<PrivilegeOperation>,
}

impl RolePrivilege {
    pub fn new(role: impl Into<String>, privilege: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            privilege: privilege.into(),
            operations: HashSet::new(),
        }
    }

    /// Grant an operation, replacing an existing grant for the same operation
    pub fn with_operation(mut self, operation: PrivilegeOperation) -> Self {
        self.operations.replace(operation);
        self
    }
}

impl PartialEq for RolePrivilege {
    fn eq(&self, other: &Self) -> bool {
        self.role == other.role && self.privilege == other.privilege
    }
}

impl Eq for RolePrivilege {}

impl Hash for RolePrivilege {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.role.hash(state);
        self.privilege.hash(state);
    }
}

/// Named set of privilege grants assigned to users
///
/// Members are referenced by user code to keep the graph acyclic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,

    #[serde(default)]
    pub users: BTreeSet<String>,

    #[serde(default)]
    pub privileges: HashSet<RolePrivilege>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            users: BTreeSet::new(),
            privileges: HashSet::new(),
        }
    }

    pub fn with_user(mut self, code: impl Into<String>) -> Self {
        self.users.insert(code.into());
        self
    }

    /// Grant operations on a privilege through this role
    pub fn grant<I>(mut self, privilege: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator<Item = PrivilegeOperation>,
    {
        let mut join = RolePrivilege::new(self.name.clone(), privilege);
        for operation in operations {
            join = join.with_operation(operation);
        }
        self.privileges.replace(join);
        self
    }

    /// Grants attached to a privilege, if any
    pub fn privilege(&self, name: &str) -> Option<&RolePrivilege> {
        self.privileges.iter().find(|rp| rp.privilege == name)
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Operation;

    #[test]
    fn test_role_privilege_composite_key() {
        let a = RolePrivilege::new("clerk", "invoice")
            .with_operation(PrivilegeOperation::new(Operation::Read));
        let b = RolePrivilege::new("clerk", "invoice");
        let c = RolePrivilege::new("manager", "invoice");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unset_keys_compare_by_value() {
        // Empty keys are ordinary values, never an identity fallback
        let a = RolePrivilege::new("", "");
        let b = RolePrivilege::new("", "");
        assert_eq!(a, b);
    }

    #[test]
    fn test_grant_replaces_join() {
        let role = Role::new("clerk")
            .grant("invoice", [PrivilegeOperation::new(Operation::Read)])
            .grant(
                "invoice",
                [
                    PrivilegeOperation::new(Operation::Read),
                    PrivilegeOperation::new(Operation::Update),
                ],
            );

        assert_eq!(role.privileges.len(), 1);
        assert_eq!(role.privilege("invoice").unwrap().operations.len(), 2);
        assert!(role.privilege("order").is_none());
    }
}
