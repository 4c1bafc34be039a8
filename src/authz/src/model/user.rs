//! Users, direct grants and effective permission computation

use super::grant::{Grant, GrantSource};
use super::privilege::PrivilegeOperation;
use super::role::Role;
use crate::types::Permission;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};

/// Direct user–privilege grant bypassing roles
///
/// Identity is `(user, privilege)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPrivilege {
    pub user: String,
    pub privilege: String,

    #[serde(default)]
    pub operations: HashSet<PrivilegeOperation>,
}

impl UserPrivilege {
    pub fn new(user: impl Into<String>, privilege: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            privilege: privilege.into(),
            operations: HashSet::new(),
        }
    }

    pub fn with_operation(mut self, operation: PrivilegeOperation) -> Self {
        self.operations.replace(operation);
        self
    }
}

impl PartialEq for UserPrivilege {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user && self.privilege == other.privilege
    }
}

impl Eq for UserPrivilege {}

impl Hash for UserPrivilege {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user.hash(state);
        self.privilege.hash(state);
    }
}

fn default_true() -> bool {
    true
}

/// Application user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub code: String,
    pub name: String,

    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub account_locked: bool,
    #[serde(default)]
    pub account_expired: bool,
    #[serde(default)]
    pub credentials_expired: bool,

    #[serde(default)]
    pub roles: HashSet<Role>,

    #[serde(default)]
    pub privileges: HashSet<UserPrivilege>,
}

impl User {
    /// Create an enabled user without grants
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            enabled: true,
            account_locked: false,
            account_expired: false,
            credentials_expired: false,
            roles: HashSet::new(),
            privileges: HashSet::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.replace(role);
        self
    }

    /// Directly grant operations on a privilege
    pub fn grant<I>(mut self, privilege: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator<Item = PrivilegeOperation>,
    {
        let mut join = UserPrivilege::new(self.code.clone(), privilege);
        for operation in operations {
            join = join.with_operation(operation);
        }
        self.privileges.replace(join);
        self
    }

    /// Enabled and neither locked nor expired
    pub fn is_active(&self) -> bool {
        self.enabled && !self.account_locked && !self.account_expired && !self.credentials_expired
    }

    /// Union of direct grants and grants inherited through every role
    ///
    /// Direct grants come first, then roles in name order.
    pub fn effective_grants(&self) -> Vec<Grant> {
        let mut grants = Vec::new();

        let mut direct: Vec<_> = self.privileges.iter().collect();
        direct.sort_by(|a, b| a.privilege.cmp(&b.privilege));
        for join in direct {
            push_operations(&mut grants, &join.privilege, &join.operations, GrantSource::Direct);
        }

        let mut roles: Vec<_> = self.roles.iter().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        for role in roles {
            let mut joins: Vec<_> = role.privileges.iter().collect();
            joins.sort_by(|a, b| a.privilege.cmp(&b.privilege));
            for join in joins {
                push_operations(
                    &mut grants,
                    &join.privilege,
                    &join.operations,
                    GrantSource::Role(role.name.clone()),
                );
            }
        }

        grants
    }

    /// Flattened permission identifiers across direct and role grants
    pub fn effective_permissions(&self) -> BTreeSet<Permission> {
        self.effective_grants()
            .into_iter()
            .map(|grant| grant.permission)
            .collect()
    }
}

fn push_operations(
    grants: &mut Vec<Grant>,
    privilege: &str,
    operations: &HashSet<PrivilegeOperation>,
    source: GrantSource,
) {
    let mut ops: Vec<_> = operations.iter().collect();
    ops.sort_by_key(|op| op.operation);
    for op in ops {
        grants.push(Grant::from_operation(privilege, op, source.clone()));
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}
