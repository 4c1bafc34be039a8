//! Authenticated principal and the provider contract

use crate::model::{Grant, User};
use crate::types::{deserialize_context_values, normalize_key, ContextValues, Permission};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Principal whose permissions and context claims are evaluated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal identifier (user code)
    pub id: String,

    /// Flattened permission identifiers across direct and role grants
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,

    /// Grants with their context restrictions
    #[serde(default)]
    pub grants: Vec<Grant>,

    /// Context values claimed by the principal (e.g. own department),
    /// by normalized key
    #[serde(default, deserialize_with = "deserialize_context_values")]
    claims: ContextValues,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Principal for an active user; `None` for disabled, locked or expired users
    pub fn from_user(user: &User) -> Option<Self> {
        if !user.is_active() {
            debug!(user = %user.code, "inactive user yields no principal");
            return None;
        }

        let grants = user.effective_grants();
        let permissions = grants.iter().map(|g| g.permission.clone()).collect();

        Some(Self {
            id: user.code.clone(),
            permissions,
            grants,
            claims: ContextValues::new(),
        })
    }

    /// Add a grant and its permission
    pub fn with_grant(mut self, grant: Grant) -> Self {
        self.permissions.insert(grant.permission.clone());
        self.grants.push(grant);
        self
    }

    /// Add a bare permission without a grant record
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    /// Add permissions from their string form; unparseable entries are skipped
    pub fn with_permission_strings<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in permissions {
            match raw.as_ref().parse::<Permission>() {
                Ok(permission) => {
                    self.permissions.insert(permission);
                }
                Err(e) => debug!(permission = raw.as_ref(), error = %e, "skipping permission"),
            }
        }
        self
    }

    /// Add a claim, replacing any value under the same key
    pub fn with_claim(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.claims.insert(normalize_key(key.as_ref()), value.into());
        self
    }

    pub fn claims(&self) -> &ContextValues {
        &self.claims
    }

    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Grants carrying `permission`
    pub fn grants_for<'a>(&'a self, permission: &'a Permission) -> impl Iterator<Item = &'a Grant> + 'a {
        self.grants.iter().filter(move |g| &g.permission == permission)
    }

    /// Claimed value for a context key, case-insensitive
    pub fn claim(&self, key: &str) -> Option<&str> {
        self.claims.get(&normalize_key(key)).map(String::as_str)
    }
}

/// Source of the current authenticated principal
pub trait PrincipalProvider: Send + Sync {
    /// Current principal, or `None` when nobody is authenticated
    fn current(&self) -> Option<Principal>;
}

/// Provider returning a fixed principal (or none)
#[derive(Debug, Clone, Default)]
pub struct StaticPrincipalProvider {
    principal: Option<Principal>,
}

impl StaticPrincipalProvider {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    /// Provider with no authenticated principal
    pub fn anonymous() -> Self {
        Self { principal: None }
    }
}

impl PrincipalProvider for StaticPrincipalProvider {
    fn current(&self) -> Option<Principal> {
        self.principal.clone()
    }
}

impl<P: PrincipalProvider + ?Sized> PrincipalProvider for Arc<P> {
    fn current(&self) -> Option<Principal> {
        (**self).current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GrantSource, PrivilegeOperation, Role};
    use crate::types::Operation;

    #[test]
    fn test_from_user() {
        let user = User::new("alice", "Alice").with_role(
            Role::new("clerk").grant("invoice", [PrivilegeOperation::new(Operation::Read)]),
        );

        let principal = Principal::from_user(&user).unwrap();
        assert_eq!(principal.id, "alice");
        assert!(principal.has_permission(&Permission::new("invoice", Operation::Read)));
        assert!(!principal.has_permission(&Permission::new("invoice", Operation::Delete)));
    }

    #[test]
    fn test_inactive_user_has_no_principal() {
        let mut user = User::new("bob", "Bob");
        user.enabled = false;
        assert!(Principal::from_user(&user).is_none());
    }

    #[test]
    fn test_permission_strings() {
        let principal = Principal::new("carol").with_permission_strings(["READ.invoice", "bogus"]);
        assert_eq!(principal.permissions.len(), 1);
    }

    #[test]
    fn test_grants_for_and_claims() {
        let read = Permission::new("invoice", Operation::Read);
        let principal = Principal::new("dave")
            .with_grant(Grant::new(read.clone(), GrantSource::Direct))
            .with_grant(Grant::new(read.clone(), GrantSource::Role("clerk".into())))
            .with_claim("department", "10");

        assert_eq!(principal.grants_for(&read).count(), 2);
        assert_eq!(principal.claim("DEPARTMENT"), Some("10"));
        assert_eq!(principal.claim("ID"), None);
    }

    #[test]
    fn test_claims_collapse_by_case() {
        let principal = Principal::new("frank")
            .with_claim("department", "10")
            .with_claim("Department", "20");

        assert_eq!(principal.claims().len(), 1);
        assert_eq!(principal.claim("DEPARTMENT"), Some("20"));
    }

    #[test]
    fn test_static_provider() {
        assert!(StaticPrincipalProvider::anonymous().current().is_none());
        let provider = Arc::new(StaticPrincipalProvider::new(Principal::new("erin")));
        assert_eq!(provider.current().unwrap().id, "erin");
    }
}
