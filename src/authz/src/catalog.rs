//! Permission catalog persistence contract

use crate::error::{AuthzError, Result};
use crate::model::{Privilege, Role, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Catalog of privileges, roles and users
///
/// Owned by the host application's persistence layer. Uniqueness and
/// required-field validation belong to that layer.
#[async_trait]
pub trait PermissionCatalog: Send + Sync {
    /// Whether a privilege with this name exists
    async fn privilege_exists(&self, name: &str) -> Result<bool>;

    /// Get a privilege by name
    async fn find_privilege(&self, name: &str) -> Result<Option<Privilege>>;

    /// Insert or replace a privilege (keyed by name)
    async fn save_privilege(&self, privilege: Privilege) -> Result<()>;

    /// Delete a privilege
    async fn delete_privilege(&self, name: &str) -> Result<()>;

    /// List all privileges, sorted by name
    async fn list_privileges(&self) -> Result<Vec<Privilege>>;

    /// Get a role by name
    async fn find_role(&self, name: &str) -> Result<Option<Role>>;

    /// Insert or replace a role
    async fn save_role(&self, role: Role) -> Result<()>;

    /// Get a user by code
    async fn find_user(&self, code: &str) -> Result<Option<User>>;

    /// Insert or replace a user
    async fn save_user(&self, user: User) -> Result<()>;
}

/// Serializable catalog contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub privileges: Vec<Privilege>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl CatalogSnapshot {
    /// Parse a snapshot from JSON; unknown top-level fields are ignored
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// In-memory catalog implementation
pub struct InMemoryCatalog {
    privileges: Arc<RwLock<HashMap<String, Privilege>>>,
    roles: Arc<RwLock<HashMap<String, Role>>>,
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            privileges: Arc::new(RwLock::new(HashMap::new())),
            roles: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Catalog preloaded from a snapshot; duplicate privilege names are rejected
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self> {
        let mut privileges = HashMap::new();
        for privilege in snapshot.privileges {
            if privileges.contains_key(&privilege.name) {
                return Err(AuthzError::DuplicatePrivilege(privilege.name));
            }
            privileges.insert(privilege.name.clone(), privilege);
        }

        let roles = snapshot
            .roles
            .into_iter()
            .map(|r| (r.name.clone(), r))
            .collect();
        let users = snapshot
            .users
            .into_iter()
            .map(|u| (u.code.clone(), u))
            .collect();

        Ok(Self {
            privileges: Arc::new(RwLock::new(privileges)),
            roles: Arc::new(RwLock::new(roles)),
            users: Arc::new(RwLock::new(users)),
        })
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionCatalog for InMemoryCatalog {
    async fn privilege_exists(&self, name: &str) -> Result<bool> {
        let privileges = self.privileges.read().await;
        Ok(privileges.contains_key(name))
    }

    async fn find_privilege(&self, name: &str) -> Result<Option<Privilege>> {
        let privileges = self.privileges.read().await;
        Ok(privileges.get(name).cloned())
    }

    async fn save_privilege(&self, privilege: Privilege) -> Result<()> {
        let mut privileges = self.privileges.write().await;
        privileges.insert(privilege.name.clone(), privilege);
        Ok(())
    }

    async fn delete_privilege(&self, name: &str) -> Result<()> {
        let mut privileges = self.privileges.write().await;
        privileges.remove(name);
        Ok(())
    }

    async fn list_privileges(&self) -> Result<Vec<Privilege>> {
        let privileges = self.privileges.read().await;
        let mut all: Vec<Privilege> = privileges.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_role(&self, name: &str) -> Result<Option<Role>> {
        let roles = self.roles.read().await;
        Ok(roles.get(name).cloned())
    }

    async fn save_role(&self, role: Role) -> Result<()> {
        let mut roles = self.roles.write().await;
        roles.insert(role.name.clone(), role);
        Ok(())
    }

    async fn find_user(&self, code: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(code).cloned())
    }

    async fn save_user(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.code.clone(), user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_json() {
        let snapshot = CatalogSnapshot::from_json(
            r#"{"config": {}, "privileges": [{"name": "invoice", "type": "SYSTEM"}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.privileges.len(), 1);
        assert!(snapshot.users.is_empty());
    }

    #[test]
    fn test_snapshot_from_invalid_json() {
        assert!(matches!(
            CatalogSnapshot::from_json(r#"{"privileges": [{"name": "invoice"}]}"#),
            Err(AuthzError::Serialization(_))
        ));
        assert!(matches!(
            CatalogSnapshot::from_json("not json"),
            Err(AuthzError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_privilege_crud() {
        let catalog = InMemoryCatalog::new();
        assert!(!catalog.privilege_exists("invoice").await.unwrap());

        catalog.save_privilege(Privilege::system("invoice")).await.unwrap();
        catalog.save_privilege(Privilege::user("archive")).await.unwrap();
        assert!(catalog.privilege_exists("invoice").await.unwrap());

        let names: Vec<_> = catalog
            .list_privileges()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["archive", "invoice"]);

        catalog.delete_privilege("invoice").await.unwrap();
        assert!(catalog.find_privilege("invoice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_rejects_duplicates() {
        let snapshot = CatalogSnapshot {
            privileges: vec![Privilege::system("invoice"), Privilege::user("invoice")],
            ..Default::default()
        };

        assert!(matches!(
            InMemoryCatalog::from_snapshot(snapshot),
            Err(AuthzError::DuplicatePrivilege(name)) if name == "invoice"
        ));
    }

    #[tokio::test]
    async fn test_users_and_roles() {
        let catalog = InMemoryCatalog::new();
        catalog.save_role(Role::new("clerk")).await.unwrap();
        catalog.save_user(User::new("alice", "Alice")).await.unwrap();

        assert!(catalog.find_role("clerk").await.unwrap().is_some());
        assert_eq!(catalog.find_user("alice").await.unwrap().unwrap().name, "Alice");
        assert!(catalog.find_user("bob").await.unwrap().is_none());
    }
}
