//! Administrative privilege operations with SYSTEM protection
//!
//! SYSTEM privileges belong to registered functionalities. They can be
//! granted like any other privilege but never deleted or duplicated here.

use crate::catalog::PermissionCatalog;
use crate::error::{AuthzError, Result};
use crate::model::{Privilege, PrivilegeType};
use std::sync::Arc;
use tracing::{info, warn};

/// Guarded privilege administration over a catalog
pub struct PrivilegeAdmin {
    catalog: Arc<dyn PermissionCatalog>,
}

impl PrivilegeAdmin {
    pub fn new(catalog: Arc<dyn PermissionCatalog>) -> Self {
        Self { catalog }
    }

    /// Create a USER privilege; the name must be free
    pub async fn create_privilege(&self, privilege: Privilege) -> Result<()> {
        if privilege.privilege_type == PrivilegeType::System {
            return Err(AuthzError::InvalidInput(
                "System privileges are created by functionality registration".to_string(),
            ));
        }
        if privilege.name.trim().is_empty() {
            return Err(AuthzError::InvalidInput(
                "Privilege name cannot be empty".to_string(),
            ));
        }
        if self.catalog.privilege_exists(&privilege.name).await? {
            return Err(AuthzError::DuplicatePrivilege(privilege.name));
        }

        info!(privilege = %privilege.name, "privilege created");
        self.catalog.save_privilege(privilege).await
    }

    /// Delete a USER privilege
    pub async fn delete_privilege(&self, name: &str) -> Result<()> {
        let privilege = self.load(name).await?;
        if privilege.is_system() {
            warn!(privilege = name, "refusing to delete system privilege");
            return Err(AuthzError::SystemPrivilege(name.to_string()));
        }

        info!(privilege = name, "privilege deleted");
        self.catalog.delete_privilege(name).await
    }

    /// Copy a USER privilege under a new name
    pub async fn duplicate_privilege(&self, name: &str, new_name: &str) -> Result<Privilege> {
        let source = self.load(name).await?;
        if source.is_system() {
            warn!(privilege = name, "refusing to duplicate system privilege");
            return Err(AuthzError::SystemPrivilege(name.to_string()));
        }

        let mut copy = source;
        copy.name = new_name.to_string();
        self.create_privilege(copy.clone()).await?;
        Ok(copy)
    }

    async fn load(&self, name: &str) -> Result<Privilege> {
        self.catalog
            .find_privilege(name)
            .await?
            .ok_or_else(|| AuthzError::PrivilegeNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    async fn admin() -> (PrivilegeAdmin, Arc<InMemoryCatalog>) {
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog.save_privilege(Privilege::system("invoice")).await.unwrap();
        catalog
            .save_privilege(Privilege::user("archive").with_value("DEPARTMENT"))
            .await
            .unwrap();
        (PrivilegeAdmin::new(catalog.clone()), catalog)
    }

    #[tokio::test]
    async fn test_system_privilege_protected() {
        let (admin, catalog) = admin().await;

        assert!(matches!(
            admin.delete_privilege("invoice").await,
            Err(AuthzError::SystemPrivilege(_))
        ));
        assert!(matches!(
            admin.duplicate_privilege("invoice", "invoice2").await,
            Err(AuthzError::SystemPrivilege(_))
        ));
        assert!(catalog.privilege_exists("invoice").await.unwrap());
        assert!(!catalog.privilege_exists("invoice2").await.unwrap());
    }

    #[tokio::test]
    async fn test_user_privilege_lifecycle() {
        let (admin, catalog) = admin().await;

        let copy = admin.duplicate_privilege("archive", "archive-eu").await.unwrap();
        assert_eq!(copy.values.len(), 1);
        assert!(catalog.privilege_exists("archive-eu").await.unwrap());

        assert!(matches!(
            admin.duplicate_privilege("archive", "archive-eu").await,
            Err(AuthzError::DuplicatePrivilege(_))
        ));

        admin.delete_privilege("archive").await.unwrap();
        assert!(matches!(
            admin.delete_privilege("archive").await,
            Err(AuthzError::PrivilegeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cannot_create_system_privilege() {
        let (admin, _) = admin().await;
        assert!(matches!(
            admin.create_privilege(Privilege::system("payroll")).await,
            Err(AuthzError::InvalidInput(_))
        ));
    }
}
