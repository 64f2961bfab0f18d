//! Role repository, including the permission catalog.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entities::{Permission, Role, RolePermission, permission, role, role_permission};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

/// Role repository for database operations.
#[derive(Clone)]
pub struct RoleRepository {
    db: Arc<DatabaseConnection>,
}

impl RoleRepository {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a role by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<role::Model>> {
        Role::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a role by ID scoped to an organization.
    pub async fn find_in_org(&self, id: &str, org_id: &str) -> AppResult<Option<role::Model>> {
        Role::find_by_id(id)
            .filter(role::Column::OrganizationId.eq(org_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List roles of an organization, by name.
    pub async fn list_by_org(&self, org_id: &str) -> AppResult<Vec<role::Model>> {
        Role::find()
            .filter(role::Column::OrganizationId.eq(org_id))
            .order_by_asc(role::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new role.
    pub async fn create(&self, model: role::ActiveModel) -> AppResult<role::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a role.
    pub async fn update(&self, model: role::ActiveModel) -> AppResult<role::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a role. Profiles holding it fall back to no role.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let role = self.find_by_id(id).await?;
        if let Some(r) = role {
            r.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Load the permission codenames granted to a role.
    pub async fn permission_codenames(&self, role_id: &str) -> AppResult<HashSet<String>> {
        let rows = RolePermission::find()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .find_also_related(Permission)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, perm)| perm.map(|p| p.codename))
            .collect())
    }

    /// Replace a role's permission set with the given permission ids.
    pub async fn set_permissions(&self, role_id: &str, permission_ids: &[String]) -> AppResult<()> {
        RolePermission::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for pid in permission_ids {
            let link = role_permission::ActiveModel {
                role_id: Set(role_id.to_string()),
                permission_id: Set(pid.clone()),
            };
            link.insert(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List the global permission catalog, by module then codename.
    pub async fn permission_catalog(&self) -> AppResult<Vec<permission::Model>> {
        Permission::find()
            .order_by_asc(permission::Column::Module)
            .order_by_asc(permission::Column::Codename)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Resolve permission ids from codenames. Unknown codenames are ignored.
    pub async fn permission_ids_for(&self, codenames: &[String]) -> AppResult<Vec<String>> {
        let perms = Permission::find()
            .filter(permission::Column::Codename.is_in(codenames.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(perms.into_iter().map(|p| p.id).collect())
    }
}
