//! Outlet repository.

use std::sync::Arc;

use crate::entities::{Outlet, outlet};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Outlet repository for database operations.
#[derive(Clone)]
pub struct OutletRepository {
    db: Arc<DatabaseConnection>,
}

impl OutletRepository {
    /// Create a new outlet repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an outlet by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<outlet::Model>> {
        Outlet::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an outlet by ID scoped to an organization.
    pub async fn find_in_org(&self, id: &str, org_id: &str) -> AppResult<Option<outlet::Model>> {
        Outlet::find_by_id(id)
            .filter(outlet::Column::OrganizationId.eq(org_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List outlets of an organization, by name.
    pub async fn list_by_org(&self, org_id: &str) -> AppResult<Vec<outlet::Model>> {
        Outlet::find()
            .filter(outlet::Column::OrganizationId.eq(org_id))
            .order_by_asc(outlet::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new outlet.
    pub async fn create(&self, model: outlet::ActiveModel) -> AppResult<outlet::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an outlet.
    pub async fn update(&self, model: outlet::ActiveModel) -> AppResult<outlet::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an outlet. Work items referencing it fall back to null.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let outlet = self.find_by_id(id).await?;
        if let Some(o) = outlet {
            o.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
