//! Team repository.

use std::sync::Arc;

use crate::entities::{Team, team};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Team repository for database operations.
#[derive(Clone)]
pub struct TeamRepository {
    db: Arc<DatabaseConnection>,
}

impl TeamRepository {
    /// Create a new team repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<team::Model>> {
        Team::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a team by ID scoped to an organization.
    pub async fn find_in_org(&self, id: &str, org_id: &str) -> AppResult<Option<team::Model>> {
        Team::find_by_id(id)
            .filter(team::Column::OrganizationId.eq(org_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List teams of an organization, by name.
    pub async fn list_by_org(&self, org_id: &str) -> AppResult<Vec<team::Model>> {
        Team::find()
            .filter(team::Column::OrganizationId.eq(org_id))
            .order_by_asc(team::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new team.
    pub async fn create(&self, model: team::ActiveModel) -> AppResult<team::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a team.
    pub async fn update(&self, model: team::ActiveModel) -> AppResult<team::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a team.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let team = self.find_by_id(id).await?;
        if let Some(t) = team {
            t.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
