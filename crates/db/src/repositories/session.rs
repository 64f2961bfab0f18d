//! Session repository.

use std::sync::Arc;

use crate::entities::{Session, session};
use opsboard_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Session repository for database operations.
#[derive(Clone)]
pub struct SessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a session by its token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<session::Model>> {
        Session::find_by_id(token)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new session.
    pub async fn create(&self, model: session::ActiveModel) -> AppResult<session::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a session's selected organization, clearing the outlet.
    pub async fn set_organization(&self, token: &str, org_id: &str) -> AppResult<()> {
        let mut active = session::ActiveModel {
            token: Set(token.to_string()),
            ..Default::default()
        };
        active.organization_id = Set(Some(org_id.to_string()));
        active.outlet_id = Set(None);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Update a session's selected outlet. `None` selects all outlets.
    pub async fn set_outlet(&self, token: &str, outlet_id: Option<&str>) -> AppResult<()> {
        let mut active = session::ActiveModel {
            token: Set(token.to_string()),
            ..Default::default()
        };
        active.outlet_id = Set(outlet_id.map(ToString::to_string));
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a session (logout).
    pub async fn delete(&self, token: &str) -> AppResult<()> {
        Session::delete_by_id(token)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete every session belonging to a profile.
    pub async fn delete_for_profile(&self, profile_id: &str) -> AppResult<u64> {
        let result = Session::delete_many()
            .filter(session::Column::ProfileId.eq(profile_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
