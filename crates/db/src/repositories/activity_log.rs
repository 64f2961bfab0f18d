//! Activity log repository. Insert and list only; rows are never mutated.

use std::sync::Arc;

use crate::entities::{ActivityLog, activity_log};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Activity log repository for database operations.
#[derive(Clone)]
pub struct ActivityLogRepository {
    db: Arc<DatabaseConnection>,
}

impl ActivityLogRepository {
    /// Create a new activity log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append one audit row.
    pub async fn append(&self, model: activity_log::ActiveModel) -> AppResult<activity_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most recent activity of an organization.
    pub async fn recent(&self, org_id: &str, limit: u64) -> AppResult<Vec<activity_log::Model>> {
        ActivityLog::find()
            .filter(activity_log::Column::OrganizationId.eq(org_id))
            .order_by_desc(activity_log::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Activity rows about one entity, newest first.
    pub async fn for_entity(
        &self,
        org_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> AppResult<Vec<activity_log::Model>> {
        ActivityLog::find()
            .filter(activity_log::Column::OrganizationId.eq(org_id))
            .filter(activity_log::Column::EntityType.eq(entity_type))
            .filter(activity_log::Column::EntityId.eq(entity_id))
            .order_by_desc(activity_log::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
