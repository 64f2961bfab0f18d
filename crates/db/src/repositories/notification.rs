//! Notification repository.

use std::sync::Arc;

use crate::entities::notification::NotificationType;
use crate::entities::{Notification, notification};
use chrono::{DateTime, Utc};
use opsboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new notification.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get notifications for a profile, newest first.
    pub async fn find_by_recipient(
        &self,
        profile_id: &str,
        limit: u64,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        let mut query = Notification::find()
            .filter(notification::Column::RecipientId.eq(profile_id))
            .order_by_desc(notification::Column::CreatedAt);

        if unread_only {
            query = query.filter(notification::Column::IsRead.eq(false));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a notification of this type about this entity was already
    /// sent to the recipient after the cutoff.
    pub async fn exists_since(
        &self,
        profile_id: &str,
        notification_type: NotificationType,
        entity_id: &str,
        cutoff: DateTime<Utc>,
    ) -> AppResult<bool> {
        let found = Notification::find()
            .filter(notification::Column::RecipientId.eq(profile_id))
            .filter(notification::Column::NotificationType.eq(notification_type))
            .filter(notification::Column::EntityId.eq(entity_id))
            .filter(notification::Column::CreatedAt.gte(cutoff))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.is_some())
    }

    /// Mark a notification as read. The lookup is scoped to the recipient
    /// so one profile can never touch another profile's notifications.
    pub async fn mark_as_read(&self, id: &str, recipient_id: &str) -> AppResult<()> {
        let notification = Notification::find_by_id(id)
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("notification not found".to_string()))?;

        let mut active: notification::ActiveModel = notification.into();
        active.is_read = Set(true);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Mark all notifications as read for a profile.
    pub async fn mark_all_as_read(&self, profile_id: &str) -> AppResult<u64> {
        use sea_orm::UpdateResult;

        let result: UpdateResult = Notification::update_many()
            .filter(notification::Column::RecipientId.eq(profile_id))
            .filter(notification::Column::IsRead.eq(false))
            .col_expr(notification::Column::IsRead, true.into())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count unread notifications for a profile.
    pub async fn count_unread(&self, profile_id: &str) -> AppResult<u64> {
        Notification::find()
            .filter(notification::Column::RecipientId.eq(profile_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::notification::NotificationPriority;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_notification(id: &str, recipient: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            recipient_id: recipient.to_string(),
            organization_id: "org1".to_string(),
            notification_type: NotificationType::TaskAssigned,
            priority: NotificationPriority::Normal,
            title: "New task".to_string(),
            message: "You were assigned a task".to_string(),
            link: Some("/tasks/t1".to_string()),
            entity_type: Some("task".to_string()),
            entity_id: Some("t1".to_string()),
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_exists_since_true_when_row_present() {
        let n = test_notification("n1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[n]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let cutoff = Utc::now() - chrono::Duration::hours(24);
        let exists = repo
            .exists_since("u1", NotificationType::TaskAssigned, "t1", cutoff)
            .await
            .unwrap();

        assert!(exists);
    }

    #[tokio::test]
    async fn test_mark_as_read_scoped_to_recipient() {
        // The row exists but belongs to someone else; the recipient-scoped
        // lookup must come back empty and no update may run.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification::Model>::new()])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.mark_as_read("n1", "intruder").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_as_read_updates_own_notification() {
        let n = test_notification("n1", "u1");
        let mut updated = n.clone();
        updated.is_read = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[n]])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        repo.mark_as_read("n1", "u1").await.unwrap();
    }

    #[tokio::test]
    async fn test_exists_since_false_when_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification::Model>::new()])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let cutoff = Utc::now() - chrono::Duration::hours(24);
        let exists = repo
            .exists_since("u1", NotificationType::TaskOverdue, "t1", cutoff)
            .await
            .unwrap();

        assert!(!exists);
    }
}
