//! Notification side effects.

use chrono::{DateTime, Duration, Utc};
use opsboard_common::{AppResult, IdGenerator};
use opsboard_db::entities::notification::{self, NotificationPriority, NotificationType};
use opsboard_db::repositories::NotificationRepository;
use sea_orm::Set;

/// Dedup window applied to overdue and reminder notifications.
#[must_use]
pub fn dedup_window() -> Duration {
    Duration::hours(24)
}

/// Input for one notification.
#[derive(Debug, Clone)]
pub struct NotifyInput {
    /// Recipient profile id.
    pub recipient_id: String,
    /// Organization the notification belongs to.
    pub organization_id: String,
    /// Notification type.
    pub notification_type: NotificationType,
    /// Display priority.
    pub priority: NotificationPriority,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Deep link into the client.
    pub link: Option<String>,
    /// Entity the notification is about.
    pub entity_type: Option<String>,
    /// Entity id, used for dedup.
    pub entity_id: Option<String>,
}

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Insert one notification row.
    pub async fn notify(&self, input: NotifyInput) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            recipient_id: Set(input.recipient_id),
            organization_id: Set(input.organization_id),
            notification_type: Set(input.notification_type),
            priority: Set(input.priority),
            title: Set(input.title),
            message: Set(input.message),
            link: Set(input.link),
            entity_type: Set(input.entity_type),
            entity_id: Set(input.entity_id),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
        };
        self.notification_repo.create(model).await
    }

    /// Insert a notification unless one of the same type about the same
    /// entity already reached the recipient within the window.
    ///
    /// Returns `Ok(None)` when suppressed.
    pub async fn notify_deduped(
        &self,
        input: NotifyInput,
        window: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<Option<notification::Model>> {
        if let Some(entity_id) = &input.entity_id {
            let already_sent = self
                .notification_repo
                .exists_since(
                    &input.recipient_id,
                    input.notification_type,
                    entity_id,
                    now - window,
                )
                .await?;
            if already_sent {
                return Ok(None);
            }
        }
        self.notify(input).await.map(Some)
    }

    /// List a profile's notifications, newest first.
    pub async fn list(
        &self,
        profile_id: &str,
        limit: u64,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_recipient(profile_id, limit, unread_only)
            .await
    }

    /// Mark one of the recipient's notifications as read. A notification
    /// belonging to anyone else is indistinguishable from a missing one.
    pub async fn mark_read(&self, id: &str, recipient_id: &str) -> AppResult<()> {
        self.notification_repo.mark_as_read(id, recipient_id).await
    }

    /// Mark all of a profile's notifications as read.
    pub async fn mark_all_read(&self, profile_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(profile_id).await
    }

    /// Unread count for a profile.
    pub async fn unread_count(&self, profile_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(profile_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn sample_input() -> NotifyInput {
        NotifyInput {
            recipient_id: "u1".to_string(),
            organization_id: "org1".to_string(),
            notification_type: NotificationType::TaskOverdue,
            priority: NotificationPriority::High,
            title: "Task overdue".to_string(),
            message: "'Close the till' is past its due date".to_string(),
            link: Some("/tasks/t1".to_string()),
            entity_type: Some("task".to_string()),
            entity_id: Some("t1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_notify_deduped_suppresses_within_window() {
        let existing = notification::Model {
            id: "n1".to_string(),
            recipient_id: "u1".to_string(),
            organization_id: "org1".to_string(),
            notification_type: NotificationType::TaskOverdue,
            priority: NotificationPriority::High,
            title: "Task overdue".to_string(),
            message: "already sent".to_string(),
            link: None,
            entity_type: Some("task".to_string()),
            entity_id: Some("t1".to_string()),
            is_read: false,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let service = NotificationService::new(NotificationRepository::new(db));

        let result = service
            .notify_deduped(sample_input(), dedup_window(), Utc::now())
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
