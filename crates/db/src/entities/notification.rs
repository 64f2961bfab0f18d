//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[sea_orm(string_value = "task_assigned")]
    TaskAssigned,
    #[sea_orm(string_value = "task_completed")]
    TaskCompleted,
    #[sea_orm(string_value = "task_overdue")]
    TaskOverdue,
    #[sea_orm(string_value = "task_comment")]
    TaskComment,
    #[sea_orm(string_value = "issue_created")]
    IssueCreated,
    #[sea_orm(string_value = "issue_resolved")]
    IssueResolved,
    #[sea_orm(string_value = "project_update")]
    ProjectUpdate,
    #[sea_orm(string_value = "form_response")]
    FormResponse,
    #[sea_orm(string_value = "assist_suggestion")]
    AssistSuggestion,
    #[sea_orm(string_value = "reminder")]
    Reminder,
    #[sea_orm(string_value = "system")]
    System,
}

/// Notification display priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "normal")]
    Normal,
    #[sea_orm(string_value = "low")]
    Low,
}

impl Default for NotificationPriority {
    fn default() -> Self {
        Self::Normal
    }
}

/// One in-app notification. Only `is_read` is ever mutated after insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The profile receiving the notification.
    #[sea_orm(indexed)]
    pub recipient_id: String,

    #[sea_orm(indexed)]
    pub organization_id: String,

    pub notification_type: NotificationType,

    pub priority: NotificationPriority,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    /// Deep link into the client, e.g. `/tasks/{id}`.
    #[sea_orm(nullable)]
    pub link: Option<String>,

    /// Entity the notification is about, used for dedup.
    #[sea_orm(nullable)]
    pub entity_type: Option<String>,

    #[sea_orm(nullable)]
    pub entity_id: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::RecipientId",
        to = "super::user_profile::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,

    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_delete = "Cascade"
    )]
    Organization,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
