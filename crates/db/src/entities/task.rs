//! Task entity and its status/priority/recurrence enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[sea_orm(string_value = "todo")]
    Todo,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "review")]
    Review,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "on_hold")]
    OnHold,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

/// Work item priority, shared by tasks and issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[sea_orm(string_value = "critical")]
    Critical,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "none")]
    None,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Single-assignee vs group task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[sea_orm(string_value = "single")]
    Single,
    #[sea_orm(string_value = "group")]
    Group,
}

impl Default for TaskType {
    fn default() -> Self {
        Self::Single
    }
}

/// Recurrence schedule. `Custom` is stored verbatim in
/// `recurrence_details` and never expanded by the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "custom")]
    Custom,
}

impl Default for Recurrence {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub organization_id: String,

    #[sea_orm(nullable)]
    pub project_id: Option<String>,

    #[sea_orm(nullable)]
    pub outlet_id: Option<String>,

    #[sea_orm(nullable)]
    pub team_id: Option<String>,

    /// Parent task, for subtasks. The tree is depth-1: a subtask never
    /// has children of its own.
    #[sea_orm(indexed, nullable)]
    pub parent_id: Option<String>,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Standard-operating-procedure text attached to the task.
    #[sea_orm(column_type = "Text", nullable)]
    pub sop_content: Option<String>,

    pub task_type: TaskType,

    pub status: TaskStatus,

    pub priority: Priority,

    /// Free-text category label.
    #[sea_orm(nullable)]
    pub category: Option<String>,

    #[sea_orm(nullable)]
    pub start_date: Option<DateTimeWithTimeZone>,

    #[sea_orm(indexed, nullable)]
    pub due_date: Option<DateTimeWithTimeZone>,

    /// Non-null exactly when status is `completed`.
    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(default_value = 0)]
    pub points: i32,

    pub recurrence: Recurrence,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub recurrence_details: Option<Json>,

    /// Original task this occurrence was spawned from. Together with
    /// `due_date` this makes the recurrence sweep idempotent.
    #[sea_orm(indexed, nullable)]
    pub recurrence_source_id: Option<String>,

    #[sea_orm(default_value = false)]
    pub needs_approval: bool,

    #[sea_orm(default_value = false)]
    pub is_starred: bool,

    /// Advisory assistant output. Never read by business rules.
    #[sea_orm(column_type = "Text", nullable)]
    pub assist_summary: Option<String>,

    #[sea_orm(nullable)]
    pub assist_priority_hint: Option<String>,

    #[sea_orm(nullable)]
    pub tags: Option<String>,

    #[sea_orm(nullable)]
    pub created_by: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_trashed: bool,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_delete = "Cascade"
    )]
    Organization,

    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "SetNull"
    )]
    Project,

    #[sea_orm(
        belongs_to = "super::outlet::Entity",
        from = "Column::OutletId",
        to = "super::outlet::Column::Id",
        on_delete = "SetNull"
    )]
    Outlet,

    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_delete = "SetNull"
    )]
    Team,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,

    #[sea_orm(has_many = "super::task_assignee::Entity")]
    Assignees,

    #[sea_orm(has_many = "super::task_step::Entity")]
    Steps,

    #[sea_orm(has_many = "super::task_comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::task_attachment::Entity")]
    Attachments,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::outlet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Outlet.def()
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::task_assignee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignees.def()
    }
}

impl Related<super::task_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl Related<super::task_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::task_attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
