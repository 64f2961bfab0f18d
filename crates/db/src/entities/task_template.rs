//! Task template entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::task::{Priority, Recurrence};

/// A reusable recipe for creating tasks with predefined subtasks.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task_template")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub organization_id: String,

    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub priority: Priority,

    pub recurrence: Recurrence,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub recurrence_details: Option<Json>,

    #[sea_orm(nullable)]
    pub category: Option<String>,

    #[sea_orm(nullable)]
    pub created_by: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

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

    #[sea_orm(has_many = "super::template_subtask::Entity")]
    Subtasks,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::template_subtask::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subtasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
