//! Issue entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::task::Priority;

/// Issue lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "ignored")]
    Ignored,
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl Default for IssueStatus {
    fn default() -> Self {
        Self::Open
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issue")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub organization_id: String,

    #[sea_orm(nullable)]
    pub outlet_id: Option<String>,

    #[sea_orm(nullable)]
    pub team_id: Option<String>,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub status: IssueStatus,

    pub priority: Priority,

    /// Stamped on the first transition into `resolved`, then frozen.
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,

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

    #[sea_orm(has_many = "super::issue_assignee::Entity")]
    Assignees,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
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

impl Related<super::issue_assignee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
