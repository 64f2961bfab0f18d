//! Activity log entity - append-only audit trail.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What the actor did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    #[sea_orm(string_value = "created")]
    Created,
    #[sea_orm(string_value = "updated")]
    Updated,
    #[sea_orm(string_value = "deleted")]
    Deleted,
    #[sea_orm(string_value = "status_changed")]
    StatusChanged,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "commented")]
    Commented,
    #[sea_orm(string_value = "trashed")]
    Trashed,
    #[sea_orm(string_value = "login")]
    Login,
    #[sea_orm(string_value = "logout")]
    Logout,
}

/// One audit row. Rows are only ever inserted; the application never
/// updates or deletes them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub organization_id: String,

    /// Acting profile. Kept nullable so deleting a profile preserves
    /// the trail.
    #[sea_orm(nullable)]
    pub actor_id: Option<String>,

    pub action: ActivityAction,

    /// Kind of entity acted on, e.g. `task`, `issue`.
    pub entity_type: String,

    #[sea_orm(nullable)]
    pub entity_id: Option<String>,

    /// Snapshot of the entity's display name at the time of the action.
    #[sea_orm(nullable)]
    pub entity_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,

    pub created_at: DateTimeWithTimeZone,
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
        belongs_to = "super::user_profile::Entity",
        from = "Column::ActorId",
        to = "super::user_profile::Column::Id",
        on_delete = "SetNull"
    )]
    Actor,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Actor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
