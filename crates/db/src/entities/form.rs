//! Form entity - a distributable form definition.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Form lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    #[sea_orm(string_value = "saved")]
    Saved,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "trashed")]
    Trashed,
}

impl Default for FormStatus {
    fn default() -> Self {
        Self::Saved
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "form")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub organization_id: String,

    #[sea_orm(nullable)]
    pub outlet_id: Option<String>,

    #[sea_orm(nullable)]
    pub team_id: Option<String>,

    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub status: FormStatus,

    /// Field definitions as a JSON document (labels, types, options).
    #[sea_orm(column_type = "JsonBinary")]
    pub fields_schema: Json,

    #[sea_orm(nullable)]
    pub created_by: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

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

    #[sea_orm(has_many = "super::form_assignee::Entity")]
    Assignees,

    #[sea_orm(has_many = "super::form_response::Entity")]
    Responses,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::form_assignee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignees.def()
    }
}

impl Related<super::form_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
