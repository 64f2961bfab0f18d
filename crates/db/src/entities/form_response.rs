//! Form response entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Response review state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "reviewed")]
    Reviewed,
}

impl Default for ResponseStatus {
    fn default() -> Self {
        Self::Open
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "form_response")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub form_id: String,

    #[sea_orm(nullable)]
    pub submitted_by: Option<String>,

    /// Answers keyed by field name.
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,

    pub status: ResponseStatus,

    #[sea_orm(nullable)]
    pub submitted_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::form::Entity",
        from = "Column::FormId",
        to = "super::form::Column::Id",
        on_delete = "Cascade"
    )]
    Form,

    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::SubmittedBy",
        to = "super::user_profile::Column::Id",
        on_delete = "SetNull"
    )]
    Submitter,
}

impl Related<super::form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submitter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
