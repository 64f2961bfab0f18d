//! Task attachment entity - file metadata only, the bytes live elsewhere.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task_attachment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub task_id: String,

    pub file_name: String,

    #[sea_orm(nullable)]
    pub file_url: Option<String>,

    #[sea_orm(nullable)]
    pub file_type: Option<String>,

    #[sea_orm(default_value = 0)]
    pub file_size: i64,

    #[sea_orm(nullable)]
    pub uploaded_by: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::task::Entity",
        from = "Column::TaskId",
        to = "super::task::Column::Id",
        on_delete = "Cascade"
    )]
    Task,

    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::UploadedBy",
        to = "super::user_profile::Column::Id",
        on_delete = "SetNull"
    )]
    Uploader,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
