//! Report cache entity - short-TTL store for aggregate reads.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One cached aggregate payload. Never consulted for permission or
/// ownership decisions.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report_cache")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Deterministic key built from report kind, org, and filters.
    #[sea_orm(unique)]
    pub cache_key: String,

    #[sea_orm(indexed)]
    pub organization_id: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,

    pub generated_at: DateTimeWithTimeZone,

    #[sea_orm(indexed)]
    pub expires_at: DateTimeWithTimeZone,
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
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
