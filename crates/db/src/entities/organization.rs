//! Organization entity - the tenant boundary.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Organization entity. Every other row in the system belongs to exactly
/// one organization, fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name (unique).
    #[sea_orm(unique)]
    pub name: String,

    /// Short code (unique), used by the identity API payloads.
    #[sea_orm(unique)]
    pub code: String,

    /// Contact fields.
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub email: Option<String>,

    #[sea_orm(nullable)]
    pub website: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::outlet::Entity")]
    Outlets,

    #[sea_orm(has_many = "super::team::Entity")]
    Teams,

    #[sea_orm(has_many = "super::user_profile::Entity")]
    Members,
}

impl Related<super::outlet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Outlets.def()
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
