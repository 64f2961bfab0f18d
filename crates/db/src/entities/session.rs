//! Session entity - bearer-token sessions carrying the working context.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A login session. The token is the primary key; the row stores which
/// organization and outlet the user is currently working in.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session")]
pub struct Model {
    /// Opaque session token handed to the client.
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,

    #[sea_orm(indexed)]
    pub profile_id: String,

    /// Selected organization. May lag behind the profile's home org for
    /// sessions created before the profile was assigned one.
    #[sea_orm(nullable)]
    pub organization_id: Option<String>,

    /// Selected outlet. Null means "all outlets".
    #[sea_orm(nullable)]
    pub outlet_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::ProfileId",
        to = "super::user_profile::Column::Id",
        on_delete = "Cascade"
    )]
    Profile,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
