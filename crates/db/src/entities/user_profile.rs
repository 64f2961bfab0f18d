//! User profile entity - the authenticated principal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(nullable)]
    pub email: Option<String>,

    pub full_name: String,

    /// Argon2 hash. Null for accounts provisioned from the identity API
    /// that have never set a local password.
    #[sea_orm(nullable)]
    pub password_hash: Option<String>,

    /// Employee id from the HR identity API, when the account came from it.
    #[sea_orm(indexed, nullable)]
    pub employee_id: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub department: Option<String>,

    #[sea_orm(nullable)]
    pub designation: Option<String>,

    /// Gamification points accumulated from completed tasks.
    #[sea_orm(default_value = 0)]
    pub points: i32,

    /// Raw payload stored from the last identity-API login.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub hr_data: Option<Json>,

    /// Home organization.
    #[sea_orm(indexed)]
    pub organization_id: String,

    #[sea_orm(nullable)]
    pub outlet_id: Option<String>,

    #[sea_orm(nullable)]
    pub team_id: Option<String>,

    #[sea_orm(nullable)]
    pub role_id: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(nullable)]
    pub last_login_at: Option<DateTimeWithTimeZone>,

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

    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id",
        on_delete = "SetNull"
    )]
    Role,
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

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
