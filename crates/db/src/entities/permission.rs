//! Permission entity - the global permission catalog.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Feature area a permission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PermissionModule {
    #[sea_orm(string_value = "dashboard")]
    Dashboard,
    #[sea_orm(string_value = "projects")]
    Projects,
    #[sea_orm(string_value = "tasks")]
    Tasks,
    #[sea_orm(string_value = "issues")]
    Issues,
    #[sea_orm(string_value = "templates")]
    Templates,
    #[sea_orm(string_value = "reports")]
    Reports,
    #[sea_orm(string_value = "forms")]
    Forms,
    #[sea_orm(string_value = "users")]
    Users,
    #[sea_orm(string_value = "roles")]
    Roles,
    #[sea_orm(string_value = "outlets")]
    Outlets,
    #[sea_orm(string_value = "assist")]
    Assist,
    #[sea_orm(string_value = "settings")]
    Settings,
}

/// A single grantable permission. The catalog is global (not per-org) and
/// seeded by migration; roles reference rows here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Machine name checked by services, e.g. `create_task`.
    #[sea_orm(unique)]
    pub codename: String,

    /// Human-readable name.
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub module: PermissionModule,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
