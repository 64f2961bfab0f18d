//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_organization_table;
mod m20250101_000002_create_outlet_table;
mod m20250101_000003_create_team_table;
mod m20250101_000004_create_permission_table;
mod m20250101_000005_create_role_tables;
mod m20250101_000006_create_user_profile_table;
mod m20250101_000007_create_session_table;
mod m20250101_000008_create_project_tables;
mod m20250101_000009_create_task_tables;
mod m20250101_000010_create_issue_tables;
mod m20250101_000011_create_form_tables;
mod m20250101_000012_create_template_tables;
mod m20250101_000013_create_activity_log_table;
mod m20250101_000014_create_notification_table;
mod m20250101_000015_create_report_cache_table;
mod m20250101_000016_create_task_attachment_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_organization_table::Migration),
            Box::new(m20250101_000002_create_outlet_table::Migration),
            Box::new(m20250101_000003_create_team_table::Migration),
            Box::new(m20250101_000004_create_permission_table::Migration),
            Box::new(m20250101_000005_create_role_tables::Migration),
            Box::new(m20250101_000006_create_user_profile_table::Migration),
            Box::new(m20250101_000007_create_session_table::Migration),
            Box::new(m20250101_000008_create_project_tables::Migration),
            Box::new(m20250101_000009_create_task_tables::Migration),
            Box::new(m20250101_000010_create_issue_tables::Migration),
            Box::new(m20250101_000011_create_form_tables::Migration),
            Box::new(m20250101_000012_create_template_tables::Migration),
            Box::new(m20250101_000013_create_activity_log_table::Migration),
            Box::new(m20250101_000014_create_notification_table::Migration),
            Box::new(m20250101_000015_create_report_cache_table::Migration),
            Box::new(m20250101_000016_create_task_attachment_table::Migration),
        ]
    }
}
