//! Create permission table migration and seed the catalog.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// The permission catalog, seeded once. `(id, codename, name, module)`.
const CATALOG: &[(&str, &str, &str, &str)] = &[
    ("perm_view_dashboard", "view_dashboard", "View dashboard", "dashboard"),
    ("perm_view_projects", "view_projects", "View projects", "projects"),
    ("perm_create_project", "create_project", "Create projects", "projects"),
    ("perm_edit_project", "edit_project", "Edit projects", "projects"),
    ("perm_delete_project", "delete_project", "Delete projects", "projects"),
    ("perm_view_tasks", "view_tasks", "View tasks", "tasks"),
    ("perm_create_task", "create_task", "Create tasks", "tasks"),
    ("perm_edit_task", "edit_task", "Edit tasks", "tasks"),
    (
        "perm_change_task_status",
        "change_task_status",
        "Change task status",
        "tasks",
    ),
    ("perm_delete_task", "delete_task", "Delete tasks", "tasks"),
    ("perm_view_issues", "view_issues", "View issues", "issues"),
    ("perm_create_issue", "create_issue", "Create issues", "issues"),
    ("perm_edit_issue", "edit_issue", "Edit issues", "issues"),
    ("perm_delete_issue", "delete_issue", "Delete issues", "issues"),
    ("perm_view_templates", "view_templates", "View templates", "templates"),
    (
        "perm_create_template",
        "create_template",
        "Create templates",
        "templates",
    ),
    ("perm_edit_template", "edit_template", "Edit templates", "templates"),
    (
        "perm_delete_template",
        "delete_template",
        "Delete templates",
        "templates",
    ),
    ("perm_view_reports", "view_reports", "View reports", "reports"),
    ("perm_view_forms", "view_forms", "View forms", "forms"),
    ("perm_create_form", "create_form", "Create forms", "forms"),
    ("perm_edit_form", "edit_form", "Edit forms", "forms"),
    ("perm_delete_form", "delete_form", "Delete forms", "forms"),
    ("perm_view_users", "view_users", "View users", "users"),
    ("perm_create_user", "create_user", "Create users", "users"),
    ("perm_edit_user", "edit_user", "Edit users", "users"),
    ("perm_view_roles", "view_roles", "View roles", "roles"),
    ("perm_create_role", "create_role", "Create roles", "roles"),
    ("perm_manage_outlets", "manage_outlets", "Manage outlets", "outlets"),
    ("perm_use_assist", "use_assist", "Use the assistant", "assist"),
    ("perm_manage_settings", "manage_settings", "Manage settings", "settings"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Permission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Permission::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Permission::Codename)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Permission::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Permission::Description).text())
                    .col(ColumnDef::new(Permission::Module).string_len(32).not_null())
                    .to_owned(),
            )
            .await?;

        for (id, codename, name, module) in CATALOG {
            let insert = Query::insert()
                .into_table(Permission::Table)
                .columns([
                    Permission::Id,
                    Permission::Codename,
                    Permission::Name,
                    Permission::Module,
                ])
                .values_panic([(*id).into(), (*codename).into(), (*name).into(), (*module).into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Permission::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Permission {
    Table,
    Id,
    Codename,
    Name,
    Description,
    Module,
}
