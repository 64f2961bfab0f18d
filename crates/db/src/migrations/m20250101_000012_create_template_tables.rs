//! Create task_template and template_subtask tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TaskTemplate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskTemplate::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TaskTemplate::OrganizationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaskTemplate::Name).string_len(256).not_null())
                    .col(ColumnDef::new(TaskTemplate::Description).text())
                    .col(
                        ColumnDef::new(TaskTemplate::Priority)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(TaskTemplate::Recurrence)
                            .string_len(20)
                            .not_null()
                            .default("none"),
                    )
                    .col(ColumnDef::new(TaskTemplate::RecurrenceDetails).json_binary())
                    .col(ColumnDef::new(TaskTemplate::Category).string_len(128))
                    .col(ColumnDef::new(TaskTemplate::CreatedBy).string_len(32))
                    .col(
                        ColumnDef::new(TaskTemplate::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TaskTemplate::IsTrashed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TaskTemplate::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TaskTemplate::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_template_organization")
                            .from(TaskTemplate::Table, TaskTemplate::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TemplateSubtask::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TemplateSubtask::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TemplateSubtask::TemplateId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemplateSubtask::Title)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemplateSubtask::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_template_subtask_template")
                            .from(TemplateSubtask::Table, TemplateSubtask::TemplateId)
                            .to(TaskTemplate::Table, TaskTemplate::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_template_subtask_template_id")
                    .table(TemplateSubtask::Table)
                    .col(TemplateSubtask::TemplateId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TemplateSubtask::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskTemplate::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TaskTemplate {
    Table,
    Id,
    OrganizationId,
    Name,
    Description,
    Priority,
    Recurrence,
    RecurrenceDetails,
    Category,
    CreatedBy,
    IsActive,
    IsTrashed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TemplateSubtask {
    Table,
    Id,
    TemplateId,
    Title,
    Position,
}

#[derive(Iden)]
enum Organization {
    Table,
    Id,
}
