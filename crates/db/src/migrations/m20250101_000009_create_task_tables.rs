//! Create task, task_assignee, task_step and task_comment tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Task::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Task::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Task::OrganizationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Task::ProjectId).string_len(32))
                    .col(ColumnDef::new(Task::OutletId).string_len(32))
                    .col(ColumnDef::new(Task::TeamId).string_len(32))
                    .col(ColumnDef::new(Task::ParentId).string_len(32))
                    .col(ColumnDef::new(Task::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Task::Description).text())
                    .col(ColumnDef::new(Task::SopContent).text())
                    .col(
                        ColumnDef::new(Task::TaskType)
                            .string_len(20)
                            .not_null()
                            .default("single"),
                    )
                    .col(
                        ColumnDef::new(Task::Status)
                            .string_len(20)
                            .not_null()
                            .default("todo"),
                    )
                    .col(
                        ColumnDef::new(Task::Priority)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(Task::Category).string_len(128))
                    .col(ColumnDef::new(Task::StartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Task::DueDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Task::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Task::Points).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Task::Recurrence)
                            .string_len(20)
                            .not_null()
                            .default("none"),
                    )
                    .col(ColumnDef::new(Task::RecurrenceDetails).json_binary())
                    .col(ColumnDef::new(Task::RecurrenceSourceId).string_len(32))
                    .col(
                        ColumnDef::new(Task::NeedsApproval)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Task::IsStarred)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Task::AssistSummary).text())
                    .col(ColumnDef::new(Task::AssistPriorityHint).string_len(20))
                    .col(ColumnDef::new(Task::Tags).string_len(512))
                    .col(ColumnDef::new(Task::CreatedBy).string_len(32))
                    .col(
                        ColumnDef::new(Task::IsTrashed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Task::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Task::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_organization")
                            .from(Task::Table, Task::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_project")
                            .from(Task::Table, Task::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_outlet")
                            .from(Task::Table, Task::OutletId)
                            .to(Outlet::Table, Outlet::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_team")
                            .from(Task::Table, Task::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_parent")
                            .from(Task::Table, Task::ParentId)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (organization_id, is_trashed) for list queries
        manager
            .create_index(
                Index::create()
                    .name("idx_task_org_trashed")
                    .table(Task::Table)
                    .col(Task::OrganizationId)
                    .col(Task::IsTrashed)
                    .to_owned(),
            )
            .await?;

        // Index: due_date (overdue sweep)
        manager
            .create_index(
                Index::create()
                    .name("idx_task_due_date")
                    .table(Task::Table)
                    .col(Task::DueDate)
                    .to_owned(),
            )
            .await?;

        // Index: recurrence_source_id (spawn idempotence check)
        manager
            .create_index(
                Index::create()
                    .name("idx_task_recurrence_source_id")
                    .table(Task::Table)
                    .col(Task::RecurrenceSourceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaskAssignee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskAssignee::TaskId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaskAssignee::ProfileId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(TaskAssignee::TaskId)
                            .col(TaskAssignee::ProfileId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_assignee_task")
                            .from(TaskAssignee::Table, TaskAssignee::TaskId)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_assignee_profile")
                            .from(TaskAssignee::Table, TaskAssignee::ProfileId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaskStep::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskStep::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TaskStep::TaskId).string_len(32).not_null())
                    .col(ColumnDef::new(TaskStep::Title).string_len(512).not_null())
                    .col(
                        ColumnDef::new(TaskStep::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TaskStep::IsCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TaskStep::CompletedBy).string_len(32))
                    .col(ColumnDef::new(TaskStep::CompletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_step_task")
                            .from(TaskStep::Table, TaskStep::TaskId)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_task_step_task_id")
                    .table(TaskStep::Table)
                    .col(TaskStep::TaskId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaskComment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskComment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TaskComment::TaskId).string_len(32).not_null())
                    .col(ColumnDef::new(TaskComment::AuthorId).string_len(32))
                    .col(ColumnDef::new(TaskComment::Body).text().not_null())
                    .col(
                        ColumnDef::new(TaskComment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_comment_task")
                            .from(TaskComment::Table, TaskComment::TaskId)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_comment_author")
                            .from(TaskComment::Table, TaskComment::AuthorId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_task_comment_task_id")
                    .table(TaskComment::Table)
                    .col(TaskComment::TaskId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskComment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskStep::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskAssignee::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Task::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Task {
    Table,
    Id,
    OrganizationId,
    ProjectId,
    OutletId,
    TeamId,
    ParentId,
    Title,
    Description,
    SopContent,
    TaskType,
    Status,
    Priority,
    Category,
    StartDate,
    DueDate,
    CompletedAt,
    Points,
    Recurrence,
    RecurrenceDetails,
    RecurrenceSourceId,
    NeedsApproval,
    IsStarred,
    AssistSummary,
    AssistPriorityHint,
    Tags,
    CreatedBy,
    IsTrashed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TaskAssignee {
    Table,
    TaskId,
    ProfileId,
}

#[derive(Iden)]
enum TaskStep {
    Table,
    Id,
    TaskId,
    Title,
    Position,
    IsCompleted,
    CompletedBy,
    CompletedAt,
}

#[derive(Iden)]
enum TaskComment {
    Table,
    Id,
    TaskId,
    AuthorId,
    Body,
    CreatedAt,
}

#[derive(Iden)]
enum Organization {
    Table,
    Id,
}

#[derive(Iden)]
enum Project {
    Table,
    Id,
}

#[derive(Iden)]
enum Outlet {
    Table,
    Id,
}

#[derive(Iden)]
enum Team {
    Table,
    Id,
}

#[derive(Iden)]
enum UserProfile {
    Table,
    Id,
}
