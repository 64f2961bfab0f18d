//! Create task_attachment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TaskAttachment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskAttachment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TaskAttachment::TaskId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaskAttachment::FileName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaskAttachment::FileUrl).text())
                    .col(ColumnDef::new(TaskAttachment::FileType).string_len(50))
                    .col(
                        ColumnDef::new(TaskAttachment::FileSize)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(TaskAttachment::UploadedBy).string_len(32))
                    .col(
                        ColumnDef::new(TaskAttachment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_attachment_task")
                            .from(TaskAttachment::Table, TaskAttachment::TaskId)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_attachment_uploader")
                            .from(TaskAttachment::Table, TaskAttachment::UploadedBy)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_task_attachment_task_id")
                    .table(TaskAttachment::Table)
                    .col(TaskAttachment::TaskId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskAttachment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TaskAttachment {
    Table,
    Id,
    TaskId,
    FileName,
    FileUrl,
    FileType,
    FileSize,
    UploadedBy,
    CreatedAt,
}

#[derive(Iden)]
enum Task {
    Table,
    Id,
}

#[derive(Iden)]
enum UserProfile {
    Table,
    Id,
}
