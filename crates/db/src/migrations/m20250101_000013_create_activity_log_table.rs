//! Create activity_log table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActivityLog::OrganizationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivityLog::ActorId).string_len(32))
                    .col(ColumnDef::new(ActivityLog::Action).string_len(20).not_null())
                    .col(
                        ColumnDef::new(ActivityLog::EntityType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivityLog::EntityId).string_len(32))
                    .col(ColumnDef::new(ActivityLog::EntityName).string_len(512))
                    .col(ColumnDef::new(ActivityLog::Details).text())
                    .col(
                        ColumnDef::new(ActivityLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_log_organization")
                            .from(ActivityLog::Table, ActivityLog::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_log_actor")
                            .from(ActivityLog::Table, ActivityLog::ActorId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (organization_id, created_at) for the recent-activity feed
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_log_org_created_at")
                    .table(ActivityLog::Table)
                    .col(ActivityLog::OrganizationId)
                    .col(ActivityLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ActivityLog {
    Table,
    Id,
    OrganizationId,
    ActorId,
    Action,
    EntityType,
    EntityId,
    EntityName,
    Details,
    CreatedAt,
}

#[derive(Iden)]
enum Organization {
    Table,
    Id,
}

#[derive(Iden)]
enum UserProfile {
    Table,
    Id,
}
