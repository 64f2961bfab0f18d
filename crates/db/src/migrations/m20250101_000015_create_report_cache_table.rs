//! Create report_cache table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReportCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportCache::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReportCache::CacheKey)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ReportCache::OrganizationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReportCache::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(ReportCache::GeneratedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportCache::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_cache_organization")
                            .from(ReportCache::Table, ReportCache::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: expires_at (eviction sweep)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_cache_expires_at")
                    .table(ReportCache::Table)
                    .col(ReportCache::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportCache::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReportCache {
    Table,
    Id,
    CacheKey,
    OrganizationId,
    Data,
    GeneratedAt,
    ExpiresAt,
}

#[derive(Iden)]
enum Organization {
    Table,
    Id,
}
