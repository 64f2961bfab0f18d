//! Create outlet table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Outlet::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Outlet::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Outlet::OrganizationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Outlet::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Outlet::Code).string_len(64))
                    .col(ColumnDef::new(Outlet::Address).text())
                    .col(ColumnDef::new(Outlet::Phone).string_len(32))
                    .col(ColumnDef::new(Outlet::Email).string_len(256))
                    .col(
                        ColumnDef::new(Outlet::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Outlet::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Outlet::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_outlet_organization")
                            .from(Outlet::Table, Outlet::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Name is unique within an organization.
        manager
            .create_index(
                Index::create()
                    .name("idx_outlet_org_name")
                    .table(Outlet::Table)
                    .col(Outlet::OrganizationId)
                    .col(Outlet::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Outlet::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Outlet {
    Table,
    Id,
    OrganizationId,
    Name,
    Code,
    Address,
    Phone,
    Email,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Organization {
    Table,
    Id,
}
