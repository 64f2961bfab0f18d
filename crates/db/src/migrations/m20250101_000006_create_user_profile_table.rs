//! Create user_profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfile::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfile::Username)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UserProfile::Email).string_len(256))
                    .col(
                        ColumnDef::new(UserProfile::FullName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserProfile::PasswordHash).string_len(256))
                    .col(ColumnDef::new(UserProfile::EmployeeId).string_len(64))
                    .col(ColumnDef::new(UserProfile::Phone).string_len(32))
                    .col(ColumnDef::new(UserProfile::Department).string_len(128))
                    .col(ColumnDef::new(UserProfile::Designation).string_len(128))
                    .col(
                        ColumnDef::new(UserProfile::Points)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserProfile::HrData).json_binary())
                    .col(
                        ColumnDef::new(UserProfile::OrganizationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserProfile::OutletId).string_len(32))
                    .col(ColumnDef::new(UserProfile::TeamId).string_len(32))
                    .col(ColumnDef::new(UserProfile::RoleId).string_len(32))
                    .col(
                        ColumnDef::new(UserProfile::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(UserProfile::LastLoginAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(UserProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserProfile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profile_organization")
                            .from(UserProfile::Table, UserProfile::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profile_outlet")
                            .from(UserProfile::Table, UserProfile::OutletId)
                            .to(Outlet::Table, Outlet::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profile_team")
                            .from(UserProfile::Table, UserProfile::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profile_role")
                            .from(UserProfile::Table, UserProfile::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: employee_id (identity-API upsert lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_profile_employee_id")
                    .table(UserProfile::Table)
                    .col(UserProfile::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_profile_organization_id")
                    .table(UserProfile::Table)
                    .col(UserProfile::OrganizationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserProfile {
    Table,
    Id,
    Username,
    Email,
    FullName,
    PasswordHash,
    EmployeeId,
    Phone,
    Department,
    Designation,
    Points,
    HrData,
    OrganizationId,
    OutletId,
    TeamId,
    RoleId,
    IsActive,
    LastLoginAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Organization {
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
enum Role {
    Table,
    Id,
}
