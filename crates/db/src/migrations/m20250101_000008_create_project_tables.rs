//! Create project and project_member tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Project::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Project::OrganizationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Project::OutletId).string_len(32))
                    .col(ColumnDef::new(Project::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Project::Description).text())
                    .col(
                        ColumnDef::new(Project::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Project::StartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Project::EndDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Project::CreatedBy).string_len(32))
                    .col(
                        ColumnDef::new(Project::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Project::IsTrashed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Project::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Project::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_organization")
                            .from(Project::Table, Project::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_outlet")
                            .from(Project::Table, Project::OutletId)
                            .to(Outlet::Table, Outlet::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_organization_id")
                    .table(Project::Table)
                    .col(Project::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectMember::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectMember::ProjectId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectMember::ProfileId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProjectMember::ProjectId)
                            .col(ProjectMember::ProfileId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_member_project")
                            .from(ProjectMember::Table, ProjectMember::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_member_profile")
                            .from(ProjectMember::Table, ProjectMember::ProfileId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectMember::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Project {
    Table,
    Id,
    OrganizationId,
    OutletId,
    Name,
    Description,
    Status,
    StartDate,
    EndDate,
    CreatedBy,
    IsActive,
    IsTrashed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProjectMember {
    Table,
    ProjectId,
    ProfileId,
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
enum UserProfile {
    Table,
    Id,
}
