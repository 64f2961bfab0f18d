//! Create issue and issue_assignee tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Issue::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Issue::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Issue::OrganizationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Issue::OutletId).string_len(32))
                    .col(ColumnDef::new(Issue::TeamId).string_len(32))
                    .col(ColumnDef::new(Issue::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Issue::Description).text())
                    .col(
                        ColumnDef::new(Issue::Status)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(Issue::Priority)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(Issue::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Issue::Tags).string_len(512))
                    .col(ColumnDef::new(Issue::CreatedBy).string_len(32))
                    .col(
                        ColumnDef::new(Issue::IsTrashed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Issue::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Issue::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_organization")
                            .from(Issue::Table, Issue::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_outlet")
                            .from(Issue::Table, Issue::OutletId)
                            .to(Outlet::Table, Outlet::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_team")
                            .from(Issue::Table, Issue::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issue_org_trashed")
                    .table(Issue::Table)
                    .col(Issue::OrganizationId)
                    .col(Issue::IsTrashed)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IssueAssignee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IssueAssignee::IssueId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IssueAssignee::ProfileId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(IssueAssignee::IssueId)
                            .col(IssueAssignee::ProfileId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_assignee_issue")
                            .from(IssueAssignee::Table, IssueAssignee::IssueId)
                            .to(Issue::Table, Issue::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_assignee_profile")
                            .from(IssueAssignee::Table, IssueAssignee::ProfileId)
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
            .drop_table(Table::drop().table(IssueAssignee::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Issue::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Issue {
    Table,
    Id,
    OrganizationId,
    OutletId,
    TeamId,
    Title,
    Description,
    Status,
    Priority,
    ResolvedAt,
    Tags,
    CreatedBy,
    IsTrashed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum IssueAssignee {
    Table,
    IssueId,
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
enum Team {
    Table,
    Id,
}

#[derive(Iden)]
enum UserProfile {
    Table,
    Id,
}
