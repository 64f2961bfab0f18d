//! Create form, form_assignee and form_response tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Form::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Form::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Form::OrganizationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Form::OutletId).string_len(32))
                    .col(ColumnDef::new(Form::TeamId).string_len(32))
                    .col(ColumnDef::new(Form::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Form::Description).text())
                    .col(
                        ColumnDef::new(Form::Status)
                            .string_len(20)
                            .not_null()
                            .default("saved"),
                    )
                    .col(ColumnDef::new(Form::FieldsSchema).json_binary().not_null())
                    .col(ColumnDef::new(Form::CreatedBy).string_len(32))
                    .col(
                        ColumnDef::new(Form::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Form::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Form::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_organization")
                            .from(Form::Table, Form::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_organization_id")
                    .table(Form::Table)
                    .col(Form::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FormAssignee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormAssignee::FormId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormAssignee::ProfileId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FormAssignee::FormId)
                            .col(FormAssignee::ProfileId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_assignee_form")
                            .from(FormAssignee::Table, FormAssignee::FormId)
                            .to(Form::Table, Form::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_assignee_profile")
                            .from(FormAssignee::Table, FormAssignee::ProfileId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FormResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormResponse::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FormResponse::FormId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FormResponse::SubmittedBy).string_len(32))
                    .col(ColumnDef::new(FormResponse::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(FormResponse::Status)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(FormResponse::SubmittedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(FormResponse::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_response_form")
                            .from(FormResponse::Table, FormResponse::FormId)
                            .to(Form::Table, Form::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_response_submitter")
                            .from(FormResponse::Table, FormResponse::SubmittedBy)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_response_form_id")
                    .table(FormResponse::Table)
                    .col(FormResponse::FormId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormResponse::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FormAssignee::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Form::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Form {
    Table,
    Id,
    OrganizationId,
    OutletId,
    TeamId,
    Name,
    Description,
    Status,
    FieldsSchema,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FormAssignee {
    Table,
    FormId,
    ProfileId,
}

#[derive(Iden)]
enum FormResponse {
    Table,
    Id,
    FormId,
    SubmittedBy,
    Data,
    Status,
    SubmittedAt,
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
