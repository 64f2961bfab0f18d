//! Form definitions and responses.

use chrono::Utc;
use sea_orm::Set;
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::activity_log::ActivityAction;
use opsboard_db::entities::form::{self, FormStatus};
use opsboard_db::entities::form_response::{self, ResponseStatus};
use opsboard_db::entities::notification::{NotificationPriority, NotificationType};
use opsboard_db::repositories::{FormFilter, FormRepository, UserProfileRepository};

use crate::services::access::{perms, AccessService};
use crate::services::activity::ActivityLogService;
use crate::services::context::RequestContext;
use crate::services::notification::{NotificationService, NotifyInput};

/// Input for creating or updating a form.
#[derive(Debug, Clone, Validate, serde::Deserialize)]
pub struct FormInput {
    /// Form name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Field definitions as a JSON document.
    pub fields_schema: serde_json::Value,
    /// Lifecycle status. Defaults to saved on create.
    pub status: Option<FormStatus>,
    /// Outlet the form belongs to.
    pub outlet_id: Option<String>,
    /// Team the form belongs to.
    pub team_id: Option<String>,
    /// Profiles the form is distributed to.
    #[serde(default)]
    pub assignee_ids: Vec<String>,
}

/// Form service.
#[derive(Clone)]
pub struct FormService {
    form_repo: FormRepository,
    profile_repo: UserProfileRepository,
    access: AccessService,
    activity: ActivityLogService,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl FormService {
    /// Create a new form service.
    #[must_use]
    pub const fn new(
        form_repo: FormRepository,
        profile_repo: UserProfileRepository,
        access: AccessService,
        activity: ActivityLogService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            form_repo,
            profile_repo,
            access,
            activity,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Non-trashed forms of the context's organization.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        mut filter: FormFilter,
    ) -> AppResult<Vec<form::Model>> {
        self.access.require(&ctx.profile, perms::VIEW_FORMS).await?;

        if filter.outlet_id.is_none() {
            filter.outlet_id = ctx.outlet_filter();
        }
        self.form_repo.list(&ctx.organization.id, &filter).await
    }

    /// Fetch one form within the context's organization.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> AppResult<form::Model> {
        self.access.require(&ctx.profile, perms::VIEW_FORMS).await?;
        self.find_scoped(ctx, id).await
    }

    /// Create a form.
    pub async fn create(&self, ctx: &RequestContext, input: FormInput) -> AppResult<form::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_FORM)
            .await?;
        input.validate()?;

        let now = Utc::now();
        let model = form::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            outlet_id: Set(input.outlet_id.or_else(|| ctx.outlet_filter())),
            team_id: Set(input.team_id),
            name: Set(input.name),
            description: Set(input.description),
            status: Set(input.status.unwrap_or_default()),
            fields_schema: Set(input.fields_schema),
            created_by: Set(Some(ctx.profile.id.clone())),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = self.form_repo.create(model).await?;

        if !input.assignee_ids.is_empty() {
            self.replace_assignees(ctx, &created, input.assignee_ids)
                .await?;
        }

        self.activity
            .record(
                ctx,
                ActivityAction::Created,
                "form",
                Some(&created.id),
                Some(&created.name),
                None,
            )
            .await;

        Ok(created)
    }

    /// Update a form definition.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: FormInput,
    ) -> AppResult<form::Model> {
        self.access.require(&ctx.profile, perms::EDIT_FORM).await?;
        input.validate()?;

        let existing = self.find_scoped(ctx, id).await?;
        let mut active: form::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.fields_schema = Set(input.fields_schema);
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if input.outlet_id.is_some() {
            active.outlet_id = Set(input.outlet_id);
        }
        if input.team_id.is_some() {
            active.team_id = Set(input.team_id);
        }
        active.updated_at = Set(Utc::now().into());
        let updated = self.form_repo.update(active).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Updated,
                "form",
                Some(&updated.id),
                Some(&updated.name),
                None,
            )
            .await;

        Ok(updated)
    }

    /// Publish a saved form so assignees can respond.
    pub async fn publish(&self, ctx: &RequestContext, id: &str) -> AppResult<form::Model> {
        self.access.require(&ctx.profile, perms::EDIT_FORM).await?;

        let existing = self.find_scoped(ctx, id).await?;
        let mut active: form::ActiveModel = existing.into();
        active.status = Set(FormStatus::Published);
        active.updated_at = Set(Utc::now().into());
        self.form_repo.update(active).await
    }

    /// Move a form to the trash. Trashed forms disappear from lists but
    /// keep their responses.
    pub async fn soft_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_FORM)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        let name = existing.name.clone();
        let mut active: form::ActiveModel = existing.into();
        active.status = Set(FormStatus::Trashed);
        active.updated_at = Set(Utc::now().into());
        let updated = self.form_repo.update(active).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Trashed,
                "form",
                Some(&updated.id),
                Some(&name),
                None,
            )
            .await;

        Ok(())
    }

    /// Permanently delete a form and, via the foreign key, its responses.
    pub async fn hard_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_FORM)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        self.form_repo.delete(&existing.id).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Deleted,
                "form",
                Some(&existing.id),
                Some(&existing.name),
                None,
            )
            .await;

        Ok(())
    }

    /// Replace the assignee set.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        id: &str,
        profile_ids: Vec<String>,
    ) -> AppResult<()> {
        self.access.require(&ctx.profile, perms::EDIT_FORM).await?;

        let form = self.find_scoped(ctx, id).await?;
        self.replace_assignees(ctx, &form, profile_ids).await?;
        Ok(())
    }

    // --- responses ---

    /// Responses to a form.
    pub async fn responses(
        &self,
        ctx: &RequestContext,
        form_id: &str,
    ) -> AppResult<Vec<form_response::Model>> {
        self.access.require(&ctx.profile, perms::VIEW_FORMS).await?;

        let form = self.find_scoped(ctx, form_id).await?;
        self.form_repo.list_responses(&form.id).await
    }

    /// Submit a response to a published form, notifying the form's
    /// creator.
    pub async fn submit_response(
        &self,
        ctx: &RequestContext,
        form_id: &str,
        data: serde_json::Value,
    ) -> AppResult<form_response::Model> {
        self.access.require(&ctx.profile, perms::VIEW_FORMS).await?;

        let form = self.find_scoped(ctx, form_id).await?;
        if form.status != FormStatus::Published {
            return Err(AppError::Validation(
                "form is not accepting responses".to_string(),
            ));
        }

        let now = Utc::now();
        let model = form_response::ActiveModel {
            id: Set(self.id_gen.generate()),
            form_id: Set(form.id.clone()),
            submitted_by: Set(Some(ctx.profile.id.clone())),
            data: Set(data),
            status: Set(ResponseStatus::Submitted),
            submitted_at: Set(Some(now.into())),
            created_at: Set(now.into()),
        };
        let response = self.form_repo.add_response(model).await?;

        if let Some(creator) = &form.created_by {
            if *creator != ctx.profile.id {
                self.notifications
                    .notify(NotifyInput {
                        recipient_id: creator.clone(),
                        organization_id: ctx.organization.id.clone(),
                        notification_type: NotificationType::FormResponse,
                        priority: NotificationPriority::Normal,
                        title: "New form response".to_string(),
                        message: format!(
                            "{} responded to '{}'",
                            ctx.profile.full_name, form.name
                        ),
                        link: Some(format!("/forms/{}", form.id)),
                        entity_type: Some("form".to_string()),
                        entity_id: Some(form.id.clone()),
                    })
                    .await?;
            }
        }

        Ok(response)
    }

    /// Mark a response as reviewed.
    pub async fn review_response(
        &self,
        ctx: &RequestContext,
        form_id: &str,
        response_id: &str,
    ) -> AppResult<form_response::Model> {
        self.access.require(&ctx.profile, perms::EDIT_FORM).await?;

        let form = self.find_scoped(ctx, form_id).await?;
        let response = self
            .form_repo
            .find_response(response_id)
            .await?
            .filter(|r| r.form_id == form.id)
            .ok_or_else(|| AppError::NotFound("response not found".to_string()))?;

        let mut active: form_response::ActiveModel = response.into();
        active.status = Set(ResponseStatus::Reviewed);
        self.form_repo.update_response(active).await
    }

    async fn find_scoped(&self, ctx: &RequestContext, id: &str) -> AppResult<form::Model> {
        self.form_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("form not found".to_string()))
    }

    async fn replace_assignees(
        &self,
        ctx: &RequestContext,
        form: &form::Model,
        profile_ids: Vec<String>,
    ) -> AppResult<()> {
        let members = self
            .profile_repo
            .find_many_in_org(&profile_ids, &ctx.organization.id)
            .await?;
        if members.len() != profile_ids.len() {
            return Err(AppError::Validation(
                "one or more assignees are not in this organization".to_string(),
            ));
        }

        let previous = self.form_repo.assignee_ids(&form.id).await?;
        self.form_repo.set_assignees(&form.id, &profile_ids).await?;

        for pid in &profile_ids {
            if previous.contains(pid) || *pid == ctx.profile.id {
                continue;
            }
            self.notifications
                .notify(NotifyInput {
                    recipient_id: pid.clone(),
                    organization_id: ctx.organization.id.clone(),
                    notification_type: NotificationType::System,
                    priority: NotificationPriority::Normal,
                    title: "Form assigned".to_string(),
                    message: format!("Please fill in '{}'", form.name),
                    link: Some(format!("/forms/{}", form.id)),
                    entity_type: Some("form".to_string()),
                    entity_id: Some(form.id.clone()),
                })
                .await?;
        }
        Ok(())
    }
}
