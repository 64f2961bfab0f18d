//! Project lifecycle and membership.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveEnum, Set};
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::activity_log::ActivityAction;
use opsboard_db::entities::notification::{NotificationPriority, NotificationType};
use opsboard_db::entities::project::{self, ProjectStatus};
use opsboard_db::repositories::{ProjectFilter, ProjectRepository, UserProfileRepository};

use crate::services::access::{perms, AccessService};
use crate::services::activity::ActivityLogService;
use crate::services::context::RequestContext;
use crate::services::notification::{NotificationService, NotifyInput};

/// Input for creating or updating a project.
#[derive(Debug, Clone, Validate, serde::Deserialize)]
pub struct ProjectInput {
    /// Project name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Lifecycle status. Defaults to active on create.
    pub status: Option<ProjectStatus>,
    /// Outlet the project belongs to.
    pub outlet_id: Option<String>,
    /// Planned start.
    pub start_date: Option<DateTime<Utc>>,
    /// Planned end.
    pub end_date: Option<DateTime<Utc>>,
}

/// Project service.
#[derive(Clone)]
pub struct ProjectService {
    project_repo: ProjectRepository,
    profile_repo: UserProfileRepository,
    access: AccessService,
    activity: ActivityLogService,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl ProjectService {
    /// Create a new project service.
    #[must_use]
    pub const fn new(
        project_repo: ProjectRepository,
        profile_repo: UserProfileRepository,
        access: AccessService,
        activity: ActivityLogService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            project_repo,
            profile_repo,
            access,
            activity,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Non-trashed projects of the context's organization.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        mut filter: ProjectFilter,
    ) -> AppResult<Vec<project::Model>> {
        self.access
            .require(&ctx.profile, perms::VIEW_PROJECTS)
            .await?;

        if filter.outlet_id.is_none() {
            filter.outlet_id = ctx.outlet_filter();
        }
        self.project_repo.list(&ctx.organization.id, &filter).await
    }

    /// Fetch one project within the context's organization.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> AppResult<project::Model> {
        self.access
            .require(&ctx.profile, perms::VIEW_PROJECTS)
            .await?;
        self.find_scoped(ctx, id).await
    }

    /// Member profile ids of a project.
    pub async fn members(&self, ctx: &RequestContext, id: &str) -> AppResult<Vec<String>> {
        self.access
            .require(&ctx.profile, perms::VIEW_PROJECTS)
            .await?;
        let project = self.find_scoped(ctx, id).await?;
        self.project_repo.member_ids(&project.id).await
    }

    /// Create a project.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: ProjectInput,
    ) -> AppResult<project::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_PROJECT)
            .await?;
        input.validate()?;

        let now = Utc::now();
        let model = project::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            outlet_id: Set(input.outlet_id.or_else(|| ctx.outlet_filter())),
            name: Set(input.name),
            description: Set(input.description),
            status: Set(input.status.unwrap_or_default()),
            start_date: Set(input.start_date.map(Into::into)),
            end_date: Set(input.end_date.map(Into::into)),
            created_by: Set(Some(ctx.profile.id.clone())),
            is_active: Set(true),
            is_trashed: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = self.project_repo.create(model).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Created,
                "project",
                Some(&created.id),
                Some(&created.name),
                None,
            )
            .await;

        Ok(created)
    }

    /// Update a project, recording a status change when the status moves.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: ProjectInput,
    ) -> AppResult<project::Model> {
        self.access
            .require(&ctx.profile, perms::EDIT_PROJECT)
            .await?;
        input.validate()?;

        let existing = self.find_scoped(ctx, id).await?;
        let old_status = existing.status;

        let mut active: project::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if input.outlet_id.is_some() {
            active.outlet_id = Set(input.outlet_id);
        }
        active.start_date = Set(input.start_date.map(Into::into));
        active.end_date = Set(input.end_date.map(Into::into));
        active.updated_at = Set(Utc::now().into());

        let updated = self.project_repo.update(active).await?;

        if updated.status == old_status {
            self.activity
                .record(
                    ctx,
                    ActivityAction::Updated,
                    "project",
                    Some(&updated.id),
                    Some(&updated.name),
                    None,
                )
                .await;
        } else {
            self.activity
                .record(
                    ctx,
                    ActivityAction::StatusChanged,
                    "project",
                    Some(&updated.id),
                    Some(&updated.name),
                    Some(format!(
                        "{} → {}",
                        old_status.to_value(),
                        updated.status.to_value()
                    )),
                )
                .await;
        }

        Ok(updated)
    }

    /// Replace the member set, notifying newly added members.
    pub async fn set_members(
        &self,
        ctx: &RequestContext,
        id: &str,
        profile_ids: Vec<String>,
    ) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::EDIT_PROJECT)
            .await?;

        let project = self.find_scoped(ctx, id).await?;

        let members = self
            .profile_repo
            .find_many_in_org(&profile_ids, &ctx.organization.id)
            .await?;
        if members.len() != profile_ids.len() {
            return Err(AppError::Validation(
                "one or more members are not in this organization".to_string(),
            ));
        }

        let previous = self.project_repo.member_ids(&project.id).await?;
        self.project_repo
            .set_members(&project.id, &profile_ids)
            .await?;

        for pid in &profile_ids {
            if previous.contains(pid) || *pid == ctx.profile.id {
                continue;
            }
            self.notifications
                .notify(NotifyInput {
                    recipient_id: pid.clone(),
                    organization_id: ctx.organization.id.clone(),
                    notification_type: NotificationType::ProjectUpdate,
                    priority: NotificationPriority::Normal,
                    title: "Added to project".to_string(),
                    message: format!("You were added to '{}'", project.name),
                    link: Some(format!("/projects/{}", project.id)),
                    entity_type: Some("project".to_string()),
                    entity_id: Some(project.id.clone()),
                })
                .await?;
        }

        self.activity
            .record(
                ctx,
                ActivityAction::Assigned,
                "project",
                Some(&project.id),
                Some(&project.name),
                None,
            )
            .await;

        Ok(())
    }

    /// Move a project to the trash. Its tasks are untouched.
    pub async fn soft_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_PROJECT)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        let name = existing.name.clone();
        let mut active: project::ActiveModel = existing.into();
        active.is_trashed = Set(true);
        active.updated_at = Set(Utc::now().into());
        let updated = self.project_repo.update(active).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Trashed,
                "project",
                Some(&updated.id),
                Some(&name),
                None,
            )
            .await;

        Ok(())
    }

    /// Permanently delete a project.
    pub async fn hard_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_PROJECT)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        self.project_repo.delete(&existing.id).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Deleted,
                "project",
                Some(&existing.id),
                Some(&existing.name),
                None,
            )
            .await;

        Ok(())
    }

    async fn find_scoped(&self, ctx: &RequestContext, id: &str) -> AppResult<project::Model> {
        self.project_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("project not found".to_string()))
    }
}
