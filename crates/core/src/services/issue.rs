//! Issue lifecycle.

use chrono::Utc;
use sea_orm::{ActiveEnum, Set};
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::activity_log::ActivityAction;
use opsboard_db::entities::issue::{self, IssueStatus};
use opsboard_db::entities::notification::{NotificationPriority, NotificationType};
use opsboard_db::entities::task::Priority;
use opsboard_db::repositories::{IssueFilter, IssueRepository, UserProfileRepository};

use crate::services::access::{perms, AccessService};
use crate::services::activity::ActivityLogService;
use crate::services::context::RequestContext;
use crate::services::notification::{NotificationService, NotifyInput};

/// Input for creating or updating an issue.
#[derive(Debug, Clone, Default, Validate, serde::Deserialize)]
pub struct IssueInput {
    /// Issue title.
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Priority.
    pub priority: Option<Priority>,
    /// Outlet the issue belongs to.
    pub outlet_id: Option<String>,
    /// Team the issue belongs to.
    pub team_id: Option<String>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    /// Initial assignee profile ids.
    #[serde(default)]
    pub assignee_ids: Vec<String>,
}

/// Issue service.
#[derive(Clone)]
pub struct IssueService {
    issue_repo: IssueRepository,
    profile_repo: UserProfileRepository,
    access: AccessService,
    activity: ActivityLogService,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl IssueService {
    /// Create a new issue service.
    #[must_use]
    pub const fn new(
        issue_repo: IssueRepository,
        profile_repo: UserProfileRepository,
        access: AccessService,
        activity: ActivityLogService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            issue_repo,
            profile_repo,
            access,
            activity,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Non-trashed issues of the context's organization.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        mut filter: IssueFilter,
    ) -> AppResult<Vec<issue::Model>> {
        self.access
            .require(&ctx.profile, perms::VIEW_ISSUES)
            .await?;

        if filter.outlet_id.is_none() {
            filter.outlet_id = ctx.outlet_filter();
        }
        self.issue_repo.list(&ctx.organization.id, &filter).await
    }

    /// Fetch one issue within the context's organization.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> AppResult<issue::Model> {
        self.access
            .require(&ctx.profile, perms::VIEW_ISSUES)
            .await?;
        self.find_scoped(ctx, id).await
    }

    /// Assigned profile ids of an issue.
    pub async fn assignees(&self, ctx: &RequestContext, id: &str) -> AppResult<Vec<String>> {
        self.access
            .require(&ctx.profile, perms::VIEW_ISSUES)
            .await?;
        let issue = self.find_scoped(ctx, id).await?;
        self.issue_repo.assignee_ids(&issue.id).await
    }

    /// Create an issue.
    pub async fn create(&self, ctx: &RequestContext, input: IssueInput) -> AppResult<issue::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_ISSUE)
            .await?;
        input.validate()?;

        let now = Utc::now();
        let model = issue::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            outlet_id: Set(input.outlet_id.or_else(|| ctx.outlet_filter())),
            team_id: Set(input.team_id),
            title: Set(input.title),
            description: Set(input.description),
            status: Set(IssueStatus::Open),
            priority: Set(input.priority.unwrap_or_default()),
            resolved_at: Set(None),
            tags: Set(input.tags),
            created_by: Set(Some(ctx.profile.id.clone())),
            is_trashed: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = self.issue_repo.create(model).await?;

        if !input.assignee_ids.is_empty() {
            self.replace_assignees(ctx, &created, input.assignee_ids)
                .await?;
        }

        self.activity
            .record(
                ctx,
                ActivityAction::Created,
                "issue",
                Some(&created.id),
                Some(&created.title),
                None,
            )
            .await;

        Ok(created)
    }

    /// Update an issue's fields.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: IssueInput,
    ) -> AppResult<issue::Model> {
        self.access.require(&ctx.profile, perms::EDIT_ISSUE).await?;
        input.validate()?;

        let existing = self.find_scoped(ctx, id).await?;
        let mut active: issue::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.description = Set(input.description);
        if let Some(priority) = input.priority {
            active.priority = Set(priority);
        }
        if input.outlet_id.is_some() {
            active.outlet_id = Set(input.outlet_id);
        }
        if input.team_id.is_some() {
            active.team_id = Set(input.team_id);
        }
        active.tags = Set(input.tags);
        active.updated_at = Set(Utc::now().into());

        let updated = self.issue_repo.update(active).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Updated,
                "issue",
                Some(&updated.id),
                Some(&updated.title),
                None,
            )
            .await;

        Ok(updated)
    }

    /// Move an issue to a new status. `resolved_at` is stamped on the
    /// first transition into `resolved` and never touched again.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        id: &str,
        status: IssueStatus,
    ) -> AppResult<issue::Model> {
        self.access.require(&ctx.profile, perms::EDIT_ISSUE).await?;

        let existing = self.find_scoped(ctx, id).await?;
        let old_status = existing.status;
        if old_status == status {
            return Ok(existing);
        }

        let first_resolution = stamps_resolution(status, existing.resolved_at.is_some());
        let creator = existing.created_by.clone();

        let mut active: issue::ActiveModel = existing.into();
        active.status = Set(status);
        if first_resolution {
            active.resolved_at = Set(Some(Utc::now().into()));
        }
        active.updated_at = Set(Utc::now().into());
        let updated = self.issue_repo.update(active).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::StatusChanged,
                "issue",
                Some(&updated.id),
                Some(&updated.title),
                Some(format!(
                    "{} → {}",
                    old_status.to_value(),
                    status.to_value()
                )),
            )
            .await;

        if status == IssueStatus::Resolved {
            if let Some(creator) = creator {
                if creator != ctx.profile.id {
                    self.notifications
                        .notify(NotifyInput {
                            recipient_id: creator,
                            organization_id: ctx.organization.id.clone(),
                            notification_type: NotificationType::IssueResolved,
                            priority: NotificationPriority::Normal,
                            title: "Issue resolved".to_string(),
                            message: format!("'{}' was resolved", updated.title),
                            link: Some(format!("/issues/{}", updated.id)),
                            entity_type: Some("issue".to_string()),
                            entity_id: Some(updated.id.clone()),
                        })
                        .await?;
                }
            }
        }

        Ok(updated)
    }

    /// Replace the assignee set, notifying newly added profiles.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        id: &str,
        profile_ids: Vec<String>,
    ) -> AppResult<()> {
        self.access.require(&ctx.profile, perms::EDIT_ISSUE).await?;

        let issue = self.find_scoped(ctx, id).await?;
        self.replace_assignees(ctx, &issue, profile_ids).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Assigned,
                "issue",
                Some(&issue.id),
                Some(&issue.title),
                None,
            )
            .await;

        Ok(())
    }

    /// Move an issue to the trash.
    pub async fn soft_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_ISSUE)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        let title = existing.title.clone();
        let mut active: issue::ActiveModel = existing.into();
        active.is_trashed = Set(true);
        active.updated_at = Set(Utc::now().into());
        let updated = self.issue_repo.update(active).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Trashed,
                "issue",
                Some(&updated.id),
                Some(&title),
                None,
            )
            .await;

        Ok(())
    }

    /// Permanently delete an issue.
    pub async fn hard_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_ISSUE)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        self.issue_repo.delete(&existing.id).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Deleted,
                "issue",
                Some(&existing.id),
                Some(&existing.title),
                None,
            )
            .await;

        Ok(())
    }

    async fn find_scoped(&self, ctx: &RequestContext, id: &str) -> AppResult<issue::Model> {
        self.issue_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("issue not found".to_string()))
    }

    async fn replace_assignees(
        &self,
        ctx: &RequestContext,
        issue: &issue::Model,
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

        let previous = self.issue_repo.assignee_ids(&issue.id).await?;
        self.issue_repo
            .set_assignees(&issue.id, &profile_ids)
            .await?;

        for pid in &profile_ids {
            if previous.contains(pid) || *pid == ctx.profile.id {
                continue;
            }
            self.notifications
                .notify(NotifyInput {
                    recipient_id: pid.clone(),
                    organization_id: ctx.organization.id.clone(),
                    notification_type: NotificationType::IssueCreated,
                    priority: NotificationPriority::Normal,
                    title: "Issue assigned".to_string(),
                    message: format!("You were assigned '{}'", issue.title),
                    link: Some(format!("/issues/{}", issue.id)),
                    entity_type: Some("issue".to_string()),
                    entity_id: Some(issue.id.clone()),
                })
                .await?;
        }
        Ok(())
    }
}

/// `resolved_at` is written on the first transition into `resolved` only.
fn stamps_resolution(new_status: IssueStatus, already_resolved: bool) -> bool {
    new_status == IssueStatus::Resolved && !already_resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_at_stamped_on_first_resolution() {
        assert!(stamps_resolution(IssueStatus::Resolved, false));
    }

    #[test]
    fn test_resolved_at_never_overwritten() {
        assert!(!stamps_resolution(IssueStatus::Resolved, true));
        assert!(!stamps_resolution(IssueStatus::Open, true));
        assert!(!stamps_resolution(IssueStatus::Ignored, false));
    }
}
