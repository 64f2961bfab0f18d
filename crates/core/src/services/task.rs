//! Task lifecycle: CRUD, status flow, checklist, comments, subtasks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveEnum, Set};
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::activity_log::ActivityAction;
use opsboard_db::entities::notification::{NotificationPriority, NotificationType};
use opsboard_db::entities::task::{self, Priority, Recurrence, TaskStatus, TaskType};
use opsboard_db::entities::{task_attachment, task_comment, task_step};
use opsboard_db::repositories::{TaskFilter, TaskRepository, UserProfileRepository};

use crate::assist::Assistant;
use crate::services::access::{perms, AccessService};
use crate::services::activity::ActivityLogService;
use crate::services::context::RequestContext;
use crate::services::notification::{NotificationService, NotifyInput};

/// Input for creating or updating a task.
#[derive(Debug, Clone, Default, Validate, serde::Deserialize)]
pub struct TaskInput {
    /// Task title.
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Standard-operating-procedure text.
    pub sop_content: Option<String>,
    /// Single-assignee or group.
    pub task_type: Option<TaskType>,
    /// Priority.
    pub priority: Option<Priority>,
    /// Category label.
    pub category: Option<String>,
    /// Project the task belongs to.
    pub project_id: Option<String>,
    /// Outlet the task belongs to.
    pub outlet_id: Option<String>,
    /// Team the task belongs to.
    pub team_id: Option<String>,
    /// Planned start.
    pub start_date: Option<DateTime<Utc>>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Gamification points awarded on completion.
    pub points: Option<i32>,
    /// Recurrence schedule.
    pub recurrence: Option<Recurrence>,
    /// Custom recurrence payload, stored verbatim.
    pub recurrence_details: Option<serde_json::Value>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    /// Whether completion needs approval.
    pub needs_approval: Option<bool>,
    /// Initial assignee profile ids.
    #[serde(default)]
    pub assignee_ids: Vec<String>,
}

/// Metadata for one attached file. The bytes themselves are stored
/// outside the system; only the descriptor rows live here.
#[derive(Debug, Clone, Default, Validate, serde::Deserialize)]
pub struct AttachmentInput {
    /// Original file name.
    #[validate(length(min = 1, message = "file name is required"))]
    pub file_name: String,
    /// Where the file lives.
    pub file_url: Option<String>,
    /// MIME type or extension label.
    pub file_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub file_size: i64,
}

/// A task with everything its detail view needs.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TaskDetail {
    /// The task row.
    pub task: task::Model,
    /// Assigned profile ids.
    pub assignee_ids: Vec<String>,
    /// Checklist steps, in position order.
    pub steps: Vec<task_step::Model>,
    /// Comments, oldest first.
    pub comments: Vec<task_comment::Model>,
    /// Attachment metadata, oldest first.
    pub attachments: Vec<task_attachment::Model>,
    /// Subtasks, in creation order.
    pub subtasks: Vec<task::Model>,
}

/// Task service.
#[derive(Clone)]
pub struct TaskService {
    task_repo: TaskRepository,
    profile_repo: UserProfileRepository,
    access: AccessService,
    activity: ActivityLogService,
    notifications: NotificationService,
    assistant: Arc<dyn Assistant>,
    id_gen: IdGenerator,
}

impl TaskService {
    /// Create a new task service.
    #[must_use]
    pub fn new(
        task_repo: TaskRepository,
        profile_repo: UserProfileRepository,
        access: AccessService,
        activity: ActivityLogService,
        notifications: NotificationService,
        assistant: Arc<dyn Assistant>,
    ) -> Self {
        Self {
            task_repo,
            profile_repo,
            access,
            activity,
            notifications,
            assistant,
            id_gen: IdGenerator::new(),
        }
    }

    /// Non-trashed top-level tasks of the context's organization.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        mut filter: TaskFilter,
    ) -> AppResult<Vec<task::Model>> {
        self.access.require(&ctx.profile, perms::VIEW_TASKS).await?;

        if filter.outlet_id.is_none() {
            filter.outlet_id = ctx.outlet_filter();
        }
        self.task_repo.list(&ctx.organization.id, &filter).await
    }

    /// Fetch one task with assignees, steps, comments, attachments and
    /// subtasks.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> AppResult<TaskDetail> {
        self.access.require(&ctx.profile, perms::VIEW_TASKS).await?;

        let task = self.find_scoped(ctx, id).await?;
        let assignee_ids = self.task_repo.assignee_ids(&task.id).await?;
        let steps = self.task_repo.list_steps(&task.id).await?;
        let comments = self.task_repo.list_comments(&task.id).await?;
        let attachments = self.task_repo.list_attachments(&task.id).await?;
        let subtasks = self.task_repo.list_subtasks(&task.id).await?;

        Ok(TaskDetail {
            task,
            assignee_ids,
            steps,
            comments,
            attachments,
            subtasks,
        })
    }

    /// Create a task. The heuristic assistant contributes an advisory
    /// summary and priority hint; neither is ever read back by business
    /// rules.
    pub async fn create(&self, ctx: &RequestContext, input: TaskInput) -> AppResult<task::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_TASK)
            .await?;
        input.validate()?;

        let priority = input.priority.unwrap_or_default();
        let description = input.description.clone().unwrap_or_default();
        let hint = self.assistant.predict_priority(&input.title, &description);
        let summary = self
            .assistant
            .generate_summary(&input.title, &priority.to_value());

        let now = Utc::now();
        let model = task::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            project_id: Set(input.project_id),
            outlet_id: Set(input.outlet_id.or_else(|| ctx.outlet_filter())),
            team_id: Set(input.team_id),
            parent_id: Set(None),
            title: Set(input.title),
            description: Set(input.description),
            sop_content: Set(input.sop_content),
            task_type: Set(input.task_type.unwrap_or_default()),
            status: Set(TaskStatus::Todo),
            priority: Set(priority),
            category: Set(input.category),
            start_date: Set(input.start_date.map(Into::into)),
            due_date: Set(input.due_date.map(Into::into)),
            completed_at: Set(None),
            points: Set(input.points.unwrap_or(0)),
            recurrence: Set(input.recurrence.unwrap_or_default()),
            recurrence_details: Set(input.recurrence_details),
            recurrence_source_id: Set(None),
            needs_approval: Set(input.needs_approval.unwrap_or(false)),
            is_starred: Set(false),
            assist_summary: Set(Some(summary)),
            assist_priority_hint: Set(Some(hint.predicted_priority)),
            tags: Set(input.tags),
            created_by: Set(Some(ctx.profile.id.clone())),
            is_trashed: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = self.task_repo.create(model).await?;

        if !input.assignee_ids.is_empty() {
            self.replace_assignees(ctx, &created, input.assignee_ids)
                .await?;
        }

        self.activity
            .record(
                ctx,
                ActivityAction::Created,
                "task",
                Some(&created.id),
                Some(&created.title),
                None,
            )
            .await;

        Ok(created)
    }

    /// Update a task's fields. Status moves through here apply the
    /// completed_at invariant and record a status change.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: TaskInput,
    ) -> AppResult<task::Model> {
        self.access.require(&ctx.profile, perms::EDIT_TASK).await?;
        input.validate()?;

        let existing = self.find_scoped(ctx, id).await?;
        let old_status = existing.status;

        let mut active: task::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.description = Set(input.description);
        active.sop_content = Set(input.sop_content);
        if let Some(task_type) = input.task_type {
            active.task_type = Set(task_type);
        }
        if let Some(priority) = input.priority {
            active.priority = Set(priority);
        }
        active.category = Set(input.category);
        if input.project_id.is_some() {
            active.project_id = Set(input.project_id);
        }
        if input.outlet_id.is_some() {
            active.outlet_id = Set(input.outlet_id);
        }
        if input.team_id.is_some() {
            active.team_id = Set(input.team_id);
        }
        active.start_date = Set(input.start_date.map(Into::into));
        active.due_date = Set(input.due_date.map(Into::into));
        if let Some(points) = input.points {
            active.points = Set(points);
        }
        if let Some(recurrence) = input.recurrence {
            active.recurrence = Set(recurrence);
        }
        if input.recurrence_details.is_some() {
            active.recurrence_details = Set(input.recurrence_details);
        }
        active.tags = Set(input.tags);
        if let Some(needs_approval) = input.needs_approval {
            active.needs_approval = Set(needs_approval);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = self.task_repo.update(active).await?;

        if updated.status == old_status {
            self.activity
                .record(
                    ctx,
                    ActivityAction::Updated,
                    "task",
                    Some(&updated.id),
                    Some(&updated.title),
                    None,
                )
                .await;
        }

        Ok(updated)
    }

    /// Move a task to a new status.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        id: &str,
        status: TaskStatus,
    ) -> AppResult<task::Model> {
        self.access
            .require(&ctx.profile, perms::CHANGE_TASK_STATUS)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        let old_status = existing.status;
        if old_status == status {
            return Ok(existing);
        }

        let now = Utc::now();
        let mut active: task::ActiveModel = existing.into();
        active.status = Set(status);
        active.completed_at = Set(stamp_completed_at(status, now));
        active.updated_at = Set(now.into());
        let updated = self.task_repo.update(active).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::StatusChanged,
                "task",
                Some(&updated.id),
                Some(&updated.title),
                Some(format!(
                    "{} → {}",
                    old_status.to_value(),
                    status.to_value()
                )),
            )
            .await;

        if status == TaskStatus::Completed {
            self.on_completed(ctx, &updated).await?;
        }

        Ok(updated)
    }

    /// Flip the star flag.
    pub async fn toggle_star(&self, ctx: &RequestContext, id: &str) -> AppResult<task::Model> {
        self.access.require(&ctx.profile, perms::EDIT_TASK).await?;

        let existing = self.find_scoped(ctx, id).await?;
        let starred = existing.is_starred;
        let mut active: task::ActiveModel = existing.into();
        active.is_starred = Set(!starred);
        active.updated_at = Set(Utc::now().into());
        self.task_repo.update(active).await
    }

    /// Move a task to the trash. Subtasks stay in place and remain
    /// fetchable by id.
    pub async fn soft_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_TASK)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        let title = existing.title.clone();
        let mut active: task::ActiveModel = existing.into();
        active.is_trashed = Set(true);
        active.updated_at = Set(Utc::now().into());
        let updated = self.task_repo.update(active).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Trashed,
                "task",
                Some(&updated.id),
                Some(&title),
                None,
            )
            .await;

        Ok(())
    }

    /// Permanently delete a task and, via the foreign key, its subtasks.
    pub async fn hard_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_TASK)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        self.task_repo.delete(&existing.id).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Deleted,
                "task",
                Some(&existing.id),
                Some(&existing.title),
                None,
            )
            .await;

        Ok(())
    }

    /// Replace the assignee set, notifying newly added profiles.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        id: &str,
        profile_ids: Vec<String>,
    ) -> AppResult<()> {
        self.access.require(&ctx.profile, perms::EDIT_TASK).await?;

        let task = self.find_scoped(ctx, id).await?;
        self.replace_assignees(ctx, &task, profile_ids).await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Assigned,
                "task",
                Some(&task.id),
                Some(&task.title),
                None,
            )
            .await;

        Ok(())
    }

    /// Add a checklist step at the end of the list.
    pub async fn add_step(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        title: &str,
    ) -> AppResult<task_step::Model> {
        self.access.require(&ctx.profile, perms::EDIT_TASK).await?;
        if title.trim().is_empty() {
            return Err(AppError::Validation("step title is required".to_string()));
        }

        let task = self.find_scoped(ctx, task_id).await?;
        let position = self.task_repo.list_steps(&task.id).await?.len() as i32;

        let model = task_step::ActiveModel {
            id: Set(self.id_gen.generate()),
            task_id: Set(task.id),
            title: Set(title.trim().to_string()),
            position: Set(position),
            is_completed: Set(false),
            completed_by: Set(None),
            completed_at: Set(None),
        };
        self.task_repo.add_step(model).await
    }

    /// Flip a checklist step, stamping who completed it and when.
    pub async fn toggle_step(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        step_id: &str,
    ) -> AppResult<task_step::Model> {
        self.access.require(&ctx.profile, perms::EDIT_TASK).await?;

        let task = self.find_scoped(ctx, task_id).await?;
        let step = self
            .task_repo
            .find_step(step_id)
            .await?
            .filter(|s| s.task_id == task.id)
            .ok_or_else(|| AppError::NotFound("step not found".to_string()))?;

        let completing = !step.is_completed;
        let mut active: task_step::ActiveModel = step.into();
        active.is_completed = Set(completing);
        if completing {
            active.completed_by = Set(Some(ctx.profile.id.clone()));
            active.completed_at = Set(Some(Utc::now().into()));
        } else {
            active.completed_by = Set(None);
            active.completed_at = Set(None);
        }
        self.task_repo.update_step(active).await
    }

    /// Comment on a task, notifying its assignees.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        body: &str,
    ) -> AppResult<task_comment::Model> {
        self.access.require(&ctx.profile, perms::VIEW_TASKS).await?;
        if body.trim().is_empty() {
            return Err(AppError::Validation("comment body is required".to_string()));
        }

        let task = self.find_scoped(ctx, task_id).await?;

        let model = task_comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            task_id: Set(task.id.clone()),
            author_id: Set(Some(ctx.profile.id.clone())),
            body: Set(body.trim().to_string()),
            created_at: Set(Utc::now().into()),
        };
        let comment = self.task_repo.add_comment(model).await?;

        for pid in self.task_repo.assignee_ids(&task.id).await? {
            if pid == ctx.profile.id {
                continue;
            }
            self.notifications
                .notify(NotifyInput {
                    recipient_id: pid,
                    organization_id: ctx.organization.id.clone(),
                    notification_type: NotificationType::TaskComment,
                    priority: NotificationPriority::Normal,
                    title: "New comment".to_string(),
                    message: format!("{} commented on '{}'", ctx.profile.full_name, task.title),
                    link: Some(format!("/tasks/{}", task.id)),
                    entity_type: Some("task".to_string()),
                    entity_id: Some(task.id.clone()),
                })
                .await?;
        }

        self.activity
            .record(
                ctx,
                ActivityAction::Commented,
                "task",
                Some(&task.id),
                Some(&task.title),
                None,
            )
            .await;

        Ok(comment)
    }

    /// Record an attachment against a task.
    pub async fn add_attachment(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        input: AttachmentInput,
    ) -> AppResult<task_attachment::Model> {
        self.access.require(&ctx.profile, perms::EDIT_TASK).await?;
        input.validate()?;

        let task = self.find_scoped(ctx, task_id).await?;

        let model = task_attachment::ActiveModel {
            id: Set(self.id_gen.generate()),
            task_id: Set(task.id.clone()),
            file_name: Set(input.file_name.trim().to_string()),
            file_url: Set(input.file_url),
            file_type: Set(input.file_type),
            file_size: Set(input.file_size.max(0)),
            uploaded_by: Set(Some(ctx.profile.id.clone())),
            created_at: Set(Utc::now().into()),
        };
        self.task_repo.add_attachment(model).await
    }

    /// Remove an attachment's metadata row.
    pub async fn remove_attachment(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        attachment_id: &str,
    ) -> AppResult<()> {
        self.access.require(&ctx.profile, perms::EDIT_TASK).await?;

        let task = self.find_scoped(ctx, task_id).await?;
        let attachment = self
            .task_repo
            .find_attachment(attachment_id)
            .await?
            .filter(|a| a.task_id == task.id)
            .ok_or_else(|| AppError::NotFound("attachment not found".to_string()))?;

        self.task_repo.delete_attachment(attachment).await
    }

    /// Add a subtask under a top-level task. The child inherits the
    /// parent's project, outlet, team and priority but tracks its own
    /// status. The tree is depth-1: subtasks cannot have children.
    pub async fn add_subtask(
        &self,
        ctx: &RequestContext,
        parent_id: &str,
        title: &str,
    ) -> AppResult<task::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_TASK)
            .await?;
        if title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }

        let parent = self.find_scoped(ctx, parent_id).await?;
        if parent.parent_id.is_some() {
            return Err(AppError::Validation(
                "subtasks cannot have subtasks".to_string(),
            ));
        }

        let now = Utc::now();
        let model = task::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(parent.organization_id.clone()),
            project_id: Set(parent.project_id.clone()),
            outlet_id: Set(parent.outlet_id.clone()),
            team_id: Set(parent.team_id.clone()),
            parent_id: Set(Some(parent.id.clone())),
            title: Set(title.trim().to_string()),
            description: Set(None),
            sop_content: Set(None),
            task_type: Set(parent.task_type),
            status: Set(TaskStatus::Todo),
            priority: Set(parent.priority),
            category: Set(parent.category.clone()),
            start_date: Set(None),
            due_date: Set(None),
            completed_at: Set(None),
            points: Set(0),
            recurrence: Set(Recurrence::None),
            recurrence_details: Set(None),
            recurrence_source_id: Set(None),
            needs_approval: Set(false),
            is_starred: Set(false),
            assist_summary: Set(None),
            assist_priority_hint: Set(None),
            tags: Set(None),
            created_by: Set(Some(ctx.profile.id.clone())),
            is_trashed: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        self.task_repo.create(model).await
    }

    async fn find_scoped(&self, ctx: &RequestContext, id: &str) -> AppResult<task::Model> {
        self.task_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("task not found".to_string()))
    }

    async fn replace_assignees(
        &self,
        ctx: &RequestContext,
        task: &task::Model,
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

        let previous = self.task_repo.assignee_ids(&task.id).await?;
        self.task_repo.set_assignees(&task.id, &profile_ids).await?;

        for pid in &profile_ids {
            if previous.contains(pid) || *pid == ctx.profile.id {
                continue;
            }
            self.notifications
                .notify(NotifyInput {
                    recipient_id: pid.clone(),
                    organization_id: ctx.organization.id.clone(),
                    notification_type: NotificationType::TaskAssigned,
                    priority: NotificationPriority::Normal,
                    title: "Task assigned".to_string(),
                    message: format!("You were assigned '{}'", task.title),
                    link: Some(format!("/tasks/{}", task.id)),
                    entity_type: Some("task".to_string()),
                    entity_id: Some(task.id.clone()),
                })
                .await?;
        }
        Ok(())
    }

    /// Completion side effects: award points to assignees and tell the
    /// creator.
    async fn on_completed(&self, ctx: &RequestContext, task: &task::Model) -> AppResult<()> {
        if task.points > 0 {
            for pid in self.task_repo.assignee_ids(&task.id).await? {
                if let Some(profile) = self.profile_repo.find_by_id(&pid).await? {
                    let points = profile.points + task.points;
                    let mut active: opsboard_db::entities::user_profile::ActiveModel =
                        profile.into();
                    active.points = Set(points);
                    self.profile_repo.update(active).await?;
                }
            }
        }

        if let Some(creator) = &task.created_by {
            if *creator != ctx.profile.id {
                self.notifications
                    .notify(NotifyInput {
                        recipient_id: creator.clone(),
                        organization_id: ctx.organization.id.clone(),
                        notification_type: NotificationType::TaskCompleted,
                        priority: NotificationPriority::Normal,
                        title: "Task completed".to_string(),
                        message: format!("'{}' was completed", task.title),
                        link: Some(format!("/tasks/{}", task.id)),
                        entity_type: Some("task".to_string()),
                        entity_id: Some(task.id.clone()),
                    })
                    .await?;
            }
        }
        Ok(())
    }
}

/// The completed_at invariant: non-null exactly while the status is
/// `completed`. Entering `completed` stamps `now`; leaving clears it.
fn stamp_completed_at(
    new: TaskStatus,
    now: DateTime<Utc>,
) -> Option<sea_orm::prelude::DateTimeWithTimeZone> {
    if new == TaskStatus::Completed {
        Some(now.into())
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_at_set_on_completion() {
        let stamped = stamp_completed_at(TaskStatus::Completed, Utc::now());
        assert!(stamped.is_some());
    }

    #[test]
    fn test_completed_at_cleared_when_leaving_completed() {
        let stamped = stamp_completed_at(TaskStatus::InProgress, Utc::now());
        assert!(stamped.is_none());
    }

    #[test]
    fn test_completed_at_none_for_other_statuses() {
        assert!(stamp_completed_at(TaskStatus::Todo, Utc::now()).is_none());
        assert!(stamp_completed_at(TaskStatus::Review, Utc::now()).is_none());
        assert!(stamp_completed_at(TaskStatus::OnHold, Utc::now()).is_none());
    }
}
