//! Task templates and instantiation.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use validator::Validate;

use opsboard_common::{AppError, AppResult, IdGenerator};
use opsboard_db::entities::activity_log::ActivityAction;
use opsboard_db::entities::task::{self, Priority, Recurrence, TaskStatus, TaskType};
use opsboard_db::entities::{task_template, template_subtask};
use opsboard_db::repositories::{TaskRepository, TemplateRepository};

use crate::services::access::{perms, AccessService};
use crate::services::activity::ActivityLogService;
use crate::services::context::RequestContext;

/// Input for creating or updating a template.
#[derive(Debug, Clone, Validate, serde::Deserialize)]
pub struct TemplateInput {
    /// Template name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Description, copied into instantiated tasks.
    pub description: Option<String>,
    /// Default priority for instantiated tasks.
    pub priority: Option<Priority>,
    /// Default recurrence for instantiated tasks.
    pub recurrence: Option<Recurrence>,
    /// Custom recurrence payload.
    pub recurrence_details: Option<serde_json::Value>,
    /// Category label.
    pub category: Option<String>,
    /// Subtask titles, in order.
    #[serde(default)]
    pub subtasks: Vec<String>,
}

/// Per-instantiation overrides.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct InstantiateOverrides {
    /// Replace the template name as the task title.
    pub title: Option<String>,
    /// Attach the task to a project.
    pub project_id: Option<String>,
    /// Attach the task to an outlet.
    pub outlet_id: Option<String>,
    /// Due date for the instantiated task.
    pub due_date: Option<DateTime<Utc>>,
}

/// A template with its subtask rows.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TemplateDetail {
    /// The template row.
    pub template: task_template::Model,
    /// Ordered subtask rows.
    pub subtasks: Vec<template_subtask::Model>,
}

/// Template service.
#[derive(Clone)]
pub struct TemplateService {
    template_repo: TemplateRepository,
    task_repo: TaskRepository,
    access: AccessService,
    activity: ActivityLogService,
    id_gen: IdGenerator,
}

impl TemplateService {
    /// Create a new template service.
    #[must_use]
    pub const fn new(
        template_repo: TemplateRepository,
        task_repo: TaskRepository,
        access: AccessService,
        activity: ActivityLogService,
    ) -> Self {
        Self {
            template_repo,
            task_repo,
            access,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Templates of the context's organization.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<task_template::Model>> {
        self.access
            .require(&ctx.profile, perms::VIEW_TEMPLATES)
            .await?;
        self.template_repo.list(&ctx.organization.id).await
    }

    /// Fetch one template with its subtask rows.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> AppResult<TemplateDetail> {
        self.access
            .require(&ctx.profile, perms::VIEW_TEMPLATES)
            .await?;

        let template = self.find_scoped(ctx, id).await?;
        let subtasks = self.template_repo.list_subtasks(&template.id).await?;
        Ok(TemplateDetail { template, subtasks })
    }

    /// Create a template with its subtask rows.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: TemplateInput,
    ) -> AppResult<task_template::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_TEMPLATE)
            .await?;
        input.validate()?;

        let now = Utc::now();
        let model = task_template::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            name: Set(input.name),
            description: Set(input.description),
            priority: Set(input.priority.unwrap_or_default()),
            recurrence: Set(input.recurrence.unwrap_or_default()),
            recurrence_details: Set(input.recurrence_details),
            category: Set(input.category),
            created_by: Set(Some(ctx.profile.id.clone())),
            is_active: Set(true),
            is_trashed: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = self.template_repo.create(model).await?;

        self.template_repo
            .set_subtasks(&created.id, self.subtask_rows(&created.id, &input.subtasks))
            .await?;

        self.activity
            .record(
                ctx,
                ActivityAction::Created,
                "template",
                Some(&created.id),
                Some(&created.name),
                None,
            )
            .await;

        Ok(created)
    }

    /// Update a template and replace its subtask rows.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: TemplateInput,
    ) -> AppResult<task_template::Model> {
        self.access
            .require(&ctx.profile, perms::EDIT_TEMPLATE)
            .await?;
        input.validate()?;

        let existing = self.find_scoped(ctx, id).await?;
        let mut active: task_template::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        if let Some(priority) = input.priority {
            active.priority = Set(priority);
        }
        if let Some(recurrence) = input.recurrence {
            active.recurrence = Set(recurrence);
        }
        if input.recurrence_details.is_some() {
            active.recurrence_details = Set(input.recurrence_details);
        }
        active.category = Set(input.category);
        active.updated_at = Set(Utc::now().into());
        let updated = self.template_repo.update(active).await?;

        self.template_repo
            .set_subtasks(&updated.id, self.subtask_rows(&updated.id, &input.subtasks))
            .await?;

        Ok(updated)
    }

    /// Move a template to the trash.
    pub async fn soft_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_TEMPLATE)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        let mut active: task_template::ActiveModel = existing.into();
        active.is_trashed = Set(true);
        active.updated_at = Set(Utc::now().into());
        self.template_repo.update(active).await?;
        Ok(())
    }

    /// Permanently delete a template and its subtask rows.
    pub async fn hard_delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        self.access
            .require(&ctx.profile, perms::DELETE_TEMPLATE)
            .await?;

        let existing = self.find_scoped(ctx, id).await?;
        self.template_repo.delete(&existing.id).await
    }

    /// Create a task (plus subtasks) from a template in the current
    /// organization.
    pub async fn instantiate(
        &self,
        ctx: &RequestContext,
        template_id: &str,
        overrides: InstantiateOverrides,
    ) -> AppResult<task::Model> {
        self.access
            .require(&ctx.profile, perms::CREATE_TASK)
            .await?;

        let template = self.find_scoped(ctx, template_id).await?;
        let subtasks = self.template_repo.list_subtasks(&template.id).await?;

        let now = Utc::now();
        let title = overrides.title.unwrap_or_else(|| template.name.clone());
        let model = task::ActiveModel {
            id: Set(self.id_gen.generate()),
            organization_id: Set(ctx.organization.id.clone()),
            project_id: Set(overrides.project_id),
            outlet_id: Set(overrides.outlet_id.or_else(|| ctx.outlet_filter())),
            team_id: Set(None),
            parent_id: Set(None),
            title: Set(title),
            description: Set(template.description.clone()),
            sop_content: Set(None),
            task_type: Set(TaskType::Single),
            status: Set(TaskStatus::Todo),
            priority: Set(template.priority),
            category: Set(template.category.clone()),
            start_date: Set(None),
            due_date: Set(overrides.due_date.map(Into::into)),
            completed_at: Set(None),
            points: Set(0),
            recurrence: Set(template.recurrence),
            recurrence_details: Set(template.recurrence_details.clone()),
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
        let created = self.task_repo.create(model).await?;

        for row in &subtasks {
            let child = task::ActiveModel {
                id: Set(self.id_gen.generate()),
                organization_id: Set(created.organization_id.clone()),
                project_id: Set(created.project_id.clone()),
                outlet_id: Set(created.outlet_id.clone()),
                team_id: Set(None),
                parent_id: Set(Some(created.id.clone())),
                title: Set(row.title.clone()),
                description: Set(None),
                sop_content: Set(None),
                task_type: Set(TaskType::Single),
                status: Set(TaskStatus::Todo),
                priority: Set(created.priority),
                category: Set(created.category.clone()),
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
            self.task_repo.create(child).await?;
        }

        self.activity
            .record(
                ctx,
                ActivityAction::Created,
                "task",
                Some(&created.id),
                Some(&created.title),
                Some(format!("from template '{}'", template.name)),
            )
            .await;

        Ok(created)
    }

    async fn find_scoped(&self, ctx: &RequestContext, id: &str) -> AppResult<task_template::Model> {
        self.template_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .ok_or_else(|| AppError::NotFound("template not found".to_string()))
    }

    fn subtask_rows(
        &self,
        template_id: &str,
        titles: &[String],
    ) -> Vec<template_subtask::ActiveModel> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| template_subtask::ActiveModel {
                id: Set(self.id_gen.generate()),
                template_id: Set(template_id.to_string()),
                title: Set(title.clone()),
                position: Set(i as i32),
            })
            .collect()
    }
}
