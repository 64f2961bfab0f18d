//! Permission-gated facade over the heuristic assistant.
//!
//! The [`Assistant`] implementations are pure; this service owns the
//! database lookups that turn a request into assistant inputs, and the
//! `use_assist` permission gate in front of all of them.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::ActiveEnum;

use opsboard_common::{AppError, AppResult};
use opsboard_db::entities::task;
use opsboard_db::repositories::{TaskRepository, UserProfileRepository};

use crate::assist::{
    Assistant, DelayInput, DelayPrediction, PriorityPrediction, SimilarMatch,
    SimilarityCandidate, TaskSuggestion, WorkloadEntry, WorkloadReport,
};
use crate::services::access::{perms, AccessService};
use crate::services::context::RequestContext;

/// Assistant facade service.
#[derive(Clone)]
pub struct AssistService {
    task_repo: TaskRepository,
    profile_repo: UserProfileRepository,
    access: AccessService,
    assistant: Arc<dyn Assistant>,
}

impl AssistService {
    /// Create a new assist service.
    #[must_use]
    pub fn new(
        task_repo: TaskRepository,
        profile_repo: UserProfileRepository,
        access: AccessService,
        assistant: Arc<dyn Assistant>,
    ) -> Self {
        Self {
            task_repo,
            profile_repo,
            access,
            assistant,
        }
    }

    /// Suggest tasks the organization does not already have.
    pub async fn suggest_tasks(
        &self,
        ctx: &RequestContext,
        count: usize,
    ) -> AppResult<Vec<TaskSuggestion>> {
        self.access.require(&ctx.profile, perms::USE_ASSIST).await?;

        let existing: Vec<String> = self
            .task_repo
            .list_all_in_org(&ctx.organization.id)
            .await?
            .into_iter()
            .map(|t| t.title)
            .collect();

        Ok(self.assistant.suggest_tasks(
            &ctx.organization.name,
            &existing,
            count.min(10),
            Utc::now(),
        ))
    }

    /// Predict a priority label for draft task text.
    pub async fn predict_priority(
        &self,
        ctx: &RequestContext,
        title: &str,
        description: &str,
    ) -> AppResult<PriorityPrediction> {
        self.access.require(&ctx.profile, perms::USE_ASSIST).await?;
        Ok(self.assistant.predict_priority(title, description))
    }

    /// Score the risk that a task slips its deadline.
    pub async fn predict_delay(
        &self,
        ctx: &RequestContext,
        task_id: &str,
    ) -> AppResult<DelayPrediction> {
        self.access.require(&ctx.profile, perms::USE_ASSIST).await?;

        let task = self.find_scoped(ctx, task_id).await?;
        let now = Utc::now();
        let input = DelayInput {
            title: task.title.clone(),
            priority: task.priority.to_value(),
            assignee_count: self.task_repo.assignee_ids(&task.id).await?.len(),
            days_until_due: task
                .due_date
                .map_or(7, |d| (d.with_timezone(&Utc) - now).num_days()),
            has_subtasks: !self.task_repo.list_subtasks(&task.id).await?.is_empty(),
        };

        Ok(self.assistant.predict_delay(&input))
    }

    /// Find existing tasks similar to the given text, best match first.
    pub async fn find_similar(
        &self,
        ctx: &RequestContext,
        title: &str,
        description: &str,
    ) -> AppResult<Vec<SimilarMatch>> {
        self.access.require(&ctx.profile, perms::USE_ASSIST).await?;

        let candidates: Vec<SimilarityCandidate> = self
            .task_repo
            .list_all_in_org(&ctx.organization.id)
            .await?
            .into_iter()
            .map(|t| SimilarityCandidate {
                id: t.id,
                title: t.title,
                description: t.description,
                status: t.status.to_value(),
            })
            .collect();

        Ok(self.assistant.find_similar(title, description, &candidates))
    }

    /// Compare open-task load across the organization's active members
    /// and suggest reassignments away from the overloaded ones.
    pub async fn balance_workload(&self, ctx: &RequestContext) -> AppResult<WorkloadReport> {
        self.access.require(&ctx.profile, perms::USE_ASSIST).await?;

        let members = self.profile_repo.list_by_org(&ctx.organization.id).await?;

        let mut workload = Vec::with_capacity(members.len());
        for member in members.into_iter().filter(|m| m.is_active) {
            let open = self
                .task_repo
                .find_active_assigned(&ctx.organization.id, &member.id)
                .await?;
            workload.push(WorkloadEntry {
                member_id: member.id,
                name: member.full_name,
                active_tasks: open.len(),
                total_points: open.iter().map(|t| i64::from(t.points)).sum(),
            });
        }

        Ok(self.assistant.balance_workload(&workload))
    }

    /// One-paragraph summary of a task.
    pub async fn summarize(&self, ctx: &RequestContext, task_id: &str) -> AppResult<String> {
        self.access.require(&ctx.profile, perms::USE_ASSIST).await?;

        let task = self.find_scoped(ctx, task_id).await?;
        Ok(self
            .assistant
            .generate_summary(&task.title, &task.priority.to_value()))
    }

    async fn find_scoped(&self, ctx: &RequestContext, id: &str) -> AppResult<task::Model> {
        self.task_repo
            .find_in_org(id, &ctx.organization.id)
            .await?
            .filter(|t| !t.is_trashed)
            .ok_or_else(|| AppError::NotFound("task not found".to_string()))
    }
}
