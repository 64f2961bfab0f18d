//! Task repository.

use std::sync::Arc;

use crate::entities::task::{Priority, Recurrence, TaskStatus};
use crate::entities::{
    Task, TaskAssignee, TaskAttachment, TaskComment, TaskStep, task, task_assignee,
    task_attachment, task_comment, task_step,
};
use chrono::{DateTime, Utc};
use opsboard_common::{AppError, AppResult};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

/// Narrowing filters for task lists. All fields are optional; an empty
/// filter lists every non-trashed task of the organization.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Restrict to one outlet.
    pub outlet_id: Option<String>,
    /// Restrict to one project.
    pub project_id: Option<String>,
    /// Restrict to a status.
    pub status: Option<TaskStatus>,
    /// Restrict to a priority.
    pub priority: Option<Priority>,
    /// Restrict to tasks assigned to this profile.
    pub assignee_id: Option<String>,
    /// Case-insensitive title/description substring.
    pub search: Option<String>,
    /// Restrict to starred tasks.
    pub starred_only: bool,
}

/// Task repository for database operations.
#[derive(Clone)]
pub struct TaskRepository {
    db: Arc<DatabaseConnection>,
}

impl TaskRepository {
    /// Create a new task repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a task by ID. Trashed tasks are still found here.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<task::Model>> {
        Task::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a task by ID scoped to an organization.
    pub async fn find_in_org(&self, id: &str, org_id: &str) -> AppResult<Option<task::Model>> {
        Task::find_by_id(id)
            .filter(task::Column::OrganizationId.eq(org_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List non-trashed top-level tasks of an organization, newest first.
    pub async fn list(&self, org_id: &str, filter: &TaskFilter) -> AppResult<Vec<task::Model>> {
        let mut query = Task::find()
            .filter(task::Column::OrganizationId.eq(org_id))
            .filter(task::Column::IsTrashed.eq(false))
            .filter(task::Column::ParentId.is_null())
            .order_by_desc(task::Column::CreatedAt);

        if let Some(outlet_id) = &filter.outlet_id {
            query = query.filter(task::Column::OutletId.eq(outlet_id));
        }
        if let Some(project_id) = &filter.project_id {
            query = query.filter(task::Column::ProjectId.eq(project_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(task::Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(task::Column::Priority.eq(priority));
        }
        if let Some(assignee_id) = &filter.assignee_id {
            query = query.filter(
                task::Column::Id.in_subquery(
                    Query::select()
                        .column(task_assignee::Column::TaskId)
                        .from(task_assignee::Entity)
                        .and_where(
                            Expr::col(task_assignee::Column::ProfileId).eq(assignee_id.as_str()),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(Expr::col(task::Column::Title).ilike(pattern.clone()))
                    .add(Expr::col(task::Column::Description).ilike(pattern)),
            );
        }
        if filter.starred_only {
            query = query.filter(task::Column::IsStarred.eq(true));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every non-trashed task of an organization, subtasks included.
    /// Used by the reporting aggregator.
    pub async fn list_all_in_org(&self, org_id: &str) -> AppResult<Vec<task::Model>> {
        Task::find()
            .filter(task::Column::OrganizationId.eq(org_id))
            .filter(task::Column::IsTrashed.eq(false))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Non-completed, non-trashed tasks of the organization assigned to
    /// one profile. Feeds the workload balancer.
    pub async fn find_active_assigned(
        &self,
        org_id: &str,
        profile_id: &str,
    ) -> AppResult<Vec<task::Model>> {
        Task::find()
            .filter(task::Column::OrganizationId.eq(org_id))
            .filter(task::Column::IsTrashed.eq(false))
            .filter(task::Column::Status.ne(TaskStatus::Completed))
            .filter(
                task::Column::Id.in_subquery(
                    Query::select()
                        .column(task_assignee::Column::TaskId)
                        .from(task_assignee::Entity)
                        .and_where(Expr::col(task_assignee::Column::ProfileId).eq(profile_id))
                        .to_owned(),
                ),
            )
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List subtasks of a parent, in creation order.
    pub async fn list_subtasks(&self, parent_id: &str) -> AppResult<Vec<task::Model>> {
        Task::find()
            .filter(task::Column::ParentId.eq(parent_id))
            .order_by_asc(task::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new task.
    pub async fn create(&self, model: task::ActiveModel) -> AppResult<task::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a task.
    pub async fn update(&self, model: task::ActiveModel) -> AppResult<task::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a task.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let task = self.find_by_id(id).await?;
        if let Some(t) = task {
            t.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    // --- assignees ---

    /// Profile ids currently assigned to a task.
    pub async fn assignee_ids(&self, task_id: &str) -> AppResult<Vec<String>> {
        let rows = TaskAssignee::find()
            .filter(task_assignee::Column::TaskId.eq(task_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|r| r.profile_id).collect())
    }

    /// Replace the assignee set of a task.
    pub async fn set_assignees(&self, task_id: &str, profile_ids: &[String]) -> AppResult<()> {
        TaskAssignee::delete_many()
            .filter(task_assignee::Column::TaskId.eq(task_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for pid in profile_ids {
            let link = task_assignee::ActiveModel {
                task_id: Set(task_id.to_string()),
                profile_id: Set(pid.clone()),
            };
            link.insert(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    // --- steps ---

    /// List the checklist of a task, in position order.
    pub async fn list_steps(&self, task_id: &str) -> AppResult<Vec<task_step::Model>> {
        TaskStep::find()
            .filter(task_step::Column::TaskId.eq(task_id))
            .order_by_asc(task_step::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a single step.
    pub async fn find_step(&self, step_id: &str) -> AppResult<Option<task_step::Model>> {
        TaskStep::find_by_id(step_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a checklist step.
    pub async fn add_step(&self, model: task_step::ActiveModel) -> AppResult<task_step::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a checklist step.
    pub async fn update_step(&self, model: task_step::ActiveModel) -> AppResult<task_step::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // --- comments ---

    /// List comments of a task, oldest first.
    pub async fn list_comments(&self, task_id: &str) -> AppResult<Vec<task_comment::Model>> {
        TaskComment::find()
            .filter(task_comment::Column::TaskId.eq(task_id))
            .order_by_asc(task_comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a comment.
    pub async fn add_comment(
        &self,
        model: task_comment::ActiveModel,
    ) -> AppResult<task_comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // --- attachments ---

    /// List attachment metadata of a task, oldest first.
    pub async fn list_attachments(
        &self,
        task_id: &str,
    ) -> AppResult<Vec<task_attachment::Model>> {
        TaskAttachment::find()
            .filter(task_attachment::Column::TaskId.eq(task_id))
            .order_by_asc(task_attachment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert an attachment metadata row.
    pub async fn add_attachment(
        &self,
        model: task_attachment::ActiveModel,
    ) -> AppResult<task_attachment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a single attachment.
    pub async fn find_attachment(
        &self,
        attachment_id: &str,
    ) -> AppResult<Option<task_attachment::Model>> {
        TaskAttachment::find_by_id(attachment_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an attachment metadata row.
    pub async fn delete_attachment(&self, attachment: task_attachment::Model) -> AppResult<()> {
        attachment
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // --- sweep queries ---

    /// Tasks past their due date that are still in an active status.
    pub async fn find_overdue_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<task::Model>> {
        Task::find()
            .filter(task::Column::DueDate.lt(now))
            .filter(task::Column::Status.is_in([
                TaskStatus::Todo,
                TaskStatus::InProgress,
                TaskStatus::Review,
            ]))
            .filter(task::Column::IsTrashed.eq(false))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Completed recurring tasks eligible for spawning the next occurrence.
    pub async fn find_recurrence_candidates(&self) -> AppResult<Vec<task::Model>> {
        Task::find()
            .filter(task::Column::Status.eq(TaskStatus::Completed))
            .filter(task::Column::Recurrence.is_in([
                Recurrence::Daily,
                Recurrence::Weekly,
                Recurrence::Monthly,
            ]))
            .filter(task::Column::IsTrashed.eq(false))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether an occurrence spawned from `source_id` with this due date
    /// already exists.
    pub async fn spawn_exists(
        &self,
        source_id: &str,
        due_date: DateTime<Utc>,
    ) -> AppResult<bool> {
        let found = Task::find()
            .filter(task::Column::RecurrenceSourceId.eq(source_id))
            .filter(task::Column::DueDate.eq(due_date))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.is_some())
    }

    /// Non-trashed active tasks due within the given window.
    pub async fn find_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<task::Model>> {
        Task::find()
            .filter(task::Column::DueDate.gte(from))
            .filter(task::Column::DueDate.lte(to))
            .filter(task::Column::Status.ne(TaskStatus::Completed))
            .filter(task::Column::IsTrashed.eq(false))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// In-progress tasks not touched since the cutoff.
    pub async fn find_stale_in_progress(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<task::Model>> {
        Task::find()
            .filter(task::Column::Status.eq(TaskStatus::InProgress))
            .filter(task::Column::UpdatedAt.lt(cutoff))
            .filter(task::Column::IsTrashed.eq(false))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_task(id: &str, title: &str) -> task::Model {
        task::Model {
            id: id.to_string(),
            organization_id: "org1".to_string(),
            project_id: None,
            outlet_id: None,
            team_id: None,
            parent_id: None,
            title: title.to_string(),
            description: None,
            sop_content: None,
            task_type: Default::default(),
            status: Default::default(),
            priority: Default::default(),
            category: None,
            start_date: None,
            due_date: None,
            completed_at: None,
            points: 0,
            recurrence: Default::default(),
            recurrence_details: None,
            recurrence_source_id: None,
            needs_approval: false,
            is_starred: false,
            assist_summary: None,
            assist_priority_hint: None,
            tags: None,
            created_by: None,
            is_trashed: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_in_org_found() {
        let task = test_task("t1", "Close the till");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[task.clone()]])
                .into_connection(),
        );

        let repo = TaskRepository::new(db);
        let result = repo.find_in_org("t1", "org1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().title, "Close the till");
    }

    #[tokio::test]
    async fn test_list_attachments_returns_metadata_rows() {
        let attachment = task_attachment::Model {
            id: "a1".to_string(),
            task_id: "t1".to_string(),
            file_name: "checklist.pdf".to_string(),
            file_url: Some("https://files.example.com/checklist.pdf".to_string()),
            file_type: Some("application/pdf".to_string()),
            file_size: 2048,
            uploaded_by: Some("u1".to_string()),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[attachment]])
                .into_connection(),
        );

        let repo = TaskRepository::new(db);
        let attachments = repo.list_attachments("t1").await.unwrap();

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].file_name, "checklist.pdf");
    }

    #[tokio::test]
    async fn test_spawn_exists_false_when_no_match() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<task::Model>::new()])
                .into_connection(),
        );

        let repo = TaskRepository::new(db);
        let exists = repo.spawn_exists("t1", Utc::now()).await.unwrap();

        assert!(!exists);
    }
}
