//! Task endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use opsboard_common::AppResult;
use opsboard_core::{AttachmentInput, TaskDetail, TaskInput};
use opsboard_db::entities::task::{self, Priority, Recurrence, TaskStatus, TaskType};
use opsboard_db::entities::{task_attachment, task_comment, task_step};
use opsboard_db::repositories::TaskFilter;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Task response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub organization_id: String,
    pub project_id: Option<String>,
    pub outlet_id: Option<String>,
    pub team_id: Option<String>,
    pub parent_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub sop_content: Option<String>,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub points: i32,
    pub recurrence: Recurrence,
    pub recurrence_details: Option<serde_json::Value>,
    pub needs_approval: bool,
    pub is_starred: bool,
    pub assist_summary: Option<String>,
    pub assist_priority_hint: Option<String>,
    pub tags: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<task::Model> for TaskResponse {
    fn from(t: task::Model) -> Self {
        Self {
            id: t.id,
            organization_id: t.organization_id,
            project_id: t.project_id,
            outlet_id: t.outlet_id,
            team_id: t.team_id,
            parent_id: t.parent_id,
            title: t.title,
            description: t.description,
            sop_content: t.sop_content,
            task_type: t.task_type,
            status: t.status,
            priority: t.priority,
            category: t.category,
            start_date: t.start_date.map(|d| d.to_rfc3339()),
            due_date: t.due_date.map(|d| d.to_rfc3339()),
            completed_at: t.completed_at.map(|d| d.to_rfc3339()),
            points: t.points,
            recurrence: t.recurrence,
            recurrence_details: t.recurrence_details,
            needs_approval: t.needs_approval,
            is_starred: t.is_starred,
            assist_summary: t.assist_summary,
            assist_priority_hint: t.assist_priority_hint,
            tags: t.tags,
            created_by: t.created_by,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

/// Checklist step response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStepResponse {
    pub id: String,
    pub title: String,
    pub position: i32,
    pub is_completed: bool,
    pub completed_by: Option<String>,
    pub completed_at: Option<String>,
}

impl From<task_step::Model> for TaskStepResponse {
    fn from(s: task_step::Model) -> Self {
        Self {
            id: s.id,
            title: s.title,
            position: s.position,
            is_completed: s.is_completed,
            completed_by: s.completed_by,
            completed_at: s.completed_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Comment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCommentResponse {
    pub id: String,
    pub author_id: Option<String>,
    pub body: String,
    pub created_at: String,
}

impl From<task_comment::Model> for TaskCommentResponse {
    fn from(c: task_comment::Model) -> Self {
        Self {
            id: c.id,
            author_id: c.author_id,
            body: c.body,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Task attachment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttachmentResponse {
    pub id: String,
    pub file_name: String,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub file_size: i64,
    pub uploaded_by: Option<String>,
    pub created_at: String,
}

impl From<task_attachment::Model> for TaskAttachmentResponse {
    fn from(a: task_attachment::Model) -> Self {
        Self {
            id: a.id,
            file_name: a.file_name,
            file_url: a.file_url,
            file_type: a.file_type,
            file_size: a.file_size,
            uploaded_by: a.uploaded_by,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Task detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailResponse {
    #[serde(flatten)]
    pub task: TaskResponse,
    pub assignee_ids: Vec<String>,
    pub steps: Vec<TaskStepResponse>,
    pub comments: Vec<TaskCommentResponse>,
    pub attachments: Vec<TaskAttachmentResponse>,
    pub subtasks: Vec<TaskResponse>,
}

impl From<TaskDetail> for TaskDetailResponse {
    fn from(d: TaskDetail) -> Self {
        Self {
            task: d.task.into(),
            assignee_ids: d.assignee_ids,
            steps: d.steps.into_iter().map(Into::into).collect(),
            comments: d.comments.into_iter().map(Into::into).collect(),
            attachments: d.attachments.into_iter().map(Into::into).collect(),
            subtasks: d.subtasks.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create/update task request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub sop_content: Option<String>,
    pub task_type: Option<TaskType>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub project_id: Option<String>,
    pub outlet_id: Option<String>,
    pub team_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub points: Option<i32>,
    pub recurrence: Option<Recurrence>,
    pub recurrence_details: Option<serde_json::Value>,
    pub tags: Option<String>,
    pub needs_approval: Option<bool>,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
}

impl From<TaskRequest> for TaskInput {
    fn from(req: TaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            sop_content: req.sop_content,
            task_type: req.task_type,
            priority: req.priority,
            category: req.category,
            project_id: req.project_id,
            outlet_id: req.outlet_id,
            team_id: req.team_id,
            start_date: req.start_date,
            due_date: req.due_date,
            points: req.points,
            recurrence: req.recurrence,
            recurrence_details: req.recurrence_details,
            tags: req.tags,
            needs_approval: req.needs_approval,
            assignee_ids: req.assignee_ids,
        }
    }
}

/// Task list filters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    pub outlet_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub starred_only: bool,
}

impl From<ListTasksQuery> for TaskFilter {
    fn from(q: ListTasksQuery) -> Self {
        Self {
            outlet_id: q.outlet_id,
            project_id: q.project_id,
            status: q.status,
            priority: q.priority,
            assignee_id: q.assignee_id,
            search: q.search,
            starred_only: q.starred_only,
        }
    }
}

/// Set-status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status: TaskStatus,
}

/// Assignment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assignee_ids: Vec<String>,
}

/// Add-step request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStepRequest {
    pub title: String,
}

/// Add-comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    pub body: String,
}

/// Add-subtask request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSubtaskRequest {
    pub title: String,
}

/// Add-attachment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttachmentRequest {
    pub file_name: String,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_size: i64,
}

impl From<AddAttachmentRequest> for AttachmentInput {
    fn from(req: AddAttachmentRequest) -> Self {
        Self {
            file_name: req.file_name,
            file_url: req.file_url,
            file_type: req.file_type,
            file_size: req.file_size,
        }
    }
}

/// List the organization's tasks.
async fn list_tasks(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> AppResult<ApiResponse<Vec<TaskResponse>>> {
    let tasks = state.task_service.list(&ctx, query.into()).await?;

    Ok(ApiResponse::ok(
        tasks.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one task with assignees, steps, comments and subtasks.
async fn get_task(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TaskDetailResponse>> {
    let detail = state.task_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// Create a task.
async fn create_task(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<TaskRequest>,
) -> AppResult<ApiResponse<TaskResponse>> {
    let task = state.task_service.create(&ctx, req.into()).await?;

    Ok(ApiResponse::ok(task.into()))
}

/// Update a task.
async fn update_task(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TaskRequest>,
) -> AppResult<ApiResponse<TaskResponse>> {
    let task = state.task_service.update(&ctx, &id, req.into()).await?;

    Ok(ApiResponse::ok(task.into()))
}

/// Move a task to a new status.
async fn set_status(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<ApiResponse<TaskResponse>> {
    let task = state.task_service.set_status(&ctx, &id, req.status).await?;

    Ok(ApiResponse::ok(task.into()))
}

/// Toggle the star flag.
async fn toggle_star(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TaskResponse>> {
    let task = state.task_service.toggle_star(&ctx, &id).await?;

    Ok(ApiResponse::ok(task.into()))
}

/// Replace the assignee set.
async fn assign(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> AppResult<ApiResponse<TaskDetailResponse>> {
    state
        .task_service
        .assign(&ctx, &id, req.assignee_ids)
        .await?;
    let detail = state.task_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// Move a task to the trash.
async fn trash_task(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.task_service.soft_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Delete a task permanently.
async fn delete_task(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.task_service.hard_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Append a checklist step.
async fn add_step(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddStepRequest>,
) -> AppResult<ApiResponse<TaskStepResponse>> {
    let step = state.task_service.add_step(&ctx, &id, &req.title).await?;

    Ok(ApiResponse::ok(step.into()))
}

/// Flip a checklist step.
async fn toggle_step(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path((id, step_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<TaskStepResponse>> {
    let step = state.task_service.toggle_step(&ctx, &id, &step_id).await?;

    Ok(ApiResponse::ok(step.into()))
}

/// Comment on a task.
async fn add_comment(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddCommentRequest>,
) -> AppResult<ApiResponse<TaskCommentResponse>> {
    let comment = state.task_service.add_comment(&ctx, &id, &req.body).await?;

    Ok(ApiResponse::ok(comment.into()))
}

/// Record attachment metadata against a task.
async fn add_attachment(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddAttachmentRequest>,
) -> AppResult<ApiResponse<TaskAttachmentResponse>> {
    let attachment = state
        .task_service
        .add_attachment(&ctx, &id, req.into())
        .await?;

    Ok(ApiResponse::ok(attachment.into()))
}

/// Remove an attachment's metadata row.
async fn remove_attachment(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path((id, attachment_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .task_service
        .remove_attachment(&ctx, &id, &attachment_id)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Add a subtask under a top-level task.
async fn add_subtask(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddSubtaskRequest>,
) -> AppResult<ApiResponse<TaskResponse>> {
    let subtask = state.task_service.add_subtask(&ctx, &id, &req.title).await?;

    Ok(ApiResponse::ok(subtask.into()))
}

/// Create the tasks router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
        .route("/{id}/status", post(set_status))
        .route("/{id}/star", post(toggle_star))
        .route("/{id}/assign", post(assign))
        .route("/{id}/trash", post(trash_task))
        .route("/{id}/steps", post(add_step))
        .route("/{id}/steps/{stepId}/toggle", post(toggle_step))
        .route("/{id}/comments", post(add_comment))
        .route("/{id}/attachments", post(add_attachment))
        .route(
            "/{id}/attachments/{attachmentId}",
            delete(remove_attachment),
        )
        .route("/{id}/subtasks", post(add_subtask))
}
