//! Issue endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use opsboard_common::AppResult;
use opsboard_core::IssueInput;
use opsboard_db::entities::issue::{self, IssueStatus};
use opsboard_db::entities::task::Priority;
use opsboard_db::repositories::IssueFilter;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Issue response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub id: String,
    pub organization_id: String,
    pub outlet_id: Option<String>,
    pub team_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: IssueStatus,
    pub priority: Priority,
    pub resolved_at: Option<String>,
    pub tags: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<issue::Model> for IssueResponse {
    fn from(i: issue::Model) -> Self {
        Self {
            id: i.id,
            organization_id: i.organization_id,
            outlet_id: i.outlet_id,
            team_id: i.team_id,
            title: i.title,
            description: i.description,
            status: i.status,
            priority: i.priority,
            resolved_at: i.resolved_at.map(|d| d.to_rfc3339()),
            tags: i.tags,
            created_by: i.created_by,
            created_at: i.created_at.to_rfc3339(),
            updated_at: i.updated_at.to_rfc3339(),
        }
    }
}

/// Create/update issue request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub outlet_id: Option<String>,
    pub team_id: Option<String>,
    pub tags: Option<String>,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
}

impl From<IssueRequest> for IssueInput {
    fn from(req: IssueRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority,
            outlet_id: req.outlet_id,
            team_id: req.team_id,
            tags: req.tags,
            assignee_ids: req.assignee_ids,
        }
    }
}

/// Issue list filters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIssuesQuery {
    pub outlet_id: Option<String>,
    pub status: Option<IssueStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<String>,
    pub search: Option<String>,
}

impl From<ListIssuesQuery> for IssueFilter {
    fn from(q: ListIssuesQuery) -> Self {
        Self {
            outlet_id: q.outlet_id,
            status: q.status,
            priority: q.priority,
            assignee_id: q.assignee_id,
            search: q.search,
        }
    }
}

/// Set-status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status: IssueStatus,
}

/// Assignment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assignee_ids: Vec<String>,
}

/// List the organization's issues.
async fn list_issues(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Query(query): Query<ListIssuesQuery>,
) -> AppResult<ApiResponse<Vec<IssueResponse>>> {
    let issues = state.issue_service.list(&ctx, query.into()).await?;

    Ok(ApiResponse::ok(
        issues.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one issue.
async fn get_issue(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<IssueResponse>> {
    let issue = state.issue_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(issue.into()))
}

/// Assignee ids of one issue.
async fn get_assignees(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<String>>> {
    let ids = state.issue_service.assignees(&ctx, &id).await?;

    Ok(ApiResponse::ok(ids))
}

/// Create an issue.
async fn create_issue(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<IssueRequest>,
) -> AppResult<ApiResponse<IssueResponse>> {
    let issue = state.issue_service.create(&ctx, req.into()).await?;

    Ok(ApiResponse::ok(issue.into()))
}

/// Update an issue.
async fn update_issue(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<IssueRequest>,
) -> AppResult<ApiResponse<IssueResponse>> {
    let issue = state.issue_service.update(&ctx, &id, req.into()).await?;

    Ok(ApiResponse::ok(issue.into()))
}

/// Move an issue to a new status.
async fn set_status(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<ApiResponse<IssueResponse>> {
    let issue = state
        .issue_service
        .set_status(&ctx, &id, req.status)
        .await?;

    Ok(ApiResponse::ok(issue.into()))
}

/// Replace the assignee set.
async fn assign(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> AppResult<ApiResponse<Vec<String>>> {
    state
        .issue_service
        .assign(&ctx, &id, req.assignee_ids)
        .await?;
    let ids = state.issue_service.assignees(&ctx, &id).await?;

    Ok(ApiResponse::ok(ids))
}

/// Move an issue to the trash.
async fn trash_issue(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.issue_service.soft_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Delete an issue permanently.
async fn delete_issue(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.issue_service.hard_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Create the issues router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_issues).post(create_issue))
        .route(
            "/{id}",
            get(get_issue).put(update_issue).delete(delete_issue),
        )
        .route("/{id}/status", post(set_status))
        .route("/{id}/assignees", get(get_assignees))
        .route("/{id}/assign", post(assign))
        .route("/{id}/trash", post(trash_issue))
}
