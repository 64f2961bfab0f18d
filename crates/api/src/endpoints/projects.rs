//! Project endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use opsboard_common::AppResult;
use opsboard_core::ProjectInput;
use opsboard_db::entities::project::{self, ProjectStatus};
use opsboard_db::repositories::ProjectFilter;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Project response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: String,
    pub organization_id: String,
    pub outlet_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_by: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<project::Model> for ProjectResponse {
    fn from(p: project::Model) -> Self {
        Self {
            id: p.id,
            organization_id: p.organization_id,
            outlet_id: p.outlet_id,
            name: p.name,
            description: p.description,
            status: p.status,
            start_date: p.start_date.map(|d| d.to_rfc3339()),
            end_date: p.end_date.map(|d| d.to_rfc3339()),
            created_by: p.created_by,
            is_active: p.is_active,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

/// Create/update project request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub outlet_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<ProjectRequest> for ProjectInput {
    fn from(req: ProjectRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            status: req.status,
            outlet_id: req.outlet_id,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// Project list filters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsQuery {
    pub outlet_id: Option<String>,
    pub status: Option<ProjectStatus>,
    pub search: Option<String>,
}

impl From<ListProjectsQuery> for ProjectFilter {
    fn from(q: ListProjectsQuery) -> Self {
        Self {
            outlet_id: q.outlet_id,
            status: q.status,
            search: q.search,
        }
    }
}

/// Membership request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMembersRequest {
    pub member_ids: Vec<String>,
}

/// List the organization's projects.
async fn list_projects(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> AppResult<ApiResponse<Vec<ProjectResponse>>> {
    let projects = state.project_service.list(&ctx, query.into()).await?;

    Ok(ApiResponse::ok(
        projects.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one project.
async fn get_project(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProjectResponse>> {
    let project = state.project_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(project.into()))
}

/// Member ids of one project.
async fn get_members(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<String>>> {
    let ids = state.project_service.members(&ctx, &id).await?;

    Ok(ApiResponse::ok(ids))
}

/// Create a project.
async fn create_project(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<ProjectRequest>,
) -> AppResult<ApiResponse<ProjectResponse>> {
    let project = state.project_service.create(&ctx, req.into()).await?;

    Ok(ApiResponse::ok(project.into()))
}

/// Update a project.
async fn update_project(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProjectRequest>,
) -> AppResult<ApiResponse<ProjectResponse>> {
    let project = state.project_service.update(&ctx, &id, req.into()).await?;

    Ok(ApiResponse::ok(project.into()))
}

/// Replace the member set.
async fn set_members(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetMembersRequest>,
) -> AppResult<ApiResponse<Vec<String>>> {
    state
        .project_service
        .set_members(&ctx, &id, req.member_ids)
        .await?;
    let ids = state.project_service.members(&ctx, &id).await?;

    Ok(ApiResponse::ok(ids))
}

/// Move a project to the trash.
async fn trash_project(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.project_service.soft_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Delete a project permanently.
async fn delete_project(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.project_service.hard_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Create the projects router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/{id}/members", get(get_members).post(set_members))
        .route("/{id}/trash", post(trash_project))
}
