//! Task template endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use opsboard_common::AppResult;
use opsboard_core::{InstantiateOverrides, TemplateDetail, TemplateInput};
use opsboard_db::entities::task::{Priority, Recurrence};
use opsboard_db::entities::{task_template, template_subtask};
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

use super::tasks::TaskResponse;

/// Template response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub recurrence: Recurrence,
    pub recurrence_details: Option<serde_json::Value>,
    pub category: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<task_template::Model> for TemplateResponse {
    fn from(t: task_template::Model) -> Self {
        Self {
            id: t.id,
            organization_id: t.organization_id,
            name: t.name,
            description: t.description,
            priority: t.priority,
            recurrence: t.recurrence,
            recurrence_details: t.recurrence_details,
            category: t.category,
            created_by: t.created_by,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

/// Template subtask response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSubtaskResponse {
    pub id: String,
    pub title: String,
    pub position: i32,
}

impl From<template_subtask::Model> for TemplateSubtaskResponse {
    fn from(s: template_subtask::Model) -> Self {
        Self {
            id: s.id,
            title: s.title,
            position: s.position,
        }
    }
}

/// Template detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetailResponse {
    #[serde(flatten)]
    pub template: TemplateResponse,
    pub subtasks: Vec<TemplateSubtaskResponse>,
}

impl From<TemplateDetail> for TemplateDetailResponse {
    fn from(d: TemplateDetail) -> Self {
        Self {
            template: d.template.into(),
            subtasks: d.subtasks.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create/update template request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    pub name: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub recurrence: Option<Recurrence>,
    pub recurrence_details: Option<serde_json::Value>,
    pub category: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<String>,
}

impl From<TemplateRequest> for TemplateInput {
    fn from(req: TemplateRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            priority: req.priority,
            recurrence: req.recurrence,
            recurrence_details: req.recurrence_details,
            category: req.category,
            subtasks: req.subtasks,
        }
    }
}

/// Instantiate request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantiateRequest {
    pub title: Option<String>,
    pub project_id: Option<String>,
    pub outlet_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<InstantiateRequest> for InstantiateOverrides {
    fn from(req: InstantiateRequest) -> Self {
        Self {
            title: req.title,
            project_id: req.project_id,
            outlet_id: req.outlet_id,
            due_date: req.due_date,
        }
    }
}

/// List the organization's templates.
async fn list_templates(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TemplateResponse>>> {
    let templates = state.template_service.list(&ctx).await?;

    Ok(ApiResponse::ok(
        templates.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one template with its subtasks.
async fn get_template(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TemplateDetailResponse>> {
    let detail = state.template_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// Create a template.
async fn create_template(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<TemplateRequest>,
) -> AppResult<ApiResponse<TemplateResponse>> {
    let template = state.template_service.create(&ctx, req.into()).await?;

    Ok(ApiResponse::ok(template.into()))
}

/// Update a template, replacing its subtasks.
async fn update_template(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TemplateRequest>,
) -> AppResult<ApiResponse<TemplateResponse>> {
    let template = state
        .template_service
        .update(&ctx, &id, req.into())
        .await?;

    Ok(ApiResponse::ok(template.into()))
}

/// Instantiate a template into a task with subtasks.
async fn instantiate(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InstantiateRequest>,
) -> AppResult<ApiResponse<TaskResponse>> {
    let task = state
        .template_service
        .instantiate(&ctx, &id, req.into())
        .await?;

    Ok(ApiResponse::ok(task.into()))
}

/// Move a template to the trash.
async fn trash_template(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.template_service.soft_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Delete a template permanently.
async fn delete_template(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.template_service.hard_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Create the templates router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route(
            "/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/{id}/instantiate", post(instantiate))
        .route("/{id}/trash", post(trash_template))
}
