//! Form endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use opsboard_common::AppResult;
use opsboard_core::FormInput;
use opsboard_db::entities::form::{self, FormStatus};
use opsboard_db::entities::form_response::{self, ResponseStatus};
use opsboard_db::repositories::FormFilter;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Form response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponseBody {
    pub id: String,
    pub organization_id: String,
    pub outlet_id: Option<String>,
    pub team_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub status: FormStatus,
    pub fields_schema: serde_json::Value,
    pub created_by: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<form::Model> for FormResponseBody {
    fn from(f: form::Model) -> Self {
        Self {
            id: f.id,
            organization_id: f.organization_id,
            outlet_id: f.outlet_id,
            team_id: f.team_id,
            name: f.name,
            description: f.description,
            status: f.status,
            fields_schema: f.fields_schema,
            created_by: f.created_by,
            is_active: f.is_active,
            created_at: f.created_at.to_rfc3339(),
            updated_at: f.updated_at.to_rfc3339(),
        }
    }
}

/// Submitted-response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub form_id: String,
    pub submitted_by: Option<String>,
    pub data: serde_json::Value,
    pub status: ResponseStatus,
    pub submitted_at: Option<String>,
    pub created_at: String,
}

impl From<form_response::Model> for SubmissionResponse {
    fn from(r: form_response::Model) -> Self {
        Self {
            id: r.id,
            form_id: r.form_id,
            submitted_by: r.submitted_by,
            data: r.data,
            status: r.status,
            submitted_at: r.submitted_at.map(|d| d.to_rfc3339()),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Create/update form request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRequest {
    pub name: String,
    pub description: Option<String>,
    pub fields_schema: serde_json::Value,
    pub status: Option<FormStatus>,
    pub outlet_id: Option<String>,
    pub team_id: Option<String>,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
}

impl From<FormRequest> for FormInput {
    fn from(req: FormRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            fields_schema: req.fields_schema,
            status: req.status,
            outlet_id: req.outlet_id,
            team_id: req.team_id,
            assignee_ids: req.assignee_ids,
        }
    }
}

/// Form list filters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFormsQuery {
    pub outlet_id: Option<String>,
    pub status: Option<FormStatus>,
    pub search: Option<String>,
}

impl From<ListFormsQuery> for FormFilter {
    fn from(q: ListFormsQuery) -> Self {
        Self {
            outlet_id: q.outlet_id,
            status: q.status,
            search: q.search,
        }
    }
}

/// Submit-response request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequest {
    pub data: serde_json::Value,
}

/// Assignment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assignee_ids: Vec<String>,
}

/// List the organization's forms.
async fn list_forms(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Query(query): Query<ListFormsQuery>,
) -> AppResult<ApiResponse<Vec<FormResponseBody>>> {
    let forms = state.form_service.list(&ctx, query.into()).await?;

    Ok(ApiResponse::ok(
        forms.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one form.
async fn get_form(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FormResponseBody>> {
    let form = state.form_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(form.into()))
}

/// Create a form.
async fn create_form(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<FormRequest>,
) -> AppResult<ApiResponse<FormResponseBody>> {
    let form = state.form_service.create(&ctx, req.into()).await?;

    Ok(ApiResponse::ok(form.into()))
}

/// Update a form.
async fn update_form(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FormRequest>,
) -> AppResult<ApiResponse<FormResponseBody>> {
    let form = state.form_service.update(&ctx, &id, req.into()).await?;

    Ok(ApiResponse::ok(form.into()))
}

/// Publish a form so it accepts responses.
async fn publish_form(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FormResponseBody>> {
    let form = state.form_service.publish(&ctx, &id).await?;

    Ok(ApiResponse::ok(form.into()))
}

/// Replace the distribution set.
async fn assign(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .form_service
        .assign(&ctx, &id, req.assignee_ids)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// List responses to a form.
async fn list_responses(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<SubmissionResponse>>> {
    let responses = state.form_service.responses(&ctx, &id).await?;

    Ok(ApiResponse::ok(
        responses.into_iter().map(Into::into).collect(),
    ))
}

/// Submit a response to a published form.
async fn submit_response(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitResponseRequest>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let response = state
        .form_service
        .submit_response(&ctx, &id, req.data)
        .await?;

    Ok(ApiResponse::ok(response.into()))
}

/// Mark a response as reviewed.
async fn review_response(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path((id, response_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let response = state
        .form_service
        .review_response(&ctx, &id, &response_id)
        .await?;

    Ok(ApiResponse::ok(response.into()))
}

/// Move a form to the trash.
async fn trash_form(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.form_service.soft_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Delete a form permanently.
async fn delete_form(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.form_service.hard_delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Create the forms router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_forms).post(create_form))
        .route("/{id}", get(get_form).put(update_form).delete(delete_form))
        .route("/{id}/publish", post(publish_form))
        .route("/{id}/assign", post(assign))
        .route("/{id}/trash", post(trash_form))
        .route("/{id}/responses", get(list_responses).post(submit_response))
        .route("/{id}/responses/{responseId}/review", post(review_response))
}
