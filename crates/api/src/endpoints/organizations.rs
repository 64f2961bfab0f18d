//! Organization endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use opsboard_common::AppResult;
use opsboard_core::OrganizationInput;
use opsboard_db::entities::organization;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Organization response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<organization::Model> for OrganizationResponse {
    fn from(o: organization::Model) -> Self {
        Self {
            id: o.id,
            name: o.name,
            code: o.code,
            address: o.address,
            phone: o.phone,
            email: o.email,
            website: o.website,
            is_active: o.is_active,
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

/// Create/update organization request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRequest {
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl From<OrganizationRequest> for OrganizationInput {
    fn from(req: OrganizationRequest) -> Self {
        Self {
            name: req.name,
            code: req.code,
            address: req.address,
            phone: req.phone,
            email: req.email,
            website: req.website,
        }
    }
}

/// Active organizations, for the switcher.
async fn list_organizations(
    Ctx(_ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<OrganizationResponse>>> {
    let orgs = state.organization_service.list_active().await?;

    Ok(ApiResponse::ok(orgs.into_iter().map(Into::into).collect()))
}

/// Fetch one organization.
async fn get_organization(
    Ctx(_ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrganizationResponse>> {
    let org = state.organization_service.get(&id).await?;

    Ok(ApiResponse::ok(org.into()))
}

/// Create an organization.
async fn create_organization(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<OrganizationRequest>,
) -> AppResult<ApiResponse<OrganizationResponse>> {
    let org = state.organization_service.create(&ctx, req.into()).await?;

    Ok(ApiResponse::ok(org.into()))
}

/// Update an organization.
async fn update_organization(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<OrganizationRequest>,
) -> AppResult<ApiResponse<OrganizationResponse>> {
    let org = state
        .organization_service
        .update(&ctx, &id, req.into())
        .await?;

    Ok(ApiResponse::ok(org.into()))
}

/// Deactivate an organization, hiding it from the switcher.
async fn deactivate_organization(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.organization_service.deactivate(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Create the organizations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route("/{id}", get(get_organization).put(update_organization))
        .route("/{id}/deactivate", post(deactivate_organization))
}
