//! Role administration endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use opsboard_common::AppResult;
use opsboard_core::{RoleInput, RoleWithPermissions};
use opsboard_db::entities::permission::{self, PermissionModule};
use opsboard_db::entities::role;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Role response with granted permission codenames.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub permissions: Vec<String>,
    pub created_at: String,
}

impl RoleResponse {
    fn from_parts(role: role::Model, permissions: Vec<String>) -> Self {
        Self {
            id: role.id,
            organization_id: role.organization_id,
            name: role.name,
            description: role.description,
            is_active: role.is_active,
            permissions,
            created_at: role.created_at.to_rfc3339(),
        }
    }
}

impl From<RoleWithPermissions> for RoleResponse {
    fn from(r: RoleWithPermissions) -> Self {
        Self::from_parts(r.role, r.permissions)
    }
}

/// Permission catalog entry response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub id: String,
    pub codename: String,
    pub name: String,
    pub description: Option<String>,
    pub module: PermissionModule,
}

impl From<permission::Model> for PermissionResponse {
    fn from(p: permission::Model) -> Self {
        Self {
            id: p.id,
            codename: p.codename,
            name: p.name,
            description: p.description,
            module: p.module,
        }
    }
}

/// Create/update role request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl From<RoleRequest> for RoleInput {
    fn from(req: RoleRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            permissions: req.permissions,
        }
    }
}

/// List the organization's roles.
async fn list_roles(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<RoleResponse>>> {
    let roles = state.role_service.list(&ctx).await?;

    Ok(ApiResponse::ok(
        roles.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one role.
async fn get_role(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RoleResponse>> {
    let role = state.role_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(role.into()))
}

/// The seeded permission catalog, for role editors.
async fn permission_catalog(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PermissionResponse>>> {
    let catalog = state.role_service.permission_catalog(&ctx).await?;

    Ok(ApiResponse::ok(
        catalog.into_iter().map(Into::into).collect(),
    ))
}

/// Create a role with its grants.
async fn create_role(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<RoleRequest>,
) -> AppResult<ApiResponse<RoleResponse>> {
    let role = state.role_service.create(&ctx, req.into()).await?;
    let role = state.role_service.get(&ctx, &role.id).await?;

    Ok(ApiResponse::ok(role.into()))
}

/// Update a role, replacing its grants.
async fn update_role(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RoleRequest>,
) -> AppResult<ApiResponse<RoleResponse>> {
    state.role_service.update(&ctx, &id, req.into()).await?;
    let role = state.role_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(role.into()))
}

/// Delete a role.
async fn delete_role(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.role_service.delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Create the roles router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/permissions", get(permission_catalog))
        .route("/{id}", get(get_role).put(update_role).delete(delete_role))
}
