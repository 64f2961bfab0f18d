//! User administration endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use opsboard_common::AppResult;
use opsboard_core::{CreateUserInput, UpdateUserInput};
use opsboard_db::entities::user_profile;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// User profile response. Credential and raw HR fields never leave the
/// server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub full_name: String,
    pub employee_id: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub points: i32,
    pub organization_id: String,
    pub outlet_id: Option<String>,
    pub team_id: Option<String>,
    pub role_id: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<String>,
    pub created_at: String,
}

impl From<user_profile::Model> for UserProfileResponse {
    fn from(p: user_profile::Model) -> Self {
        Self {
            id: p.id,
            username: p.username,
            email: p.email,
            full_name: p.full_name,
            employee_id: p.employee_id,
            phone: p.phone,
            department: p.department,
            designation: p.designation,
            points: p.points,
            organization_id: p.organization_id,
            outlet_id: p.outlet_id,
            team_id: p.team_id,
            role_id: p.role_id,
            is_active: p.is_active,
            last_login_at: p.last_login_at.map(|t| t.to_rfc3339()),
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Create-user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub outlet_id: Option<String>,
    pub team_id: Option<String>,
    pub role_id: Option<String>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            phone: req.phone,
            department: req.department,
            designation: req.designation,
            outlet_id: req.outlet_id,
            team_id: req.team_id,
            role_id: req.role_id,
        }
    }
}

/// Update-user request. A field set to `null` clears the assignment; a
/// field left out keeps it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub outlet_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub team_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub role_id: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Distinguishes an absent field (outer `None`) from an explicit JSON
/// `null` (`Some(None)`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            phone: req.phone,
            department: req.department,
            designation: req.designation,
            outlet_id: req.outlet_id,
            team_id: req.team_id,
            role_id: req.role_id,
            is_active: req.is_active,
        }
    }
}

/// List the organization's members.
async fn list_users(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<UserProfileResponse>>> {
    let users = state.user_service.list(&ctx).await?;

    Ok(ApiResponse::ok(
        users.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one member.
async fn get_user(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserProfileResponse>> {
    let user = state.user_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(user.into()))
}

/// Create a member in the current organization.
async fn create_user(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<ApiResponse<UserProfileResponse>> {
    let user = state.user_service.create(&ctx, req.into()).await?;

    Ok(ApiResponse::ok(user.into()))
}

/// Update a member. Deactivating revokes their sessions.
async fn update_user(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserProfileResponse>> {
    let user = state.user_service.update(&ctx, &id, req.into()).await?;

    Ok(ApiResponse::ok(user.into()))
}

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user))
}
