//! Team administration endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use opsboard_common::AppResult;
use opsboard_core::TeamInput;
use opsboard_db::entities::team;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Team response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<team::Model> for TeamResponse {
    fn from(t: team::Model) -> Self {
        Self {
            id: t.id,
            organization_id: t.organization_id,
            name: t.name,
            description: t.description,
            is_active: t.is_active,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Create/update team request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    pub name: String,
    pub description: Option<String>,
}

impl From<TeamRequest> for TeamInput {
    fn from(req: TeamRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

/// List the organization's teams.
async fn list_teams(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TeamResponse>>> {
    let teams = state.team_service.list(&ctx).await?;

    Ok(ApiResponse::ok(
        teams.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one team.
async fn get_team(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TeamResponse>> {
    let team = state.team_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(team.into()))
}

/// Create a team.
async fn create_team(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<TeamRequest>,
) -> AppResult<ApiResponse<TeamResponse>> {
    let team = state.team_service.create(&ctx, req.into()).await?;

    Ok(ApiResponse::ok(team.into()))
}

/// Update a team.
async fn update_team(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TeamRequest>,
) -> AppResult<ApiResponse<TeamResponse>> {
    let team = state.team_service.update(&ctx, &id, req.into()).await?;

    Ok(ApiResponse::ok(team.into()))
}

/// Delete a team.
async fn delete_team(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.team_service.delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Create the teams router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route("/{id}", get(get_team).put(update_team).delete(delete_team))
}
