//! Working-context switching endpoints.

use axum::{extract::State, routing::post, Json, Router};
use opsboard_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Switch-organization request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchOrganizationRequest {
    pub organization_id: String,
}

/// Switch-outlet request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchOutletRequest {
    pub outlet_id: String,
}

/// Switch response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchResponse {
    pub ok: bool,
}

/// Move the session to another organization. Clears the outlet
/// selection as a side effect.
async fn switch_organization(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<SwitchOrganizationRequest>,
) -> AppResult<ApiResponse<SwitchResponse>> {
    state
        .context_service
        .switch_organization(&ctx.token, &req.organization_id)
        .await?;

    Ok(ApiResponse::ok(SwitchResponse { ok: true }))
}

/// Narrow the session to one outlet of the current organization.
async fn switch_outlet(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<SwitchOutletRequest>,
) -> AppResult<ApiResponse<SwitchResponse>> {
    state
        .context_service
        .switch_outlet(&ctx, &req.outlet_id)
        .await?;

    Ok(ApiResponse::ok(SwitchResponse { ok: true }))
}

/// Return the session to the all-outlets view.
async fn clear_outlet(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SwitchResponse>> {
    state.context_service.clear_outlet(&ctx).await?;

    Ok(ApiResponse::ok(SwitchResponse { ok: true }))
}

/// Create the session router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/organization", post(switch_organization))
        .route("/outlet", post(switch_outlet))
        .route("/outlet/clear", post(clear_outlet))
}
