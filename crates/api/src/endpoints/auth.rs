//! Authentication endpoints.

use axum::{extract::State, routing::post, Json, Router};
use opsboard_common::AppResult;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

use super::users::UserProfileResponse;

/// Login request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username, email or employee id.
    #[validate(length(min = 1, max = 200))]
    pub identifier: String,

    #[validate(length(min = 1, max = 200))]
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub profile: UserProfileResponse,
}

/// Sign in, via the HR identity API when configured, with local
/// credentials as the fallback.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    req.validate()?;

    let outcome = state
        .auth_service
        .login(&req.identifier, &req.password)
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        token: outcome.token,
        profile: outcome.profile.into(),
    }))
}

/// Logout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Sign out, deleting the current session.
async fn logout(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<LogoutResponse>> {
    state.auth_service.logout(&ctx).await?;

    Ok(ApiResponse::ok(LogoutResponse { ok: true }))
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}
