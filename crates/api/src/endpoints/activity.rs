//! Activity log endpoints.

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use opsboard_common::AppResult;
use opsboard_core::perms;
use opsboard_db::entities::activity_log::{self, ActivityAction};
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Activity row response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: String,
    pub actor_id: Option<String>,
    pub action: ActivityAction,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub entity_name: Option<String>,
    pub details: Option<String>,
    pub created_at: String,
}

impl From<activity_log::Model> for ActivityResponse {
    fn from(a: activity_log::Model) -> Self {
        Self {
            id: a.id,
            actor_id: a.actor_id,
            action: a.action,
            entity_type: a.entity_type,
            entity_id: a.entity_id,
            entity_name: a.entity_name,
            details: a.details,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Activity list query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActivityQuery {
    /// Maximum results (default 50, max 200).
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    50
}

/// Most recent activity of the organization.
async fn list_activity(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Query(query): Query<ListActivityQuery>,
) -> AppResult<ApiResponse<Vec<ActivityResponse>>> {
    state
        .access
        .require(&ctx.profile, perms::MANAGE_SETTINGS)
        .await?;

    let rows = state
        .activity_service
        .recent(&ctx, query.limit.min(200))
        .await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Create the activity router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_activity))
}
