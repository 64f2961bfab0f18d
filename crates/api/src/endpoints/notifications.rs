//! Notification endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use opsboard_common::AppResult;
use opsboard_db::entities::notification::{self, NotificationPriority, NotificationType};
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Notification list query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    /// Maximum results (default 50, max 100).
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Only unread notifications.
    #[serde(default)]
    pub unread_only: bool,
}

const fn default_limit() -> u64 {
    50
}

/// Notification response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            notification_type: n.notification_type,
            priority: n.priority,
            title: n.title,
            message: n.message,
            link: n.link,
            entity_type: n.entity_type,
            entity_id: n.entity_id,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Notification list response with the unread count.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: u64,
}

/// Read-all response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadAllResponse {
    pub marked: u64,
}

/// List the caller's notifications, newest first.
async fn list_notifications(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<NotificationsListResponse>> {
    let limit = query.limit.min(100);
    let notifications = state
        .notification_service
        .list(&ctx.profile.id, limit, query.unread_only)
        .await?;
    let unread_count = state
        .notification_service
        .unread_count(&ctx.profile.id)
        .await?;

    Ok(ApiResponse::ok(NotificationsListResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
        unread_count,
    }))
}

/// Mark one notification as read.
async fn mark_read(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .notification_service
        .mark_read(&id, &ctx.profile.id)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Mark all of the caller's notifications as read.
async fn read_all(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ReadAllResponse>> {
    let marked = state
        .notification_service
        .mark_all_read(&ctx.profile.id)
        .await?;

    Ok(ApiResponse::ok(ReadAllResponse { marked }))
}

/// Create the notifications router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read-all", post(read_all))
        .route("/{id}/read", post(mark_read))
}
