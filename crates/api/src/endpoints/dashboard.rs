//! Dashboard endpoint.

use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Router};
use opsboard_common::AppResult;
use opsboard_core::DashboardReport;
use serde::Serialize;

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

use super::activity::ActivityResponse;

/// Dashboard response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub task_status_counts: BTreeMap<String, u64>,
    pub task_priority_counts: BTreeMap<String, u64>,
    pub total_tasks: u64,
    pub total_issues: u64,
    pub total_projects: u64,
    pub recent_activity: Vec<ActivityResponse>,
}

impl From<DashboardReport> for DashboardResponse {
    fn from(r: DashboardReport) -> Self {
        Self {
            task_status_counts: r.task_status_counts,
            task_priority_counts: r.task_priority_counts,
            total_tasks: r.total_tasks,
            total_issues: r.total_issues,
            total_projects: r.total_projects,
            recent_activity: r.recent_activity.into_iter().map(Into::into).collect(),
        }
    }
}

/// Dashboard rollup for the current organization and outlet selection.
async fn dashboard(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardResponse>> {
    let report = state.report_service.dashboard(&ctx).await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Create the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}
