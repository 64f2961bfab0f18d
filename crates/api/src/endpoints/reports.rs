//! Aggregate report endpoints.

use axum::{extract::State, routing::get, Router};
use chrono::Utc;
use opsboard_common::AppResult;
use opsboard_core::{EmployeeIssueRow, EmployeeTaskRow, OutletIssueRow, OutletTaskRow};
use serde::Serialize;

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// One row of the per-outlet task report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletTaskRowResponse {
    pub outlet_id: String,
    pub outlet_name: String,
    pub total: u64,
    pub completed: u64,
    pub ongoing: u64,
    pub overdue: u64,
    pub on_hold: u64,
}

impl From<OutletTaskRow> for OutletTaskRowResponse {
    fn from(r: OutletTaskRow) -> Self {
        Self {
            outlet_id: r.outlet_id,
            outlet_name: r.outlet_name,
            total: r.total,
            completed: r.completed,
            ongoing: r.ongoing,
            overdue: r.overdue,
            on_hold: r.on_hold,
        }
    }
}

/// One row of the per-outlet issue report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletIssueRowResponse {
    pub outlet_id: String,
    pub outlet_name: String,
    pub total: u64,
    pub open: u64,
    pub resolved: u64,
    pub ignored: u64,
    pub closed: u64,
}

impl From<OutletIssueRow> for OutletIssueRowResponse {
    fn from(r: OutletIssueRow) -> Self {
        Self {
            outlet_id: r.outlet_id,
            outlet_name: r.outlet_name,
            total: r.total,
            open: r.open,
            resolved: r.resolved,
            ignored: r.ignored,
            closed: r.closed,
        }
    }
}

/// One row of the per-member task report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeTaskRowResponse {
    pub profile_id: String,
    pub full_name: String,
    pub total: u64,
    pub completed: u64,
    pub overdue: u64,
    pub completed_points: i64,
}

impl From<EmployeeTaskRow> for EmployeeTaskRowResponse {
    fn from(r: EmployeeTaskRow) -> Self {
        Self {
            profile_id: r.profile_id,
            full_name: r.full_name,
            total: r.total,
            completed: r.completed,
            overdue: r.overdue,
            completed_points: r.completed_points,
        }
    }
}

/// One row of the per-member issue report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeIssueRowResponse {
    pub profile_id: String,
    pub full_name: String,
    pub total: u64,
    pub open: u64,
    pub resolved: u64,
}

impl From<EmployeeIssueRow> for EmployeeIssueRowResponse {
    fn from(r: EmployeeIssueRow) -> Self {
        Self {
            profile_id: r.profile_id,
            full_name: r.full_name,
            total: r.total,
            open: r.open,
            resolved: r.resolved,
        }
    }
}

/// Per-outlet task rollup.
async fn outlet_tasks(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<OutletTaskRowResponse>>> {
    let rows = state
        .report_service
        .outlet_task_report(&ctx, Utc::now())
        .await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Per-outlet issue rollup.
async fn outlet_issues(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<OutletIssueRowResponse>>> {
    let rows = state
        .report_service
        .outlet_issue_report(&ctx, Utc::now())
        .await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Per-member task rollup.
async fn employee_tasks(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<EmployeeTaskRowResponse>>> {
    let rows = state
        .report_service
        .employee_task_report(&ctx, Utc::now())
        .await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Per-member issue rollup.
async fn employee_issues(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<EmployeeIssueRowResponse>>> {
    let rows = state
        .report_service
        .employee_issue_report(&ctx, Utc::now())
        .await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Create the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/outlet-tasks", get(outlet_tasks))
        .route("/outlet-issues", get(outlet_issues))
        .route("/employee-tasks", get(employee_tasks))
        .route("/employee-issues", get(employee_issues))
}
