//! Heuristic assistant endpoints.

use axum::{extract::State, routing::post, Json, Router};
use opsboard_common::AppResult;
use opsboard_core::assist::{
    DelayPrediction, PriorityPrediction, SimilarMatch, TaskSuggestion, WorkloadEntry,
    WorkloadReport, WorkloadSuggestion,
};
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Suggest-tasks request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTasksRequest {
    /// How many suggestions to produce (default 3, max 10).
    #[serde(default = "default_count")]
    pub count: usize,
}

const fn default_count() -> usize {
    3
}

/// Task suggestion response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSuggestionResponse {
    pub title: String,
    pub priority: String,
    pub due_date: String,
    pub reason: String,
}

impl From<TaskSuggestion> for TaskSuggestionResponse {
    fn from(s: TaskSuggestion) -> Self {
        Self {
            title: s.title,
            priority: s.priority,
            due_date: s.due_date.to_rfc3339(),
            reason: s.reason,
        }
    }
}

/// Predict-priority request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictPriorityRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Priority prediction response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityPredictionResponse {
    pub predicted_priority: String,
    pub confidence: f64,
    pub reason: String,
}

impl From<PriorityPrediction> for PriorityPredictionResponse {
    fn from(p: PriorityPrediction) -> Self {
        Self {
            predicted_priority: p.predicted_priority,
            confidence: p.confidence,
            reason: p.reason,
        }
    }
}

/// Predict-delay request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictDelayRequest {
    pub task_id: String,
}

/// Delay prediction response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayPredictionResponse {
    pub delay_probability: f64,
    pub risk_level: String,
    pub suggestion: String,
    pub confidence: f64,
}

impl From<DelayPrediction> for DelayPredictionResponse {
    fn from(p: DelayPrediction) -> Self {
        Self {
            delay_probability: p.delay_probability,
            risk_level: p.risk_level,
            suggestion: p.suggestion,
            confidence: p.confidence,
        }
    }
}

/// Find-similar request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindSimilarRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Similar-task response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarMatchResponse {
    pub task_id: String,
    pub title: String,
    pub status: String,
    pub similarity: f64,
}

impl From<SimilarMatch> for SimilarMatchResponse {
    fn from(m: SimilarMatch) -> Self {
        Self {
            task_id: m.task_id,
            title: m.title,
            status: m.status,
            similarity: m.similarity,
        }
    }
}

/// Per-member workload row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEntryResponse {
    pub member_id: String,
    pub name: String,
    pub active_tasks: usize,
    pub total_points: i64,
}

impl From<WorkloadEntry> for WorkloadEntryResponse {
    fn from(e: WorkloadEntry) -> Self {
        Self {
            member_id: e.member_id,
            name: e.name,
            active_tasks: e.active_tasks,
            total_points: e.total_points,
        }
    }
}

/// One suggested reassignment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSuggestionResponse {
    pub from_member: String,
    pub to_member: String,
    pub task_count: usize,
    pub reason: String,
}

impl From<WorkloadSuggestion> for WorkloadSuggestionResponse {
    fn from(s: WorkloadSuggestion) -> Self {
        Self {
            from_member: s.from_member,
            to_member: s.to_member,
            task_count: s.task_count,
            reason: s.reason,
        }
    }
}

/// Workload balance response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReportResponse {
    pub workload: Vec<WorkloadEntryResponse>,
    pub average_tasks: f64,
    pub suggestions: Vec<WorkloadSuggestionResponse>,
    pub summary: String,
    pub confidence: f64,
}

impl From<WorkloadReport> for WorkloadReportResponse {
    fn from(r: WorkloadReport) -> Self {
        Self {
            workload: r.workload.into_iter().map(Into::into).collect(),
            average_tasks: r.average_tasks,
            suggestions: r.suggestions.into_iter().map(Into::into).collect(),
            summary: r.summary,
            confidence: r.confidence,
        }
    }
}

/// Summary request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub task_id: String,
}

/// Summary response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub summary: String,
}

/// Suggest tasks the organization does not already have.
async fn suggest_tasks(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<SuggestTasksRequest>,
) -> AppResult<ApiResponse<Vec<TaskSuggestionResponse>>> {
    let suggestions = state.assist_service.suggest_tasks(&ctx, req.count).await?;

    Ok(ApiResponse::ok(
        suggestions.into_iter().map(Into::into).collect(),
    ))
}

/// Predict a priority label for draft task text.
async fn predict_priority(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<PredictPriorityRequest>,
) -> AppResult<ApiResponse<PriorityPredictionResponse>> {
    let prediction = state
        .assist_service
        .predict_priority(&ctx, &req.title, &req.description)
        .await?;

    Ok(ApiResponse::ok(prediction.into()))
}

/// Score the risk that a task slips its deadline.
async fn predict_delay(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<PredictDelayRequest>,
) -> AppResult<ApiResponse<DelayPredictionResponse>> {
    let prediction = state
        .assist_service
        .predict_delay(&ctx, &req.task_id)
        .await?;

    Ok(ApiResponse::ok(prediction.into()))
}

/// Find existing tasks similar to the given text.
async fn find_similar(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<FindSimilarRequest>,
) -> AppResult<ApiResponse<Vec<SimilarMatchResponse>>> {
    let matches = state
        .assist_service
        .find_similar(&ctx, &req.title, &req.description)
        .await?;

    Ok(ApiResponse::ok(
        matches.into_iter().map(Into::into).collect(),
    ))
}

/// Compare member workloads and suggest reassignments.
async fn balance_workload(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<WorkloadReportResponse>> {
    let report = state.assist_service.balance_workload(&ctx).await?;

    Ok(ApiResponse::ok(report.into()))
}

/// One-paragraph summary of a task.
async fn summary(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<SummaryRequest>,
) -> AppResult<ApiResponse<SummaryResponse>> {
    let summary = state.assist_service.summarize(&ctx, &req.task_id).await?;

    Ok(ApiResponse::ok(SummaryResponse { summary }))
}

/// Create the assist router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suggest-tasks", post(suggest_tasks))
        .route("/predict-priority", post(predict_priority))
        .route("/predict-delay", post(predict_delay))
        .route("/find-similar", post(find_similar))
        .route("/balance-workload", post(balance_workload))
        .route("/summary", post(summary))
}
