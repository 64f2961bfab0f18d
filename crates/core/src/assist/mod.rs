//! Heuristic assistant.
//!
//! Advisory helpers for task suggestions, priority prediction, delay risk,
//! duplicate detection and summaries. Everything here is a pure function
//! over plain inputs; callers fetch data and persist results themselves,
//! and nothing downstream treats the output as authoritative.

mod heuristic;

pub use heuristic::HeuristicAssistant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One suggested task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSuggestion {
    /// Suggested title.
    pub title: String,
    /// Suggested priority label.
    pub priority: String,
    /// Suggested due date.
    pub due_date: DateTime<Utc>,
    /// Why it was suggested.
    pub reason: String,
}

/// Outcome of priority prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityPrediction {
    /// Predicted priority label.
    pub predicted_priority: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Why the label was chosen.
    pub reason: String,
}

/// Inputs to delay-risk scoring.
#[derive(Debug, Clone, Default)]
pub struct DelayInput {
    /// Task title.
    pub title: String,
    /// Priority label.
    pub priority: String,
    /// Number of assignees.
    pub assignee_count: usize,
    /// Days until the due date. Negative when already past due.
    pub days_until_due: i64,
    /// Whether the task has subtasks.
    pub has_subtasks: bool,
}

/// Outcome of delay-risk scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayPrediction {
    /// Probability in `[0, 0.95]`.
    pub delay_probability: f64,
    /// Bucketed risk: low, medium or high.
    pub risk_level: String,
    /// What to do about it.
    pub suggestion: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// A task considered for duplicate detection.
#[derive(Debug, Clone)]
pub struct SimilarityCandidate {
    /// Task id.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: Option<String>,
    /// Status label, echoed back to the caller.
    pub status: String,
}

/// One duplicate-detection match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarMatch {
    /// Matching task id.
    pub task_id: String,
    /// Matching task title.
    pub title: String,
    /// Status label of the match.
    pub status: String,
    /// Similarity percentage, one decimal.
    pub similarity: f64,
}

/// One member's share of the active workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadEntry {
    /// Profile id.
    pub member_id: String,
    /// Display name.
    pub name: String,
    /// Active (non-completed) assigned tasks.
    pub active_tasks: usize,
    /// Points across those tasks.
    pub total_points: i64,
}

/// One rebalancing suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSuggestion {
    /// Member to take tasks from.
    pub from_member: String,
    /// Member to hand tasks to.
    pub to_member: String,
    /// How many tasks to move, capped at 3.
    pub task_count: usize,
    /// Why the move is suggested.
    pub reason: String,
}

/// Outcome of workload balancing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadReport {
    /// Per-member workload, as supplied.
    pub workload: Vec<WorkloadEntry>,
    /// Mean active tasks per member, one decimal.
    pub average_tasks: f64,
    /// Suggested moves from overloaded to underloaded members.
    pub suggestions: Vec<WorkloadSuggestion>,
    /// One-line overview.
    pub summary: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Advisory helpers over task text. Implementations must be pure: no
/// database access, all inputs passed in by the caller.
pub trait Assistant: Send + Sync {
    /// Suggest up to `count` tasks, skipping titles already present.
    fn suggest_tasks(
        &self,
        organization_name: &str,
        existing_titles: &[String],
        count: usize,
        now: DateTime<Utc>,
    ) -> Vec<TaskSuggestion>;

    /// Predict a priority label from title and description text.
    fn predict_priority(&self, title: &str, description: &str) -> PriorityPrediction;

    /// Score the risk that a task slips its deadline.
    fn predict_delay(&self, input: &DelayInput) -> DelayPrediction;

    /// Rank candidates by text similarity to the given task, best first.
    fn find_similar(
        &self,
        title: &str,
        description: &str,
        candidates: &[SimilarityCandidate],
    ) -> Vec<SimilarMatch>;

    /// Produce a one-paragraph summary for a task.
    fn generate_summary(&self, title: &str, priority: &str) -> String;

    /// Suggest moves that even out active tasks across members. A member
    /// above 1.5x the mean is overloaded, below 0.5x underloaded.
    fn balance_workload(&self, workload: &[WorkloadEntry]) -> WorkloadReport;
}
