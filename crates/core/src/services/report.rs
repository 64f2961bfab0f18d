//! Read-only reporting aggregator.
//!
//! Reports roll up tasks and issues per outlet or per member. Rollups go
//! through the report cache with a short TTL; the permission check always
//! precedes the cache read, and the cache is never consulted for
//! permission or ownership decisions.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveEnum, Set};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use opsboard_common::{AppResult, IdGenerator};
use opsboard_db::entities::activity_log;
use opsboard_db::entities::issue::{self, IssueStatus};
use opsboard_db::entities::report_cache;
use opsboard_db::entities::task::{self, TaskStatus};
use opsboard_db::repositories::{
    ActivityLogRepository, IssueRepository, OutletRepository, ProjectFilter, ProjectRepository,
    ReportCacheRepository, TaskRepository, UserProfileRepository,
};

use crate::services::access::{perms, AccessService};
use crate::services::context::RequestContext;

/// A task counts as overdue exactly when its due date has passed and it
/// is not completed. The background sweeps apply the same predicate.
#[must_use]
pub fn is_overdue(task: &task::Model, now: DateTime<Utc>) -> bool {
    match task.due_date {
        Some(due) => due < now && task.status != TaskStatus::Completed,
        None => false,
    }
}

/// Dashboard payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Task count per status label.
    pub task_status_counts: BTreeMap<String, u64>,
    /// Task count per priority label.
    pub task_priority_counts: BTreeMap<String, u64>,
    /// Total non-trashed tasks in scope.
    pub total_tasks: u64,
    /// Total non-trashed issues in scope.
    pub total_issues: u64,
    /// Total non-trashed projects in scope.
    pub total_projects: u64,
    /// Most recent activity rows of the organization.
    pub recent_activity: Vec<activity_log::Model>,
}

/// One row of the per-outlet task report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutletTaskRow {
    /// Outlet id.
    pub outlet_id: String,
    /// Outlet name.
    pub outlet_name: String,
    /// All tasks of the outlet.
    pub total: u64,
    /// Completed tasks.
    pub completed: u64,
    /// Neither completed, on hold, nor past due.
    pub ongoing: u64,
    /// Past-due, not completed.
    pub overdue: u64,
    /// On hold.
    pub on_hold: u64,
}

/// One row of the per-outlet issue report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutletIssueRow {
    /// Outlet id.
    pub outlet_id: String,
    /// Outlet name.
    pub outlet_name: String,
    /// All issues of the outlet.
    pub total: u64,
    /// Open issues.
    pub open: u64,
    /// Resolved issues.
    pub resolved: u64,
    /// Ignored issues.
    pub ignored: u64,
    /// Closed issues.
    pub closed: u64,
}

/// One row of the per-member task report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeTaskRow {
    /// Profile id.
    pub profile_id: String,
    /// Display name.
    pub full_name: String,
    /// Tasks assigned to the member.
    pub total: u64,
    /// Completed tasks.
    pub completed: u64,
    /// Past-due, not completed.
    pub overdue: u64,
    /// Points from completed assigned tasks.
    pub completed_points: i64,
}

/// One row of the per-member issue report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeIssueRow {
    /// Profile id.
    pub profile_id: String,
    /// Display name.
    pub full_name: String,
    /// Issues assigned to the member.
    pub total: u64,
    /// Open issues.
    pub open: u64,
    /// Resolved issues.
    pub resolved: u64,
}

/// Report service.
#[derive(Clone)]
pub struct ReportService {
    task_repo: TaskRepository,
    issue_repo: IssueRepository,
    project_repo: ProjectRepository,
    profile_repo: UserProfileRepository,
    outlet_repo: OutletRepository,
    activity_repo: ActivityLogRepository,
    cache_repo: ReportCacheRepository,
    access: AccessService,
    cache_ttl: Duration,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        task_repo: TaskRepository,
        issue_repo: IssueRepository,
        project_repo: ProjectRepository,
        profile_repo: UserProfileRepository,
        outlet_repo: OutletRepository,
        activity_repo: ActivityLogRepository,
        cache_repo: ReportCacheRepository,
        access: AccessService,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            task_repo,
            issue_repo,
            project_repo,
            profile_repo,
            outlet_repo,
            activity_repo,
            cache_repo,
            access,
            cache_ttl,
            id_gen: IdGenerator::new(),
        }
    }

    /// Dashboard rollup, outlet-filtered when the context selects one.
    pub async fn dashboard(&self, ctx: &RequestContext) -> AppResult<DashboardReport> {
        self.access
            .require(&ctx.profile, perms::VIEW_DASHBOARD)
            .await?;

        let now = Utc::now();
        let key = self.key(ctx, "dashboard");
        if let Some(cached) = self.read_cache::<DashboardReport>(&key, now).await? {
            return Ok(cached);
        }

        let tasks = self.tasks_in_scope(ctx).await?;
        let issues = self.issues_in_scope(ctx).await?;
        let projects = self
            .project_repo
            .list(
                &ctx.organization.id,
                &ProjectFilter {
                    outlet_id: ctx.outlet_filter(),
                    ..ProjectFilter::default()
                },
            )
            .await?;
        let recent_activity = self.activity_repo.recent(&ctx.organization.id, 20).await?;

        let mut task_status_counts = BTreeMap::new();
        let mut task_priority_counts = BTreeMap::new();
        for t in &tasks {
            *task_status_counts
                .entry(t.status.to_value())
                .or_insert(0u64) += 1;
            *task_priority_counts
                .entry(t.priority.to_value())
                .or_insert(0u64) += 1;
        }

        let report = DashboardReport {
            task_status_counts,
            task_priority_counts,
            total_tasks: tasks.len() as u64,
            total_issues: issues.len() as u64,
            total_projects: projects.len() as u64,
            recent_activity,
        };
        self.write_cache(ctx, &key, &report, now).await;
        Ok(report)
    }

    /// Per-outlet task rollup.
    pub async fn outlet_task_report(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<OutletTaskRow>> {
        self.access
            .require(&ctx.profile, perms::VIEW_REPORTS)
            .await?;

        let key = self.key(ctx, "outlet_tasks");
        if let Some(cached) = self.read_cache::<Vec<OutletTaskRow>>(&key, now).await? {
            return Ok(cached);
        }

        let outlets = self.outlet_repo.list_by_org(&ctx.organization.id).await?;
        let tasks = self.task_repo.list_all_in_org(&ctx.organization.id).await?;

        let rows: Vec<OutletTaskRow> = outlets
            .into_iter()
            .map(|outlet| {
                let mine: Vec<&task::Model> = tasks
                    .iter()
                    .filter(|t| t.outlet_id.as_deref() == Some(outlet.id.as_str()))
                    .collect();
                let completed = mine
                    .iter()
                    .filter(|t| t.status == TaskStatus::Completed)
                    .count() as u64;
                let on_hold = mine
                    .iter()
                    .filter(|t| t.status == TaskStatus::OnHold)
                    .count() as u64;
                let overdue = mine.iter().filter(|t| is_overdue(t, now)).count() as u64;
                let total = mine.len() as u64;
                let ongoing = total
                    .saturating_sub(completed)
                    .saturating_sub(on_hold)
                    .saturating_sub(overdue);
                OutletTaskRow {
                    outlet_id: outlet.id,
                    outlet_name: outlet.name,
                    total,
                    completed,
                    ongoing,
                    overdue,
                    on_hold,
                }
            })
            .collect();

        self.write_cache(ctx, &key, &rows, now).await;
        Ok(rows)
    }

    /// Per-outlet issue rollup.
    pub async fn outlet_issue_report(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<OutletIssueRow>> {
        self.access
            .require(&ctx.profile, perms::VIEW_REPORTS)
            .await?;

        let key = self.key(ctx, "outlet_issues");
        if let Some(cached) = self.read_cache::<Vec<OutletIssueRow>>(&key, now).await? {
            return Ok(cached);
        }

        let outlets = self.outlet_repo.list_by_org(&ctx.organization.id).await?;
        let issues = self
            .issue_repo
            .list_all_in_org(&ctx.organization.id)
            .await?;

        let rows: Vec<OutletIssueRow> = outlets
            .into_iter()
            .map(|outlet| {
                let mine: Vec<&issue::Model> = issues
                    .iter()
                    .filter(|i| i.outlet_id.as_deref() == Some(outlet.id.as_str()))
                    .collect();
                let count =
                    |status: IssueStatus| mine.iter().filter(|i| i.status == status).count() as u64;
                OutletIssueRow {
                    total: mine.len() as u64,
                    open: count(IssueStatus::Open),
                    resolved: count(IssueStatus::Resolved),
                    ignored: count(IssueStatus::Ignored),
                    closed: count(IssueStatus::Closed),
                    outlet_id: outlet.id,
                    outlet_name: outlet.name,
                }
            })
            .collect();

        self.write_cache(ctx, &key, &rows, now).await;
        Ok(rows)
    }

    /// Per-member task rollup with completed-points sums.
    pub async fn employee_task_report(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<EmployeeTaskRow>> {
        self.access
            .require(&ctx.profile, perms::VIEW_REPORTS)
            .await?;

        let key = self.key(ctx, "employee_tasks");
        if let Some(cached) = self.read_cache::<Vec<EmployeeTaskRow>>(&key, now).await? {
            return Ok(cached);
        }

        let members = self.profile_repo.list_by_org(&ctx.organization.id).await?;
        let tasks = self.task_repo.list_all_in_org(&ctx.organization.id).await?;

        // assignee lookups are per task; the cache absorbs the fan-out
        let mut assignments: Vec<(String, Vec<String>)> = Vec::with_capacity(tasks.len());
        for t in &tasks {
            assignments.push((t.id.clone(), self.task_repo.assignee_ids(&t.id).await?));
        }

        let rows: Vec<EmployeeTaskRow> = members
            .into_iter()
            .map(|member| {
                let mine: Vec<&task::Model> = tasks
                    .iter()
                    .filter(|t| {
                        assignments
                            .iter()
                            .any(|(tid, pids)| *tid == t.id && pids.contains(&member.id))
                    })
                    .collect();
                let completed: Vec<&&task::Model> = mine
                    .iter()
                    .filter(|t| t.status == TaskStatus::Completed)
                    .collect();
                EmployeeTaskRow {
                    total: mine.len() as u64,
                    completed: completed.len() as u64,
                    overdue: mine.iter().filter(|t| is_overdue(t, now)).count() as u64,
                    completed_points: completed.iter().map(|t| i64::from(t.points)).sum(),
                    profile_id: member.id,
                    full_name: member.full_name,
                }
            })
            .collect();

        self.write_cache(ctx, &key, &rows, now).await;
        Ok(rows)
    }

    /// Per-member issue rollup.
    pub async fn employee_issue_report(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<EmployeeIssueRow>> {
        self.access
            .require(&ctx.profile, perms::VIEW_REPORTS)
            .await?;

        let key = self.key(ctx, "employee_issues");
        if let Some(cached) = self.read_cache::<Vec<EmployeeIssueRow>>(&key, now).await? {
            return Ok(cached);
        }

        let members = self.profile_repo.list_by_org(&ctx.organization.id).await?;
        let issues = self
            .issue_repo
            .list_all_in_org(&ctx.organization.id)
            .await?;

        let mut assignments: Vec<(String, Vec<String>)> = Vec::with_capacity(issues.len());
        for i in &issues {
            assignments.push((i.id.clone(), self.issue_repo.assignee_ids(&i.id).await?));
        }

        let rows: Vec<EmployeeIssueRow> = members
            .into_iter()
            .map(|member| {
                let mine: Vec<&issue::Model> = issues
                    .iter()
                    .filter(|i| {
                        assignments
                            .iter()
                            .any(|(iid, pids)| *iid == i.id && pids.contains(&member.id))
                    })
                    .collect();
                EmployeeIssueRow {
                    total: mine.len() as u64,
                    open: mine.iter().filter(|i| i.status == IssueStatus::Open).count() as u64,
                    resolved: mine
                        .iter()
                        .filter(|i| i.status == IssueStatus::Resolved)
                        .count() as u64,
                    profile_id: member.id,
                    full_name: member.full_name,
                }
            })
            .collect();

        self.write_cache(ctx, &key, &rows, now).await;
        Ok(rows)
    }

    async fn tasks_in_scope(&self, ctx: &RequestContext) -> AppResult<Vec<task::Model>> {
        let tasks = self.task_repo.list_all_in_org(&ctx.organization.id).await?;
        Ok(match ctx.outlet_filter() {
            Some(outlet_id) => tasks
                .into_iter()
                .filter(|t| t.outlet_id.as_deref() == Some(outlet_id.as_str()))
                .collect(),
            None => tasks,
        })
    }

    async fn issues_in_scope(&self, ctx: &RequestContext) -> AppResult<Vec<issue::Model>> {
        let issues = self
            .issue_repo
            .list_all_in_org(&ctx.organization.id)
            .await?;
        Ok(match ctx.outlet_filter() {
            Some(outlet_id) => issues
                .into_iter()
                .filter(|i| i.outlet_id.as_deref() == Some(outlet_id.as_str()))
                .collect(),
            None => issues,
        })
    }

    fn key(&self, ctx: &RequestContext, kind: &str) -> String {
        let outlet = ctx.outlet_filter().unwrap_or_else(|| "all".to_string());
        format!("{kind}:{}:{outlet}", ctx.organization.id)
    }

    async fn read_cache<T: DeserializeOwned>(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<T>> {
        let Some(row) = self.cache_repo.get_fresh(key, now).await? else {
            return Ok(None);
        };
        match serde_json::from_value(row.data) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // stale shape after a deploy; recompute
                tracing::warn!(error = %e, key, "discarding undecodable report cache entry");
                Ok(None)
            }
        }
    }

    /// Cache write failures only cost the next reader a recompute.
    async fn write_cache<T: Serialize>(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: &T,
        now: DateTime<Utc>,
    ) {
        let Ok(data) = serde_json::to_value(value) else {
            return;
        };
        let model = report_cache::ActiveModel {
            id: Set(self.id_gen.generate()),
            cache_key: Set(key.to_string()),
            organization_id: Set(ctx.organization.id.clone()),
            data: Set(data),
            generated_at: Set(now.into()),
            expires_at: Set((now + self.cache_ttl).into()),
        };
        if let Err(e) = self.cache_repo.put(model, key).await {
            tracing::warn!(error = %e, key, "failed to write report cache");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task_with(due: Option<DateTime<Utc>>, status: TaskStatus) -> task::Model {
        task::Model {
            id: "t1".to_string(),
            organization_id: "org1".to_string(),
            project_id: None,
            outlet_id: None,
            team_id: None,
            parent_id: None,
            title: "Stock count".to_string(),
            description: None,
            sop_content: None,
            task_type: Default::default(),
            status,
            priority: Default::default(),
            category: None,
            start_date: None,
            due_date: due.map(Into::into),
            completed_at: None,
            points: 0,
            recurrence: Default::default(),
            recurrence_details: None,
            recurrence_source_id: None,
            needs_approval: false,
            is_starred: false,
            assist_summary: None,
            assist_priority_hint: None,
            tags: None,
            created_by: None,
            is_trashed: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_overdue_requires_past_due_date() {
        let now = Utc::now();
        let past = task_with(Some(now - Duration::hours(1)), TaskStatus::InProgress);
        let future = task_with(Some(now + Duration::hours(1)), TaskStatus::InProgress);
        assert!(is_overdue(&past, now));
        assert!(!is_overdue(&future, now));
    }

    #[test]
    fn test_completed_tasks_are_never_overdue() {
        let now = Utc::now();
        let done = task_with(Some(now - Duration::days(3)), TaskStatus::Completed);
        assert!(!is_overdue(&done, now));
    }

    #[test]
    fn test_no_due_date_is_never_overdue() {
        let now = Utc::now();
        let undated = task_with(None, TaskStatus::Todo);
        assert!(!is_overdue(&undated, now));
    }

    #[test]
    fn test_overdue_status_counts_as_overdue() {
        let now = Utc::now();
        let swept = task_with(Some(now - Duration::hours(2)), TaskStatus::Overdue);
        assert!(is_overdue(&swept, now));
    }
}
