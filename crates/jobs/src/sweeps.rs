//! The sweep implementations.

use chrono::{DateTime, Duration, Utc};
use sea_orm::Set;

use opsboard_common::{AppResult, IdGenerator};
use opsboard_core::services::notification::{dedup_window, NotificationService, NotifyInput};
use opsboard_db::entities::notification::{NotificationPriority, NotificationType};
use opsboard_db::entities::task::{self, Recurrence, TaskStatus};
use opsboard_db::repositories::{ReportCacheRepository, TaskRepository};

use crate::scheduler::SweepExecutor;

/// Days between occurrences for a recurrence schedule. `None` for
/// schedules the sweep never expands.
#[must_use]
pub fn recurrence_interval(recurrence: Recurrence) -> Option<Duration> {
    match recurrence {
        Recurrence::Daily => Some(Duration::days(1)),
        Recurrence::Weekly => Some(Duration::days(7)),
        Recurrence::Monthly => Some(Duration::days(30)),
        Recurrence::None | Recurrence::Custom => None,
    }
}

/// Concrete sweep runner over the repositories.
pub struct SweepRunner {
    task_repo: TaskRepository,
    cache_repo: ReportCacheRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl SweepRunner {
    /// Create a new sweep runner.
    #[must_use]
    pub const fn new(
        task_repo: TaskRepository,
        cache_repo: ReportCacheRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            task_repo,
            cache_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Flag tasks past their due date as overdue and notify assignees.
    /// Re-running within the dedup window changes nothing: the status
    /// write is absorbing and the notifications are deduped.
    pub async fn run_overdue_sweep(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let candidates = self.task_repo.find_overdue_candidates(now).await?;
        let mut flagged = 0u64;

        for task in candidates {
            let mut active: task::ActiveModel = task.clone().into();
            active.status = Set(TaskStatus::Overdue);
            active.updated_at = Set(now.into());
            self.task_repo.update(active).await?;
            flagged += 1;

            for pid in self.task_repo.assignee_ids(&task.id).await? {
                self.notifications
                    .notify_deduped(
                        NotifyInput {
                            recipient_id: pid,
                            organization_id: task.organization_id.clone(),
                            notification_type: NotificationType::TaskOverdue,
                            priority: NotificationPriority::High,
                            title: "Task overdue".to_string(),
                            message: format!("'{}' is past its due date", task.title),
                            link: Some(format!("/tasks/{}", task.id)),
                            entity_type: Some("task".to_string()),
                            entity_id: Some(task.id.clone()),
                        },
                        dedup_window(),
                        now,
                    )
                    .await?;
            }
        }

        Ok(flagged)
    }

    /// Spawn the next occurrence of completed recurring tasks. Idempotent
    /// per (source task, due date): a second run finds the spawn already
    /// present and skips it.
    pub async fn run_recurrence_sweep(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let candidates = self.task_repo.find_recurrence_candidates().await?;
        let mut spawned = 0u64;

        for task in candidates {
            let Some(interval) = recurrence_interval(task.recurrence) else {
                continue;
            };
            let Some(completed_at) = task.completed_at else {
                continue;
            };

            let next_due = completed_at.with_timezone(&Utc) + interval;
            if next_due > now {
                continue;
            }
            // the occurrence chain shares one source id
            let source_id = task
                .recurrence_source_id
                .clone()
                .unwrap_or_else(|| task.id.clone());
            if self.task_repo.spawn_exists(&source_id, next_due).await? {
                continue;
            }

            let assignees = self.task_repo.assignee_ids(&task.id).await?;

            let model = task::ActiveModel {
                id: Set(self.id_gen.generate()),
                organization_id: Set(task.organization_id.clone()),
                project_id: Set(task.project_id.clone()),
                outlet_id: Set(task.outlet_id.clone()),
                team_id: Set(task.team_id.clone()),
                parent_id: Set(None),
                title: Set(task.title.clone()),
                description: Set(task.description.clone()),
                sop_content: Set(task.sop_content.clone()),
                task_type: Set(task.task_type),
                status: Set(TaskStatus::Todo),
                priority: Set(task.priority),
                category: Set(task.category.clone()),
                start_date: Set(None),
                due_date: Set(Some(next_due.into())),
                completed_at: Set(None),
                points: Set(task.points),
                recurrence: Set(task.recurrence),
                recurrence_details: Set(task.recurrence_details.clone()),
                recurrence_source_id: Set(Some(source_id)),
                needs_approval: Set(task.needs_approval),
                is_starred: Set(false),
                assist_summary: Set(None),
                assist_priority_hint: Set(None),
                tags: Set(task.tags.clone()),
                created_by: Set(task.created_by.clone()),
                is_trashed: Set(false),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            let created = self.task_repo.create(model).await?;

            if !assignees.is_empty() {
                self.task_repo.set_assignees(&created.id, &assignees).await?;
            }
            spawned += 1;
        }

        Ok(spawned)
    }

    /// Remind assignees about tasks due within 24 hours and in-progress
    /// tasks untouched for 3 or more days. Reminders are deduped over the
    /// same 24 h window as overdue notifications.
    pub async fn run_reminder_sweep(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut sent = 0u64;

        let due_soon = self
            .task_repo
            .find_due_between(now, now + Duration::hours(24))
            .await?;
        for task in due_soon {
            sent += self
                .remind(&task, "Task due soon", format!("'{}' is due soon", task.title), now)
                .await?;
        }

        let stale = self
            .task_repo
            .find_stale_in_progress(now - Duration::days(3))
            .await?;
        for task in stale {
            sent += self
                .remind(
                    &task,
                    "Task needs attention",
                    format!("'{}' has not moved in a while", task.title),
                    now,
                )
                .await?;
        }

        Ok(sent)
    }

    /// Delete expired report cache rows.
    pub async fn run_cache_eviction(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.cache_repo.evict_expired(now).await
    }

    async fn remind(
        &self,
        task: &task::Model,
        title: &str,
        message: String,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut sent = 0u64;
        for pid in self.task_repo.assignee_ids(&task.id).await? {
            let delivered = self
                .notifications
                .notify_deduped(
                    NotifyInput {
                        recipient_id: pid,
                        organization_id: task.organization_id.clone(),
                        notification_type: NotificationType::Reminder,
                        priority: NotificationPriority::Normal,
                        title: title.to_string(),
                        message: message.clone(),
                        link: Some(format!("/tasks/{}", task.id)),
                        entity_type: Some("task".to_string()),
                        entity_id: Some(task.id.clone()),
                    },
                    dedup_window(),
                    now,
                )
                .await?;
            if delivered.is_some() {
                sent += 1;
            }
        }
        Ok(sent)
    }
}

#[async_trait::async_trait]
impl SweepExecutor for SweepRunner {
    async fn overdue_sweep(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.run_overdue_sweep(Utc::now()).await?)
    }

    async fn recurrence_sweep(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.run_recurrence_sweep(Utc::now()).await?)
    }

    async fn reminder_sweep(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.run_reminder_sweep(Utc::now()).await?)
    }

    async fn evict_report_cache(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.run_cache_eviction(Utc::now()).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrence_intervals() {
        assert_eq!(recurrence_interval(Recurrence::Daily), Some(Duration::days(1)));
        assert_eq!(recurrence_interval(Recurrence::Weekly), Some(Duration::days(7)));
        assert_eq!(
            recurrence_interval(Recurrence::Monthly),
            Some(Duration::days(30))
        );
        assert_eq!(recurrence_interval(Recurrence::None), None);
        assert_eq!(recurrence_interval(Recurrence::Custom), None);
    }

    #[test]
    fn test_next_due_follows_completion_not_now() {
        let completed_at = Utc::now() - Duration::days(10);
        let interval = recurrence_interval(Recurrence::Weekly).unwrap();
        let next_due = completed_at + interval;
        assert!(next_due < Utc::now());
        assert_eq!(next_due - completed_at, Duration::days(7));
    }
}
