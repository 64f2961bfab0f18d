//! Interval-driven scheduler for the background sweeps.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval for the overdue sweep (default: 5 minutes).
    pub overdue_interval: Duration,
    /// Interval for the recurrence sweep (default: 15 minutes).
    pub recurrence_interval: Duration,
    /// Interval for the reminder sweep (default: 1 hour).
    pub reminder_interval: Duration,
    /// Interval for report cache eviction (default: 10 minutes).
    pub cache_eviction_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            overdue_interval: Duration::from_secs(300),
            recurrence_interval: Duration::from_secs(900),
            reminder_interval: Duration::from_secs(3600),
            cache_eviction_interval: Duration::from_secs(600),
        }
    }
}

/// Executor trait for the scheduled sweeps. Each method returns how many
/// rows it touched.
#[async_trait::async_trait]
pub trait SweepExecutor: Send + Sync {
    /// Flag past-due tasks and notify their assignees.
    async fn overdue_sweep(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;

    /// Spawn the next occurrence of completed recurring tasks.
    async fn recurrence_sweep(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;

    /// Remind assignees about due-soon and stale in-progress tasks.
    async fn reminder_sweep(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;

    /// Delete expired report cache rows.
    async fn evict_report_cache(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;
}

/// Run the scheduler with the given configuration and executor.
pub async fn run_scheduler<E: SweepExecutor + 'static>(config: SchedulerConfig, executor: Arc<E>) {
    let executor_overdue = executor.clone();
    let executor_recurrence = executor.clone();
    let executor_reminder = executor.clone();
    let executor_cache = executor;

    // Spawn overdue sweep task
    tokio::spawn(async move {
        let mut interval = interval(config.overdue_interval);
        loop {
            interval.tick().await;
            match executor_overdue.overdue_sweep().await {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(count, "Flagged overdue tasks");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Overdue sweep failed");
                }
            }
        }
    });

    // Spawn recurrence sweep task
    tokio::spawn(async move {
        let mut interval = interval(config.recurrence_interval);
        loop {
            interval.tick().await;
            match executor_recurrence.recurrence_sweep().await {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(count, "Spawned recurring task occurrences");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Recurrence sweep failed");
                }
            }
        }
    });

    // Spawn reminder sweep task
    tokio::spawn(async move {
        let mut interval = interval(config.reminder_interval);
        loop {
            interval.tick().await;
            match executor_reminder.reminder_sweep().await {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(count, "Sent task reminders");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Reminder sweep failed");
                }
            }
        }
    });

    // Spawn cache eviction task
    tokio::spawn(async move {
        let mut interval = interval(config.cache_eviction_interval);
        loop {
            interval.tick().await;
            match executor_cache.evict_report_cache().await {
                Ok(count) => {
                    if count > 0 {
                        tracing::debug!(count, "Evicted expired report cache rows");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Report cache eviction failed");
                }
            }
        }
    });
}
