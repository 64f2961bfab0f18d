//! Background sweeps for opsboard.
//!
//! This crate drives the periodic maintenance work:
//!
//! - **Overdue sweep**: flags past-due tasks and notifies assignees
//! - **Recurrence sweep**: spawns the next occurrence of completed
//!   recurring tasks
//! - **Reminder sweep**: nudges assignees about due-soon and stale tasks
//! - **Cache eviction**: drops expired report cache rows
//!
//! Every sweep is idempotent against `now` and safe to run concurrently
//! with request traffic; dedup and spawn checks replace locking.

pub mod scheduler;
pub mod sweeps;

pub use scheduler::{run_scheduler, SchedulerConfig, SweepExecutor};
pub use sweeps::SweepRunner;
