//! Database repositories.
//!
//! One repository per aggregate, each holding an `Arc<DatabaseConnection>`.

pub mod activity_log;
pub mod form;
pub mod issue;
pub mod notification;
pub mod organization;
pub mod outlet;
pub mod project;
pub mod report_cache;
pub mod role;
pub mod session;
pub mod task;
pub mod team;
pub mod template;
pub mod user_profile;

pub use activity_log::ActivityLogRepository;
pub use form::{FormFilter, FormRepository};
pub use issue::{IssueFilter, IssueRepository};
pub use notification::NotificationRepository;
pub use organization::OrganizationRepository;
pub use outlet::OutletRepository;
pub use project::{ProjectFilter, ProjectRepository};
pub use report_cache::ReportCacheRepository;
pub use role::RoleRepository;
pub use session::SessionRepository;
pub use task::{TaskFilter, TaskRepository};
pub use team::TeamRepository;
pub use template::TemplateRepository;
pub use user_profile::UserProfileRepository;
