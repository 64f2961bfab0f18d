//! Database entities.

pub mod activity_log;
pub mod form;
pub mod form_assignee;
pub mod form_response;
pub mod issue;
pub mod issue_assignee;
pub mod notification;
pub mod organization;
pub mod outlet;
pub mod permission;
pub mod project;
pub mod project_member;
pub mod report_cache;
pub mod role;
pub mod role_permission;
pub mod session;
pub mod task;
pub mod task_assignee;
pub mod task_attachment;
pub mod task_comment;
pub mod task_step;
pub mod task_template;
pub mod team;
pub mod template_subtask;
pub mod user_profile;

pub use activity_log::Entity as ActivityLog;
pub use form::Entity as Form;
pub use form_assignee::Entity as FormAssignee;
pub use form_response::Entity as FormResponse;
pub use issue::Entity as Issue;
pub use issue_assignee::Entity as IssueAssignee;
pub use notification::Entity as Notification;
pub use organization::Entity as Organization;
pub use outlet::Entity as Outlet;
pub use permission::Entity as Permission;
pub use project::Entity as Project;
pub use project_member::Entity as ProjectMember;
pub use report_cache::Entity as ReportCache;
pub use role::Entity as Role;
pub use role_permission::Entity as RolePermission;
pub use session::Entity as Session;
pub use task::Entity as Task;
pub use task_assignee::Entity as TaskAssignee;
pub use task_attachment::Entity as TaskAttachment;
pub use task_comment::Entity as TaskComment;
pub use task_step::Entity as TaskStep;
pub use task_template::Entity as TaskTemplate;
pub use team::Entity as Team;
pub use template_subtask::Entity as TemplateSubtask;
pub use user_profile::Entity as UserProfile;
