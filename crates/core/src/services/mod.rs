//! Business-logic services over the repository layer.

pub mod access;
pub mod activity;
pub mod assist;
pub mod auth;
pub mod context;
pub mod form;
pub mod issue;
pub mod notification;
pub mod organization;
pub mod outlet;
pub mod project;
pub mod report;
pub mod role;
pub mod task;
pub mod team;
pub mod template;
pub mod user;

pub use access::{perms, AccessService};
pub use activity::ActivityLogService;
pub use assist::AssistService;
pub use auth::{AuthService, IdentityClient, LoginOutcome};
pub use context::{ContextService, RequestContext};
pub use form::{FormInput, FormService};
pub use issue::{IssueInput, IssueService};
pub use notification::{NotificationService, NotifyInput};
pub use organization::{OrganizationInput, OrganizationService};
pub use outlet::{OutletInput, OutletService};
pub use project::{ProjectInput, ProjectService};
pub use report::{
    DashboardReport, EmployeeIssueRow, EmployeeTaskRow, OutletIssueRow, OutletTaskRow,
    ReportService,
};
pub use role::{RoleInput, RoleService, RoleWithPermissions};
pub use task::{AttachmentInput, TaskDetail, TaskInput, TaskService};
pub use team::{TeamInput, TeamService};
pub use template::{InstantiateOverrides, TemplateDetail, TemplateInput, TemplateService};
pub use user::{CreateUserInput, UpdateUserInput, UserService};
