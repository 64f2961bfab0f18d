//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use opsboard_core::{
    AccessService, ActivityLogService, AssistService, AuthService, ContextService, FormService,
    IssueService, NotificationService, OrganizationService, OutletService, ProjectService,
    ReportService, RoleService, TaskService, TeamService, TemplateService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub context_service: ContextService,
    pub auth_service: AuthService,
    pub access: AccessService,
    pub organization_service: OrganizationService,
    pub outlet_service: OutletService,
    pub team_service: TeamService,
    pub role_service: RoleService,
    pub user_service: UserService,
    pub project_service: ProjectService,
    pub task_service: TaskService,
    pub issue_service: IssueService,
    pub form_service: FormService,
    pub template_service: TemplateService,
    pub report_service: ReportService,
    pub notification_service: NotificationService,
    pub activity_service: ActivityLogService,
    pub assist_service: AssistService,
}

/// Authentication middleware.
///
/// Resolves the bearer token into a request context and stashes it in
/// request extensions. Requests without a valid token pass through
/// untouched; handlers requiring a context reject them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        if let Ok(ctx) = state.context_service.resolve(token).await {
            req.extensions_mut().insert(ctx);
        }
    }

    next.run(req).await
}
