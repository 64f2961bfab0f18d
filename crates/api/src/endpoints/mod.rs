//! API endpoints.

mod activity;
mod assist;
mod auth;
mod dashboard;
mod forms;
mod issues;
mod notifications;
mod organizations;
mod outlets;
mod projects;
mod reports;
mod roles;
mod session;
mod tasks;
mod teams;
mod templates;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/session", session::router())
        .merge(dashboard::router())
        .nest("/reports", reports::router())
        .nest("/tasks", tasks::router())
        .nest("/issues", issues::router())
        .nest("/projects", projects::router())
        .nest("/forms", forms::router())
        .nest("/templates", templates::router())
        .nest("/notifications", notifications::router())
        .nest("/assist", assist::router())
        .nest("/organizations", organizations::router())
        .nest("/admin/users", users::router())
        .nest("/admin/roles", roles::router())
        .nest("/admin/outlets", outlets::router())
        .nest("/admin/teams", teams::router())
        .nest("/admin/activity", activity::router())
}
