//! API integration tests.
//!
//! These tests exercise the router and middleware stack over a mock
//! database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use opsboard_api::{middleware::AppState, router as api_router};
use opsboard_core::{
    assist::HeuristicAssistant, AccessService, ActivityLogService, AssistService, AuthService,
    ContextService, FormService, IssueService, NotificationService, OrganizationService,
    OutletService, ProjectService, ReportService, RoleService, TaskService, TeamService,
    TemplateService, UserService,
};
use opsboard_db::entities::user_profile;
use opsboard_db::repositories::{
    ActivityLogRepository, FormRepository, IssueRepository, NotificationRepository,
    OrganizationRepository, OutletRepository, ProjectRepository, ReportCacheRepository,
    RoleRepository, SessionRepository, TaskRepository, TeamRepository, TemplateRepository,
    UserProfileRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

/// Create test app state over the given mock connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let session_repo = SessionRepository::new(Arc::clone(&db));
    let org_repo = OrganizationRepository::new(Arc::clone(&db));
    let outlet_repo = OutletRepository::new(Arc::clone(&db));
    let team_repo = TeamRepository::new(Arc::clone(&db));
    let role_repo = RoleRepository::new(Arc::clone(&db));
    let project_repo = ProjectRepository::new(Arc::clone(&db));
    let task_repo = TaskRepository::new(Arc::clone(&db));
    let issue_repo = IssueRepository::new(Arc::clone(&db));
    let form_repo = FormRepository::new(Arc::clone(&db));
    let template_repo = TemplateRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let activity_repo = ActivityLogRepository::new(Arc::clone(&db));
    let cache_repo = ReportCacheRepository::new(Arc::clone(&db));

    let access = AccessService::new(role_repo.clone());
    let activity = ActivityLogService::new(activity_repo.clone());
    let notifications = NotificationService::new(notification_repo);
    let assistant: Arc<dyn opsboard_core::assist::Assistant> =
        Arc::new(HeuristicAssistant::with_seed(42));

    AppState {
        context_service: ContextService::new(
            session_repo.clone(),
            profile_repo.clone(),
            org_repo.clone(),
            outlet_repo.clone(),
        ),
        auth_service: AuthService::new(
            profile_repo.clone(),
            session_repo.clone(),
            org_repo.clone(),
            activity_repo.clone(),
            None,
        ),
        access: access.clone(),
        organization_service: OrganizationService::new(org_repo, access.clone()),
        outlet_service: OutletService::new(outlet_repo.clone(), access.clone(), activity.clone()),
        team_service: TeamService::new(team_repo.clone(), access.clone()),
        role_service: RoleService::new(role_repo.clone(), access.clone()),
        user_service: UserService::new(
            profile_repo.clone(),
            session_repo,
            outlet_repo.clone(),
            team_repo,
            role_repo,
            access.clone(),
        ),
        project_service: ProjectService::new(
            project_repo.clone(),
            profile_repo.clone(),
            access.clone(),
            activity.clone(),
            notifications.clone(),
        ),
        task_service: TaskService::new(
            task_repo.clone(),
            profile_repo.clone(),
            access.clone(),
            activity.clone(),
            notifications.clone(),
            Arc::clone(&assistant),
        ),
        issue_service: IssueService::new(
            issue_repo.clone(),
            profile_repo.clone(),
            access.clone(),
            activity.clone(),
            notifications.clone(),
        ),
        form_service: FormService::new(
            form_repo,
            profile_repo.clone(),
            access.clone(),
            activity.clone(),
            notifications.clone(),
        ),
        template_service: TemplateService::new(
            template_repo,
            task_repo.clone(),
            access.clone(),
            activity.clone(),
        ),
        report_service: ReportService::new(
            task_repo.clone(),
            issue_repo,
            project_repo,
            profile_repo.clone(),
            outlet_repo,
            activity_repo,
            cache_repo,
            access.clone(),
            Duration::seconds(300),
        ),
        notification_service: notifications,
        activity_service: activity,
        assist_service: AssistService::new(task_repo, profile_repo, access, assistant),
    }
}

fn test_app(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);
    Router::new()
        .nest("/api", api_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            opsboard_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

#[tokio::test]
async fn unauthenticated_request_is_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/tasks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_rejects_empty_identifier() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"identifier":"","password":"secret"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_unknown_user_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user_profile::Model>::new()])
        .into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"identifier":"nobody","password":"secret"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_bearer_token_is_rejected() {
    // Session lookup returns no rows, so the context never materializes.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<opsboard_db::entities::session::Model>::new()])
        .into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/tasks")
                .header("Authorization", "Bearer bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
