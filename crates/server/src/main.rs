//! Opsboard server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use chrono::Duration;
use opsboard_api::{middleware::AppState, router as api_router};
use opsboard_common::Config;
use opsboard_core::{
    assist::{Assistant, HeuristicAssistant},
    AccessService, ActivityLogService, AssistService, AuthService, ContextService, FormService,
    IdentityClient, IssueService, NotificationService, OrganizationService, OutletService,
    ProjectService, ReportService, RoleService, TaskService, TeamService, TemplateService,
    UserService,
};
use opsboard_db::repositories::{
    ActivityLogRepository, FormRepository, IssueRepository, NotificationRepository,
    OrganizationRepository, OutletRepository, ProjectRepository, ReportCacheRepository,
    RoleRepository, SessionRepository, TaskRepository, TeamRepository, TemplateRepository,
    UserProfileRepository,
};
use opsboard_jobs::{run_scheduler, SchedulerConfig, SweepRunner};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opsboard=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting opsboard server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = opsboard_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    opsboard_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
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

    // Shared collaborators
    let access = AccessService::new(role_repo.clone());
    let activity = ActivityLogService::new(activity_repo.clone());
    let notifications = NotificationService::new(notification_repo);
    let assistant: Arc<dyn Assistant> = Arc::new(HeuristicAssistant::new());

    // HR identity API client, when configured
    let identity = if config.identity.enabled {
        info!("HR identity API enabled");
        Some(IdentityClient::new(config.identity.clone())?)
    } else {
        None
    };

    // Initialize services
    let context_service = ContextService::new(
        session_repo.clone(),
        profile_repo.clone(),
        org_repo.clone(),
        outlet_repo.clone(),
    );
    let auth_service = AuthService::new(
        profile_repo.clone(),
        session_repo.clone(),
        org_repo.clone(),
        activity_repo.clone(),
        identity,
    );
    let organization_service = OrganizationService::new(org_repo, access.clone());
    let outlet_service = OutletService::new(outlet_repo.clone(), access.clone(), activity.clone());
    let team_service = TeamService::new(team_repo.clone(), access.clone());
    let role_service = RoleService::new(role_repo.clone(), access.clone());
    let user_service = UserService::new(
        profile_repo.clone(),
        session_repo,
        outlet_repo.clone(),
        team_repo,
        role_repo,
        access.clone(),
    );
    let project_service = ProjectService::new(
        project_repo.clone(),
        profile_repo.clone(),
        access.clone(),
        activity.clone(),
        notifications.clone(),
    );
    let task_service = TaskService::new(
        task_repo.clone(),
        profile_repo.clone(),
        access.clone(),
        activity.clone(),
        notifications.clone(),
        Arc::clone(&assistant),
    );
    let issue_service = IssueService::new(
        issue_repo.clone(),
        profile_repo.clone(),
        access.clone(),
        activity.clone(),
        notifications.clone(),
    );
    let form_service = FormService::new(
        form_repo,
        profile_repo.clone(),
        access.clone(),
        activity.clone(),
        notifications.clone(),
    );
    let template_service = TemplateService::new(
        template_repo,
        task_repo.clone(),
        access.clone(),
        activity.clone(),
    );
    let report_service = ReportService::new(
        task_repo.clone(),
        issue_repo,
        project_repo,
        profile_repo.clone(),
        outlet_repo,
        activity_repo,
        cache_repo.clone(),
        access.clone(),
        Duration::seconds(config.reports.cache_ttl_secs),
    );
    let assist_service = AssistService::new(
        task_repo.clone(),
        profile_repo,
        access.clone(),
        assistant,
    );

    // Create app state
    let state = AppState {
        context_service,
        auth_service,
        access,
        organization_service,
        outlet_service,
        team_service,
        role_service,
        user_service,
        project_service,
        task_service,
        issue_service,
        form_service,
        template_service,
        report_service,
        notification_service: notifications.clone(),
        activity_service: activity,
        assist_service,
    };

    // Start the background sweeps
    let sweeps = Arc::new(SweepRunner::new(task_repo, cache_repo, notifications));
    run_scheduler(SchedulerConfig::default(), sweeps).await;
    info!("Background sweeps scheduled");

    // Assemble the router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            opsboard_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
