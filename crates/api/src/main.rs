use api::{create_router_with_cors, ApiDoc, AppState};
use services::{
    apps::CustomAppServiceImpl, auth::AuthServiceImpl, limits::LimitServiceImpl,
    report::ReportServiceImpl, sites::BlockedSiteServiceImpl, tasks::TaskServiceImpl,
    time_requests::TimeRequestServiceImpl, usage::UsageServiceImpl,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Could not load .env file: {}", e);
        eprintln!("Continuing with environment variables...");
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api=debug,services=debug,database=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Load configuration from environment
    let config = config::Config::from_env();

    tracing::info!(
        "Database: {}:{}/{}",
        config.database.host.as_deref().unwrap_or("localhost"),
        config.database.port,
        config.database.database
    );
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);

    // Create database and run migrations
    tracing::info!("Connecting to database...");
    let db = database::Database::from_config(&config.database)?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    // Get repositories
    let user_repo: Arc<dyn services::auth::ports::UserRepository> = Arc::new(db.users());
    let session_repo: Arc<dyn services::auth::ports::SessionRepository> = Arc::new(db.sessions());
    let usage_repo: Arc<dyn services::usage::ports::UsageRepository> = Arc::new(db.usage());
    let report_repo: Arc<dyn services::report::ports::ReportRepository> = Arc::new(db.reports());
    let task_repo: Arc<dyn services::tasks::ports::TaskRepository> = Arc::new(db.tasks());
    let time_request_repo: Arc<dyn services::time_requests::ports::TimeRequestRepository> =
        Arc::new(db.time_requests());
    let limit_repo: Arc<dyn services::limits::ports::AppLimitRepository> =
        Arc::new(db.app_limits());
    let limit_request_repo: Arc<dyn services::limits::ports::TimeLimitRequestRepository> =
        Arc::new(db.time_limit_requests());
    let site_repo: Arc<dyn services::sites::ports::BlockedSiteRepository> =
        Arc::new(db.blocked_sites());
    let custom_app_repo: Arc<dyn services::apps::ports::CustomAppRepository> =
        Arc::new(db.custom_apps());

    // Create services
    tracing::info!("Initializing services...");
    let auth_service = Arc::new(AuthServiceImpl::new(
        user_repo.clone(),
        session_repo.clone(),
        config.auth.session_ttl_days,
    ));
    let usage_service = Arc::new(UsageServiceImpl::new(usage_repo));
    let report_service = Arc::new(ReportServiceImpl::new(report_repo));
    let task_service = Arc::new(TaskServiceImpl::new(task_repo.clone(), user_repo.clone()));
    let time_request_service = Arc::new(TimeRequestServiceImpl::new(time_request_repo, task_repo));
    let limit_service = Arc::new(LimitServiceImpl::new(
        limit_repo,
        limit_request_repo,
        user_repo.clone(),
    ));
    let blocked_site_service = Arc::new(BlockedSiteServiceImpl::new(
        site_repo,
        user_repo.clone(),
    ));
    let custom_app_service = Arc::new(CustomAppServiceImpl::new(
        custom_app_repo,
        user_repo.clone(),
    ));

    // Create application state
    let app_state = AppState {
        auth_service,
        usage_service,
        report_service,
        task_service,
        time_request_service,
        limit_service,
        blocked_site_service,
        custom_app_service,
        session_repository: session_repo,
        user_repository: user_repo,
    };

    // Create router
    let app = create_router_with_cors(app_state, config.cors.clone())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
