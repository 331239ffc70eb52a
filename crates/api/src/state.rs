use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn services::auth::ports::AuthService>,
    pub usage_service: Arc<dyn services::usage::ports::UsageService>,
    pub report_service: Arc<dyn services::report::ports::ReportService>,
    pub task_service: Arc<dyn services::tasks::ports::TaskService>,
    pub time_request_service: Arc<dyn services::time_requests::ports::TimeRequestService>,
    pub limit_service: Arc<dyn services::limits::ports::LimitService>,
    pub blocked_site_service: Arc<dyn services::sites::ports::BlockedSiteService>,
    pub custom_app_service: Arc<dyn services::apps::ports::CustomAppService>,
    pub session_repository: Arc<dyn services::auth::ports::SessionRepository>,
    pub user_repository: Arc<dyn services::auth::ports::UserRepository>,
}
