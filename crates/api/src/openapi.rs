use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Family Screen Time API",
        description = "Screen time tracking, tasks and app limits for families.",
        version = "1.0.0",
        license(name = "MIT",)
    ),
    paths(
        // Auth endpoints
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::current_user,
        crate::routes::auth::list_parents,
        // Usage and reports
        crate::routes::usage::record_app_usage,
        crate::routes::usage::list_app_usage,
        crate::routes::usage::my_report,
        crate::routes::usage::parent_report,
        // Tasks
        crate::routes::tasks::list_tasks,
        crate::routes::tasks::create_task,
        crate::routes::tasks::update_task_status,
        crate::routes::tasks::list_teenagers,
        // Extra-time requests
        crate::routes::time_requests::list_time_requests,
        crate::routes::time_requests::create_time_request,
        crate::routes::time_requests::decide_time_request,
        // App limits
        crate::routes::app_limits::list_predefined_apps,
        crate::routes::app_limits::list_app_limits,
        crate::routes::app_limits::set_app_limit,
        crate::routes::app_limits::delete_app_limit,
        // Limit requests
        crate::routes::time_limit_requests::create_limit_request,
        crate::routes::time_limit_requests::my_limit_requests,
        crate::routes::time_limit_requests::parent_limit_requests,
        crate::routes::time_limit_requests::decide_limit_request,
        crate::routes::time_limit_requests::delete_limit_request,
        // Blocked sites
        crate::routes::blocked_sites::list_blocked_sites,
        crate::routes::blocked_sites::block_site,
        crate::routes::blocked_sites::unblock_site,
        // Custom apps
        crate::routes::custom_apps::my_custom_apps,
        crate::routes::custom_apps::all_custom_apps,
        crate::routes::custom_apps::apps_for_teenager,
        crate::routes::custom_apps::create_custom_app,
        crate::routes::custom_apps::update_custom_app,
        crate::routes::custom_apps::delete_custom_app,
        crate::routes::custom_apps::hidden_apps,
        crate::routes::custom_apps::hide_app,
        crate::routes::custom_apps::unhide_app,
    ),
    components(schemas(
        crate::error::ApiErrorResponse,
        crate::models::RegisterRequest,
        crate::models::LoginRequest,
        crate::models::UserResponse,
        crate::models::AuthResponse,
        crate::models::AccountResponse,
        crate::models::MessageResponse,
        crate::models::RecordUsageRequest,
        crate::models::RecordUsageResponse,
        crate::models::UsageRowResponse,
        crate::models::UsageListResponse,
        crate::models::AppSummaryResponse,
        crate::models::TodayUsageResponse,
        crate::models::TaskStatsResponse,
        crate::models::BlockedSiteResponse,
        crate::models::TeenReportResponse,
        crate::models::ParentReportResponse,
        crate::models::ParentUsageRowResponse,
        crate::models::ParentAppSummaryResponse,
        crate::models::CategoryTimeResponse,
        crate::models::TaskResponse,
        crate::models::CreateTaskRequest,
        crate::models::UpdateTaskStatusRequest,
        crate::models::TimeRequestResponse,
        crate::models::CreateTimeRequestRequest,
        crate::models::DecideRequest,
        crate::models::PredefinedAppResponse,
        crate::models::AppLimitResponse,
        crate::models::SetLimitRequest,
        crate::models::TimeLimitRequestResponse,
        crate::models::CreateLimitRequestRequest,
        crate::models::BlockSiteRequest,
        crate::models::CustomAppResponse,
        crate::models::UpsertCustomAppRequest,
        crate::models::HideAppRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and sessions"),
        (name = "Usage", description = "Screen time recording and reports"),
        (name = "Tasks", description = "Parent-assigned tasks"),
        (name = "Time requests", description = "Extra time for tasks"),
        (name = "App limits", description = "Daily per-app allowances"),
        (name = "Limit requests", description = "Teenager requests for higher limits"),
        (name = "Blocked sites", description = "Per-teenager site blocks"),
        (name = "Custom apps", description = "Teen-registered apps and dashboard visibility")
    )
)]
pub struct ApiDoc;

/// Security scheme addon for Bearer token authentication
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("session_token")
                        .description(Some("Session token returned by register and login"))
                        .build(),
                ),
            )
        }
    }
}
