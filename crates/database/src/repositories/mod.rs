pub mod app_limit_repository;
pub mod blocked_site_repository;
pub mod custom_app_repository;
pub mod report_repository;
pub mod session_repository;
pub mod task_repository;
pub mod time_limit_request_repository;
pub mod time_request_repository;
pub mod usage_repository;
pub mod user_repository;

pub use app_limit_repository::PostgresAppLimitRepository;
pub use blocked_site_repository::PostgresBlockedSiteRepository;
pub use custom_app_repository::PostgresCustomAppRepository;
pub use report_repository::PostgresReportRepository;
pub use session_repository::PostgresSessionRepository;
pub use task_repository::PostgresTaskRepository;
pub use time_limit_request_repository::PostgresTimeLimitRequestRepository;
pub use time_request_repository::PostgresTimeRequestRepository;
pub use usage_repository::PostgresUsageRepository;
pub use user_repository::PostgresUserRepository;
