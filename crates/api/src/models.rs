use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use services::{
    apps::ports::{CustomApp, CustomAppListing},
    auth::ports::{AccountListing, AuthenticatedSession, Role, UserSummary},
    limits::ports::{AppLimit, AppLimitListing, TimeLimitRequest, TimeLimitRequestListing},
    limits::PredefinedApp,
    report::ports::{
        AppSummary, BlockedSiteEntry, CategoryTime, ParentAppSummary, ParentReport,
        ParentUsageRow, TaskStats, TeenReport, TodayUsage,
    },
    sites::ports::{BlockedSite, BlockedSiteListing},
    tasks::ports::{Task, TaskListing, TaskStatus},
    time_requests::ports::{TimeRequest, TimeRequestListing},
    types::RequestStatus,
    usage::ports::UsageRow,
    AppLimitId, BlockedSiteId, CustomAppId, TaskId, TimeLimitRequestId, TimeRequestId, UserId,
};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Auth

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// "parent" or "teenager"
    pub role: Option<String>,
    /// Required when registering a teenager
    pub parent_id: Option<UserId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<UserSummary> for UserResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Response for successful registration or login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl From<AuthenticatedSession> for AuthResponse {
    fn from(auth: AuthenticatedSession) -> Self {
        Self {
            token: auth.session.token.unwrap_or_default(),
            expires_at: auth.session.expires_at,
            user: auth.user.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<AccountListing> for AccountResponse {
    fn from(account: AccountListing) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Usage

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordUsageRequest {
    pub app_name: Option<String>,
    pub usage_minutes: Option<i32>,
}

/// Acknowledgement carrying the stored total after the write
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordUsageResponse {
    pub message: String,
    /// The stored total for (app, today) after this write
    pub saved_minutes: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsageRowResponse {
    pub app_name: String,
    pub usage_date: NaiveDate,
    pub usage_minutes: i32,
}

impl From<UsageRow> for UsageRowResponse {
    fn from(row: UsageRow) -> Self {
        Self {
            app_name: row.app_name,
            usage_date: row.usage_date,
            usage_minutes: row.usage_minutes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsageListResponse {
    pub usage: Vec<UsageRowResponse>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UsageQuery {
    /// Days back from today; 0 means today only. Defaults to 7.
    pub days: Option<i64>,
}

// ---------------------------------------------------------------------------
// Reports

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ReportQuery {
    /// Days back from today; 0 means today only. Defaults to 7.
    pub days: Option<i64>,
    /// Restrict every report section to one teenager
    pub teenager_id: Option<UserId>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppSummaryResponse {
    pub app_name: String,
    pub total_minutes: i64,
    pub avg_minutes: f64,
    pub days_used: i64,
    pub daily_limit_minutes: Option<i32>,
}

impl From<AppSummary> for AppSummaryResponse {
    fn from(s: AppSummary) -> Self {
        Self {
            app_name: s.app_name,
            total_minutes: s.total_minutes,
            avg_minutes: s.avg_minutes,
            days_used: s.days_used,
            daily_limit_minutes: s.daily_limit_minutes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodayUsageResponse {
    pub app_name: String,
    pub usage_minutes: i32,
    pub usage_date: NaiveDate,
    pub daily_limit_minutes: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<TodayUsage> for TodayUsageResponse {
    fn from(t: TodayUsage) -> Self {
        Self {
            app_name: t.app_name,
            usage_minutes: t.usage_minutes,
            usage_date: t.usage_date,
            daily_limit_minutes: t.daily_limit_minutes,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskStatsResponse {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub in_progress_tasks: i64,
    pub pending_tasks: i64,
}

impl From<TaskStats> for TaskStatsResponse {
    fn from(s: TaskStats) -> Self {
        Self {
            total_tasks: s.total_tasks,
            completed_tasks: s.completed_tasks,
            in_progress_tasks: s.in_progress_tasks,
            pending_tasks: s.pending_tasks,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlockedSiteResponse {
    pub id: BlockedSiteId,
    pub site_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teenager_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teenager_name: Option<String>,
}

impl From<BlockedSiteEntry> for BlockedSiteResponse {
    fn from(e: BlockedSiteEntry) -> Self {
        Self {
            id: e.id,
            site_url: e.site_url,
            created_at: e.created_at,
            teenager_id: e.teenager_id,
            teenager_name: e.teenager_name,
        }
    }
}

impl From<BlockedSite> for BlockedSiteResponse {
    fn from(s: BlockedSite) -> Self {
        Self {
            id: s.id,
            site_url: s.site_url,
            created_at: s.created_at,
            teenager_id: Some(s.teenager_id),
            teenager_name: None,
        }
    }
}

impl From<BlockedSiteListing> for BlockedSiteResponse {
    fn from(l: BlockedSiteListing) -> Self {
        let mut response = BlockedSiteResponse::from(l.site);
        response.teenager_name = l.teenager_name;
        response
    }
}

/// Teenager's own report. Top-level keys are camelCase; row fields stay
/// snake_case.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeenReportResponse {
    pub daily_usage: Vec<UsageRowResponse>,
    pub summary: Vec<AppSummaryResponse>,
    pub today_usage: Vec<TodayUsageResponse>,
    pub tasks_stats: TaskStatsResponse,
    pub blocked_sites: Vec<BlockedSiteResponse>,
}

impl From<TeenReport> for TeenReportResponse {
    fn from(r: TeenReport) -> Self {
        Self {
            daily_usage: r.daily_usage.into_iter().map(Into::into).collect(),
            summary: r.summary.into_iter().map(Into::into).collect(),
            today_usage: r.today_usage.into_iter().map(Into::into).collect(),
            tasks_stats: r.tasks_stats.into(),
            blocked_sites: r.blocked_sites.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParentUsageRowResponse {
    pub app_name: String,
    pub usage_date: NaiveDate,
    pub usage_minutes: i32,
    pub daily_limit_minutes: Option<i32>,
    pub teenager_id: UserId,
    pub teenager_name: String,
}

impl From<ParentUsageRow> for ParentUsageRowResponse {
    fn from(r: ParentUsageRow) -> Self {
        Self {
            app_name: r.app_name,
            usage_date: r.usage_date,
            usage_minutes: r.usage_minutes,
            daily_limit_minutes: r.daily_limit_minutes,
            teenager_id: r.teenager_id,
            teenager_name: r.teenager_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParentAppSummaryResponse {
    pub app_name: String,
    pub total_minutes: i64,
    pub avg_minutes: f64,
    pub days_used: i64,
    pub teenager_id: UserId,
    pub teenager_name: String,
}

impl From<ParentAppSummary> for ParentAppSummaryResponse {
    fn from(s: ParentAppSummary) -> Self {
        Self {
            app_name: s.app_name,
            total_minutes: s.total_minutes,
            avg_minutes: s.avg_minutes,
            days_used: s.days_used,
            teenager_id: s.teenager_id,
            teenager_name: s.teenager_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryTimeResponse {
    pub category: String,
    pub total_minutes: i64,
    pub app_count: i64,
}

impl From<CategoryTime> for CategoryTimeResponse {
    fn from(c: CategoryTime) -> Self {
        Self {
            category: c.category,
            total_minutes: c.total_minutes,
            app_count: c.app_count,
        }
    }
}

/// Parent's household report. Same casing convention as the teen report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParentReportResponse {
    pub usage: Vec<ParentUsageRowResponse>,
    pub summary: Vec<ParentAppSummaryResponse>,
    pub total_screen_time: i64,
    pub tasks_stats: TaskStatsResponse,
    pub category_time: Vec<CategoryTimeResponse>,
    pub blocked_sites: Vec<BlockedSiteResponse>,
}

impl From<ParentReport> for ParentReportResponse {
    fn from(r: ParentReport) -> Self {
        Self {
            usage: r.usage.into_iter().map(Into::into).collect(),
            summary: r.summary.into_iter().map(Into::into).collect(),
            total_screen_time: r.total_screen_time,
            tasks_stats: r.tasks_stats.into(),
            category_time: r.category_time.into_iter().map(Into::into).collect(),
            blocked_sites: r.blocked_sites.into_iter().map(Into::into).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: TaskId,
    pub parent_id: UserId,
    pub teenager_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub estimated_time: Option<i32>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teenager_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teenager_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            parent_id: task.parent_id,
            teenager_id: task.teenager_id,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            estimated_time: task.estimated_time,
            status: task.status,
            created_at: task.created_at,
            updated_at: task.updated_at,
            teenager_name: None,
            teenager_email: None,
            parent_name: None,
        }
    }
}

impl From<TaskListing> for TaskResponse {
    fn from(listing: TaskListing) -> Self {
        let mut response = TaskResponse::from(listing.task);
        response.teenager_name = listing.teenager_name;
        response.teenager_email = listing.teenager_email;
        response.parent_name = listing.parent_name;
        response
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub teenager_id: Option<UserId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_time: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskStatusRequest {
    /// "pending", "in_progress" or "completed"
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Time requests

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeRequestResponse {
    pub id: TimeRequestId,
    pub task_id: TaskId,
    pub teenager_id: UserId,
    pub additional_time: i32,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teenager_name: Option<String>,
}

impl From<TimeRequest> for TimeRequestResponse {
    fn from(r: TimeRequest) -> Self {
        Self {
            id: r.id,
            task_id: r.task_id,
            teenager_id: r.teenager_id,
            additional_time: r.additional_time,
            reason: r.reason,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
            task_title: None,
            teenager_name: None,
        }
    }
}

impl From<TimeRequestListing> for TimeRequestResponse {
    fn from(l: TimeRequestListing) -> Self {
        let mut response = TimeRequestResponse::from(l.request);
        response.task_title = Some(l.task_title);
        response.teenager_name = l.teenager_name;
        response
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTimeRequestRequest {
    pub task_id: Option<TaskId>,
    pub additional_time: Option<i32>,
    pub reason: Option<String>,
}

/// Body for approving or rejecting any kind of request
#[derive(Debug, Deserialize, ToSchema)]
pub struct DecideRequest {
    /// "approved" or "rejected"
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// App limits

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PredefinedAppResponse {
    pub name: String,
    pub icon: String,
    pub category: String,
    pub default_limit: i32,
    pub url: String,
}

impl From<&PredefinedApp> for PredefinedAppResponse {
    fn from(app: &PredefinedApp) -> Self {
        Self {
            name: app.name.to_string(),
            icon: app.icon.to_string(),
            category: app.category.to_string(),
            default_limit: app.default_limit,
            url: app.url.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppLimitResponse {
    pub id: AppLimitId,
    pub parent_id: UserId,
    pub teenager_id: UserId,
    pub app_name: String,
    pub daily_limit_minutes: i32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teenager_name: Option<String>,
}

impl From<AppLimit> for AppLimitResponse {
    fn from(limit: AppLimit) -> Self {
        Self {
            id: limit.id,
            parent_id: limit.parent_id,
            teenager_id: limit.teenager_id,
            app_name: limit.app_name,
            daily_limit_minutes: limit.daily_limit_minutes,
            created_at: limit.created_at,
            teenager_name: None,
        }
    }
}

impl From<AppLimitListing> for AppLimitResponse {
    fn from(listing: AppLimitListing) -> Self {
        let mut response = AppLimitResponse::from(listing.limit);
        response.teenager_name = listing.teenager_name;
        response
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetLimitRequest {
    pub teenager_id: Option<UserId>,
    pub app_name: Option<String>,
    pub daily_limit_minutes: Option<i32>,
}

// ---------------------------------------------------------------------------
// Time-limit requests

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeLimitRequestResponse {
    pub id: TimeLimitRequestId,
    pub teenager_id: UserId,
    pub parent_id: UserId,
    pub app_name: String,
    pub current_limit: i32,
    pub requested_limit: i32,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teenager_name: Option<String>,
}

impl From<TimeLimitRequest> for TimeLimitRequestResponse {
    fn from(r: TimeLimitRequest) -> Self {
        Self {
            id: r.id,
            teenager_id: r.teenager_id,
            parent_id: r.parent_id,
            app_name: r.app_name,
            current_limit: r.current_limit,
            requested_limit: r.requested_limit,
            reason: r.reason,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
            teenager_name: None,
        }
    }
}

impl From<TimeLimitRequestListing> for TimeLimitRequestResponse {
    fn from(l: TimeLimitRequestListing) -> Self {
        let mut response = TimeLimitRequestResponse::from(l.request);
        response.teenager_name = l.teenager_name;
        response
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLimitRequestRequest {
    pub app_name: Option<String>,
    pub requested_limit: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LimitRequestQuery {
    /// "pending" (default), "approved", "rejected" or "all"
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Blocked sites

#[derive(Debug, Deserialize, ToSchema)]
pub struct BlockSiteRequest {
    pub site_url: Option<String>,
    pub teenager_id: Option<UserId>,
}

// ---------------------------------------------------------------------------
// Custom apps

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomAppResponse {
    pub id: CustomAppId,
    pub teenager_id: UserId,
    pub app_name: String,
    pub icon: String,
    pub category: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teenager_name: Option<String>,
}

impl From<CustomApp> for CustomAppResponse {
    fn from(app: CustomApp) -> Self {
        Self {
            id: app.id,
            teenager_id: app.teenager_id,
            app_name: app.app_name,
            icon: app.icon,
            category: app.category,
            url: app.url,
            created_at: app.created_at,
            teenager_name: None,
        }
    }
}

impl From<CustomAppListing> for CustomAppResponse {
    fn from(listing: CustomAppListing) -> Self {
        let mut response = CustomAppResponse::from(listing.app);
        response.teenager_name = listing.teenager_name;
        response
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertCustomAppRequest {
    pub app_name: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HideAppRequest {
    pub app_name: Option<String>,
}
