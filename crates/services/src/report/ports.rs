use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::auth::ports::Caller;
use crate::error::ServiceResult;
use crate::types::{BlockedSiteId, UserId};
use crate::usage::ports::{DateWindow, UsageRow};

/// Per-app rollup for the teenager's own report. `avg_minutes` is the mean
/// over days that have a recorded row; days without usage are absent rows and
/// do not depress the average.
#[derive(Debug, Clone)]
pub struct AppSummary {
    pub app_name: String,
    pub total_minutes: i64,
    pub avg_minutes: f64,
    pub days_used: i64,
    pub daily_limit_minutes: Option<i32>,
}

/// Exact-date usage slice joined with the app's current limit. Backs the
/// live limit-enforcement UI, so it is computed fresh on every call.
#[derive(Debug, Clone)]
pub struct TodayUsage {
    pub app_name: String,
    pub usage_minutes: i32,
    pub usage_date: NaiveDate,
    pub daily_limit_minutes: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

/// Task counts by status. Defaults to all zeroes so a report never has a
/// missing or null stats key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub in_progress_tasks: i64,
    pub pending_tasks: i64,
}

#[derive(Debug, Clone)]
pub struct BlockedSiteEntry {
    pub id: BlockedSiteId,
    pub site_url: String,
    pub created_at: DateTime<Utc>,
    /// Present in parent-view rows only.
    pub teenager_id: Option<UserId>,
    pub teenager_name: Option<String>,
}

/// Per-app-per-day row in the parent view, joined with the teenager's name
/// and the app's limit.
#[derive(Debug, Clone)]
pub struct ParentUsageRow {
    pub app_name: String,
    pub usage_date: NaiveDate,
    pub usage_minutes: i32,
    pub daily_limit_minutes: Option<i32>,
    pub teenager_id: UserId,
    pub teenager_name: String,
}

/// Per-(app, teenager) rollup in the parent view.
#[derive(Debug, Clone)]
pub struct ParentAppSummary {
    pub app_name: String,
    pub total_minutes: i64,
    pub avg_minutes: f64,
    pub days_used: i64,
    pub teenager_id: UserId,
    pub teenager_name: String,
}

/// Usage grouped by app category. Apps without a custom-app catalog entry
/// land in the "Other" bucket.
#[derive(Debug, Clone)]
pub struct CategoryTime {
    pub category: String,
    pub total_minutes: i64,
    pub app_count: i64,
}

#[derive(Debug, Clone)]
pub struct TeenReport {
    pub daily_usage: Vec<UsageRow>,
    pub summary: Vec<AppSummary>,
    pub today_usage: Vec<TodayUsage>,
    pub tasks_stats: TaskStats,
    pub blocked_sites: Vec<BlockedSiteEntry>,
}

#[derive(Debug, Clone)]
pub struct ParentReport {
    pub usage: Vec<ParentUsageRow>,
    pub summary: Vec<ParentAppSummary>,
    pub total_screen_time: i64,
    pub tasks_stats: TaskStats,
    pub category_time: Vec<CategoryTime>,
    pub blocked_sites: Vec<BlockedSiteEntry>,
}

/// Aggregation queries behind the reports. Every parent-view method takes
/// the same optional teenager filter; applying it unevenly would produce a
/// report whose sections disagree on scope.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn daily_usage(
        &self,
        teenager_id: UserId,
        window: DateWindow,
    ) -> anyhow::Result<Vec<UsageRow>>;

    async fn app_summary(
        &self,
        teenager_id: UserId,
        window: DateWindow,
    ) -> anyhow::Result<Vec<AppSummary>>;

    async fn today_usage(
        &self,
        teenager_id: UserId,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<TodayUsage>>;

    async fn task_stats_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<TaskStats>;

    async fn blocked_sites_for_teenager(
        &self,
        teenager_id: UserId,
    ) -> anyhow::Result<Vec<BlockedSiteEntry>>;

    async fn parent_usage(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<ParentUsageRow>>;

    async fn parent_summary(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<ParentAppSummary>>;

    async fn total_screen_time(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<i64>;

    async fn task_stats_for_parent(
        &self,
        parent_id: UserId,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<TaskStats>;

    async fn category_time(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<CategoryTime>>;

    async fn blocked_sites_for_parent(
        &self,
        parent_id: UserId,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<BlockedSiteEntry>>;
}

#[async_trait]
pub trait ReportService: Send + Sync {
    /// Self-view report for a teenager over a `days`-back window.
    async fn teen_report(
        &self,
        caller: Caller,
        days: i64,
        today: NaiveDate,
    ) -> ServiceResult<TeenReport>;

    /// Parent-view report over all (or one) of the parent's teenagers.
    async fn parent_report(
        &self,
        caller: Caller,
        days: i64,
        teenager_id: Option<UserId>,
        today: NaiveDate,
    ) -> ServiceResult<ParentReport>;
}
