use async_trait::async_trait;
use chrono::NaiveDate;

use crate::auth::ports::Caller;
use crate::error::ServiceResult;
use crate::types::UserId;

/// One stored (app, day) usage cell for a teenager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRow {
    pub app_name: String,
    pub usage_date: NaiveDate,
    pub usage_minutes: i32,
}

/// Inclusive calendar window a usage query runs over.
///
/// `On` is the exact-match path for "today only" (window of 0 days); `Since`
/// covers every date from the start date through today. The two are distinct
/// on purpose: an exact match can never pick up a stale yesterday row when
/// the request straddles midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    On(NaiveDate),
    Since(NaiveDate),
}

impl DateWindow {
    /// Resolve a `days` parameter against the request's report date.
    /// Subtraction is calendar-based, so the window is stable across
    /// timezones and DST shifts.
    pub fn resolve(days: i64, today: NaiveDate) -> Self {
        if days == 0 {
            DateWindow::On(today)
        } else {
            DateWindow::Since(today - chrono::Duration::days(days))
        }
    }
}

#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Atomically insert-or-accumulate minutes for (teenager, app, date).
    /// A single store statement; never a read-modify-write pair.
    async fn add_usage(
        &self,
        teenager_id: UserId,
        app_name: &str,
        minutes: i32,
        date: NaiveDate,
    ) -> anyhow::Result<()>;

    /// Authoritative stored total for one key, read back after a write.
    async fn total_for_day(
        &self,
        teenager_id: UserId,
        app_name: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Option<i32>>;

    /// Rows in the window. `On` ordering is app_name; `Since` ordering is
    /// usage_date DESC then app_name.
    async fn usage_in_window(
        &self,
        teenager_id: UserId,
        window: DateWindow,
    ) -> anyhow::Result<Vec<UsageRow>>;
}

#[async_trait]
pub trait UsageService: Send + Sync {
    /// Record minutes for an app on the given report date and return the
    /// stored total after the write.
    async fn record_usage(
        &self,
        caller: Caller,
        app_name: &str,
        minutes: i32,
        today: NaiveDate,
    ) -> ServiceResult<i32>;

    /// The caller's own usage rows for a `days`-back window.
    async fn list_usage(
        &self,
        caller: Caller,
        days: i64,
        today: NaiveDate,
    ) -> ServiceResult<Vec<UsageRow>>;
}
