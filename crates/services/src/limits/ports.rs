use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::ports::Caller;
use crate::error::ServiceResult;
use crate::types::{AppLimitId, RequestStatus, TimeLimitRequestId, UserId};

#[derive(Debug, Clone)]
pub struct AppLimit {
    pub id: AppLimitId,
    pub parent_id: UserId,
    pub teenager_id: UserId,
    pub app_name: String,
    pub daily_limit_minutes: i32,
    pub created_at: DateTime<Utc>,
}

/// Limit row decorated with the teenager's name for parent listings.
#[derive(Debug, Clone)]
pub struct AppLimitListing {
    pub limit: AppLimit,
    pub teenager_name: Option<String>,
}

/// Whether a set-limit call created a new row or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitWrite {
    Created,
    Updated,
}

/// A teenager's request to raise an app limit. `current_limit` snapshots the
/// limit at creation time (0 when none existed) so the parent sees what they
/// are being asked to change.
#[derive(Debug, Clone)]
pub struct TimeLimitRequest {
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
}

#[derive(Debug, Clone)]
pub struct TimeLimitRequestListing {
    pub request: TimeLimitRequest,
    pub teenager_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTimeLimitRequest {
    pub teenager_id: UserId,
    pub parent_id: UserId,
    pub app_name: String,
    pub current_limit: i32,
    pub requested_limit: i32,
    pub reason: Option<String>,
}

#[async_trait]
pub trait AppLimitRepository: Send + Sync {
    async fn list_for_parent(&self, parent_id: UserId) -> anyhow::Result<Vec<AppLimitListing>>;
    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<AppLimit>>;
    async fn get_limit(
        &self,
        teenager_id: UserId,
        app_name: &str,
    ) -> anyhow::Result<Option<AppLimit>>;
    /// Insert or update the limit for (teenager, app). Lost-update risk is
    /// acceptable here; only the usage path needs a store-level atomic write.
    async fn upsert_limit(
        &self,
        parent_id: UserId,
        teenager_id: UserId,
        app_name: &str,
        daily_limit_minutes: i32,
    ) -> anyhow::Result<LimitWrite>;
    async fn get_for_parent(
        &self,
        id: AppLimitId,
        parent_id: UserId,
    ) -> anyhow::Result<Option<AppLimit>>;
    async fn delete_limit(&self, id: AppLimitId) -> anyhow::Result<()>;
}

#[async_trait]
pub trait TimeLimitRequestRepository: Send + Sync {
    async fn create_request(
        &self,
        request: NewTimeLimitRequest,
    ) -> anyhow::Result<TimeLimitRequest>;
    async fn pending_exists(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<bool>;
    async fn list_for_teenager(
        &self,
        teenager_id: UserId,
    ) -> anyhow::Result<Vec<TimeLimitRequest>>;
    async fn list_for_parent(
        &self,
        parent_id: UserId,
        status: Option<RequestStatus>,
    ) -> anyhow::Result<Vec<TimeLimitRequestListing>>;
    async fn get_for_parent(
        &self,
        id: TimeLimitRequestId,
        parent_id: UserId,
    ) -> anyhow::Result<Option<TimeLimitRequest>>;
    async fn set_status(
        &self,
        id: TimeLimitRequestId,
        status: RequestStatus,
    ) -> anyhow::Result<()>;
    /// Returns the number of rows removed; 0 means nothing was in scope.
    async fn delete_pending_for_teenager(
        &self,
        id: TimeLimitRequestId,
        teenager_id: UserId,
    ) -> anyhow::Result<u64>;
    async fn delete_for_parent(
        &self,
        id: TimeLimitRequestId,
        parent_id: UserId,
    ) -> anyhow::Result<u64>;
}

/// Status filter for the parent's request inbox. Defaults to pending; `all`
/// disables filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Pending,
    All,
    Only(RequestStatus),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(StatusFilter::All),
            other => RequestStatus::parse(other).map(StatusFilter::Only),
        }
    }

    pub fn as_status(&self) -> Option<RequestStatus> {
        match self {
            StatusFilter::Pending => Some(RequestStatus::Pending),
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }
}

#[async_trait]
pub trait LimitService: Send + Sync {
    async fn list_limits(&self, caller: Caller) -> ServiceResult<Vec<AppLimitListing>>;
    async fn set_limit(
        &self,
        caller: Caller,
        teenager_id: UserId,
        app_name: &str,
        daily_limit_minutes: i32,
    ) -> ServiceResult<LimitWrite>;
    async fn delete_limit(&self, caller: Caller, id: AppLimitId) -> ServiceResult<()>;

    async fn create_limit_request(
        &self,
        caller: Caller,
        app_name: &str,
        requested_limit: i32,
        reason: Option<String>,
    ) -> ServiceResult<TimeLimitRequest>;
    async fn my_limit_requests(&self, caller: Caller) -> ServiceResult<Vec<TimeLimitRequest>>;
    async fn parent_limit_requests(
        &self,
        caller: Caller,
        filter: StatusFilter,
    ) -> ServiceResult<Vec<TimeLimitRequestListing>>;
    /// Approve or reject a pending request; approval writes the limit.
    async fn decide_limit_request(
        &self,
        caller: Caller,
        id: TimeLimitRequestId,
        decision: RequestStatus,
    ) -> ServiceResult<()>;
    async fn delete_limit_request(
        &self,
        caller: Caller,
        id: TimeLimitRequestId,
    ) -> ServiceResult<()>;
}
