use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::ports::Caller;
use crate::error::ServiceResult;
use crate::types::{RequestStatus, TaskId, TimeRequestId, UserId};

/// A teenager's request for more time on a task. Approval shifts the task's
/// due date forward by `additional_time` minutes.
#[derive(Debug, Clone)]
pub struct TimeRequest {
    pub id: TimeRequestId,
    pub task_id: TaskId,
    pub teenager_id: UserId,
    pub additional_time: i32,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row joined with the task title (and, for parents, the teenager's
/// name).
#[derive(Debug, Clone)]
pub struct TimeRequestListing {
    pub request: TimeRequest,
    pub task_title: String,
    pub teenager_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTimeRequest {
    pub task_id: TaskId,
    pub teenager_id: UserId,
    pub additional_time: i32,
    pub reason: Option<String>,
}

#[async_trait]
pub trait TimeRequestRepository: Send + Sync {
    async fn create_request(&self, request: NewTimeRequest) -> anyhow::Result<TimeRequest>;
    /// The request together with the parent who owns the referenced task.
    async fn get_request_with_task_owner(
        &self,
        id: TimeRequestId,
    ) -> anyhow::Result<Option<(TimeRequest, UserId)>>;
    async fn pending_exists_for_task(&self, task_id: TaskId) -> anyhow::Result<bool>;
    async fn list_for_parent(&self, parent_id: UserId)
        -> anyhow::Result<Vec<TimeRequestListing>>;
    async fn list_for_teenager(
        &self,
        teenager_id: UserId,
    ) -> anyhow::Result<Vec<TimeRequestListing>>;
    async fn set_status(&self, id: TimeRequestId, status: RequestStatus) -> anyhow::Result<()>;
}

#[async_trait]
pub trait TimeRequestService: Send + Sync {
    async fn list_requests(&self, caller: Caller) -> ServiceResult<Vec<TimeRequestListing>>;
    async fn create_request(
        &self,
        caller: Caller,
        task_id: TaskId,
        additional_time: i32,
        reason: Option<String>,
    ) -> ServiceResult<TimeRequest>;
    /// Approve or reject a pending request. Approval extends the task's due
    /// date by the requested minutes.
    async fn decide_request(
        &self,
        caller: Caller,
        id: TimeRequestId,
        decision: RequestStatus,
    ) -> ServiceResult<()>;
}
