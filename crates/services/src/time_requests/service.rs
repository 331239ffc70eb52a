use async_trait::async_trait;
use std::sync::Arc;

use super::ports::{
    NewTimeRequest, TimeRequest, TimeRequestListing, TimeRequestRepository, TimeRequestService,
};
use crate::auth::ports::{Caller, Role};
use crate::error::{ServiceError, ServiceResult};
use crate::tasks::ports::TaskRepository;
use crate::types::{RequestStatus, TaskId, TimeRequestId};

pub struct TimeRequestServiceImpl {
    time_request_repository: Arc<dyn TimeRequestRepository>,
    task_repository: Arc<dyn TaskRepository>,
}

impl TimeRequestServiceImpl {
    pub fn new(
        time_request_repository: Arc<dyn TimeRequestRepository>,
        task_repository: Arc<dyn TaskRepository>,
    ) -> Self {
        Self {
            time_request_repository,
            task_repository,
        }
    }
}

#[async_trait]
impl TimeRequestService for TimeRequestServiceImpl {
    async fn list_requests(&self, caller: Caller) -> ServiceResult<Vec<TimeRequestListing>> {
        let requests = match caller.role {
            Role::Parent => {
                self.time_request_repository
                    .list_for_parent(caller.user_id)
                    .await?
            }
            Role::Teenager => {
                self.time_request_repository
                    .list_for_teenager(caller.user_id)
                    .await?
            }
        };
        Ok(requests)
    }

    async fn create_request(
        &self,
        caller: Caller,
        task_id: TaskId,
        additional_time: i32,
        reason: Option<String>,
    ) -> ServiceResult<TimeRequest> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization(
                "Only teenagers can request time extensions",
            ));
        }
        if additional_time <= 0 {
            return Err(ServiceError::validation(
                "Additional time must be a positive number of minutes",
            ));
        }

        let task = self
            .task_repository
            .get_task(task_id)
            .await?
            .filter(|t| t.teenager_id == caller.user_id)
            .ok_or_else(|| ServiceError::not_found("Task not found"))?;

        if self
            .time_request_repository
            .pending_exists_for_task(task.id)
            .await?
        {
            return Err(ServiceError::conflict(
                "A pending request already exists for this task",
            ));
        }

        let request = self
            .time_request_repository
            .create_request(NewTimeRequest {
                task_id,
                teenager_id: caller.user_id,
                additional_time,
                reason,
            })
            .await?;

        tracing::info!(
            "Teen {} requested {} extra minutes on task {}",
            caller.user_id,
            additional_time,
            task_id
        );
        Ok(request)
    }

    async fn decide_request(
        &self,
        caller: Caller,
        id: TimeRequestId,
        decision: RequestStatus,
    ) -> ServiceResult<()> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization(
                "Only parents can approve or reject requests",
            ));
        }
        if !decision.is_terminal() {
            return Err(ServiceError::validation(
                "Status must be either approved or rejected",
            ));
        }

        let (request, task_owner) = self
            .time_request_repository
            .get_request_with_task_owner(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Request not found"))?;

        if task_owner != caller.user_id {
            return Err(ServiceError::authorization("Unauthorized"));
        }
        if request.status != RequestStatus::Pending {
            return Err(ServiceError::conflict(
                "This request has already been processed",
            ));
        }

        self.time_request_repository.set_status(id, decision).await?;

        if decision == RequestStatus::Approved {
            self.task_repository
                .extend_due_date(request.task_id, request.additional_time)
                .await?;
            tracing::info!(
                "Approved time request {}: task {} extended by {} minutes",
                id,
                request.task_id,
                request.additional_time
            );
        }

        Ok(())
    }
}
