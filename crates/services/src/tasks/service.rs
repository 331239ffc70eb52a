use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::ports::{NewTask, Task, TaskListing, TaskRepository, TaskService, TaskStatus};
use crate::auth::ports::{AccountListing, Caller, Role, UserRepository};
use crate::error::{ServiceError, ServiceResult};
use crate::types::{TaskId, UserId};

pub struct TaskServiceImpl {
    task_repository: Arc<dyn TaskRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl TaskServiceImpl {
    pub fn new(
        task_repository: Arc<dyn TaskRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            task_repository,
            user_repository,
        }
    }
}

#[async_trait]
impl TaskService for TaskServiceImpl {
    async fn list_tasks(&self, caller: Caller) -> ServiceResult<Vec<TaskListing>> {
        let tasks = match caller.role {
            Role::Parent => self.task_repository.list_all().await?,
            Role::Teenager => {
                self.task_repository
                    .list_for_teenager(caller.user_id)
                    .await?
            }
        };
        Ok(tasks)
    }

    async fn create_task(
        &self,
        caller: Caller,
        teenager_id: UserId,
        title: String,
        description: Option<String>,
        due_date: DateTime<Utc>,
        estimated_time: Option<i32>,
    ) -> ServiceResult<Task> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization("Only parents can create tasks"));
        }
        if title.trim().is_empty() {
            return Err(ServiceError::validation("Title is required"));
        }

        let task = self
            .task_repository
            .create_task(NewTask {
                parent_id: caller.user_id,
                teenager_id,
                title,
                description,
                due_date,
                estimated_time,
            })
            .await?;

        tracing::info!("Parent {} created task {}", caller.user_id, task.id);
        Ok(task)
    }

    async fn update_status(
        &self,
        caller: Caller,
        task_id: TaskId,
        status: TaskStatus,
    ) -> ServiceResult<()> {
        let task = self
            .task_repository
            .get_task(task_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task not found"))?;

        // Either owning side may move the status; nobody else may touch it.
        let authorized = match caller.role {
            Role::Teenager => task.teenager_id == caller.user_id,
            Role::Parent => task.parent_id == caller.user_id,
        };
        if !authorized {
            return Err(ServiceError::authorization("Unauthorized"));
        }

        self.task_repository.set_status(task_id, status).await?;
        Ok(())
    }

    async fn list_teenagers(&self, caller: Caller) -> ServiceResult<Vec<AccountListing>> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization(
                "Only parents can view teenagers",
            ));
        }
        Ok(self.user_repository.list_teenagers().await?)
    }
}
