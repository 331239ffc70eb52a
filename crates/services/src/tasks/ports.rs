use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::ports::{AccountListing, Caller};
use crate::error::ServiceResult;
use crate::types::{TaskId, UserId};

/// Task lifecycle. Unlike request statuses, these transition freely in any
/// direction; a completed task can be reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Task {
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
}

/// Task row decorated with the counterpart's name for listings: parents see
/// who the task is assigned to, teenagers see who assigned it.
#[derive(Debug, Clone)]
pub struct TaskListing {
    pub task: Task,
    pub teenager_name: Option<String>,
    pub teenager_email: Option<String>,
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub parent_id: UserId,
    pub teenager_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub estimated_time: Option<i32>,
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create_task(&self, task: NewTask) -> anyhow::Result<Task>;
    async fn get_task(&self, task_id: TaskId) -> anyhow::Result<Option<Task>>;
    /// All tasks, joined with teenager names. The parent dashboard shows the
    /// whole household.
    async fn list_all(&self) -> anyhow::Result<Vec<TaskListing>>;
    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<TaskListing>>;
    async fn set_status(&self, task_id: TaskId, status: TaskStatus) -> anyhow::Result<()>;
    /// Shift the due date forward by the given number of minutes.
    async fn extend_due_date(&self, task_id: TaskId, minutes: i32) -> anyhow::Result<()>;
}

#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_tasks(&self, caller: Caller) -> ServiceResult<Vec<TaskListing>>;
    async fn create_task(
        &self,
        caller: Caller,
        teenager_id: UserId,
        title: String,
        description: Option<String>,
        due_date: DateTime<Utc>,
        estimated_time: Option<i32>,
    ) -> ServiceResult<Task>;
    async fn update_status(
        &self,
        caller: Caller,
        task_id: TaskId,
        status: TaskStatus,
    ) -> ServiceResult<()>;
    /// Teenager accounts a parent can assign tasks to.
    async fn list_teenagers(&self, caller: Caller) -> ServiceResult<Vec<AccountListing>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_round_trip() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("done"), None);
    }
}
