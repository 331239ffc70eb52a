use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use services::{tasks::ports::TaskStatus, TaskId};

use crate::{error::ApiError, middleware::AuthenticatedUser, models::*, state::AppState};

/// List tasks
///
/// Parents see every task joined with the assignee; teenagers see their own
/// tasks joined with the parent who created them.
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    responses(
        (status = 200, description = "Tasks", body = [TaskResponse])
    ),
    security(("session_token" = []))
)]
pub async fn list_tasks(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = app_state.task_service.list_tasks(user.caller()).await?;
    Ok(Json(tasks.into_iter().map(Into::into).collect()))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 403, description = "Parent account required", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn create_task(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let teenager_id = request
        .teenager_id
        .ok_or_else(|| ApiError::bad_request("Teenager id is required"))?;
    let title = request
        .title
        .ok_or_else(|| ApiError::bad_request("Title is required"))?;
    let due_date = request
        .due_date
        .ok_or_else(|| ApiError::bad_request("Due date is required"))?;

    let task = app_state
        .task_service
        .create_task(
            user.caller(),
            teenager_id,
            title,
            request.description,
            due_date,
            request.estimated_time,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Change a task's status
///
/// Statuses transition freely; the caller must be the assignee or the
/// creating parent.
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/status",
    tag = "Tasks",
    params(("id" = TaskId, Path, description = "Task id")),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Invalid status", body = crate::error::ApiErrorResponse),
        (status = 404, description = "Task not found", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn update_task_status(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<TaskId>,
    Json(request): Json<UpdateTaskStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let status = request
        .status
        .as_deref()
        .and_then(TaskStatus::parse)
        .ok_or_else(|| {
            ApiError::bad_request("Status must be 'pending', 'in_progress' or 'completed'")
        })?;

    app_state
        .task_service
        .update_status(user.caller(), id, status)
        .await?;

    Ok(Json(MessageResponse {
        message: "Task status updated".to_string(),
    }))
}

/// List assignable teenagers
#[utoipa::path(
    get,
    path = "/api/tasks/teenagers",
    tag = "Tasks",
    responses(
        (status = 200, description = "Teenager accounts", body = [AccountResponse]),
        (status = 403, description = "Parent account required", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn list_teenagers(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let teenagers = app_state.task_service.list_teenagers(user.caller()).await?;
    Ok(Json(teenagers.into_iter().map(Into::into).collect()))
}

pub fn create_task_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/teenagers", get(list_teenagers))
        .route("/:id/status", patch(update_task_status))
}
