use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use services::{types::RequestStatus, TimeRequestId};

use crate::{error::ApiError, middleware::AuthenticatedUser, models::*, state::AppState};

/// List extra-time requests
///
/// Parents see requests against their own tasks; teenagers see the requests
/// they filed.
#[utoipa::path(
    get,
    path = "/api/time-requests",
    tag = "Time requests",
    responses(
        (status = 200, description = "Requests", body = [TimeRequestResponse])
    ),
    security(("session_token" = []))
)]
pub async fn list_time_requests(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TimeRequestResponse>>, ApiError> {
    let requests = app_state
        .time_request_service
        .list_requests(user.caller())
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Request extra time for a task
#[utoipa::path(
    post,
    path = "/api/time-requests",
    tag = "Time requests",
    request_body = CreateTimeRequestRequest,
    responses(
        (status = 201, description = "Request filed", body = TimeRequestResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 409, description = "Pending request already exists", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn create_time_request(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTimeRequestRequest>,
) -> Result<(StatusCode, Json<TimeRequestResponse>), ApiError> {
    let task_id = request
        .task_id
        .ok_or_else(|| ApiError::bad_request("Task id is required"))?;
    let additional_time = request
        .additional_time
        .ok_or_else(|| ApiError::bad_request("Additional time is required"))?;

    let created = app_state
        .time_request_service
        .create_request(user.caller(), task_id, additional_time, request.reason)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Approve or reject an extra-time request
#[utoipa::path(
    patch,
    path = "/api/time-requests/{id}/status",
    tag = "Time requests",
    params(("id" = TimeRequestId, Path, description = "Request id")),
    request_body = DecideRequest,
    responses(
        (status = 200, description = "Decision recorded", body = MessageResponse),
        (status = 400, description = "Invalid status", body = crate::error::ApiErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ApiErrorResponse),
        (status = 409, description = "Request already decided", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn decide_time_request(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<TimeRequestId>,
    Json(request): Json<DecideRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let decision = request
        .status
        .as_deref()
        .and_then(RequestStatus::parse)
        .ok_or_else(|| ApiError::bad_request("Status must be 'approved' or 'rejected'"))?;

    app_state
        .time_request_service
        .decide_request(user.caller(), id, decision)
        .await?;

    Ok(Json(MessageResponse {
        message: "Time request updated".to_string(),
    }))
}

pub fn create_time_request_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_time_requests).post(create_time_request))
        .route("/:id/status", patch(decide_time_request))
}
