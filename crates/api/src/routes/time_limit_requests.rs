use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use services::limits::StatusFilter;
use services::{types::RequestStatus, TimeLimitRequestId};

use crate::{error::ApiError, middleware::AuthenticatedUser, models::*, state::AppState};

/// Ask for a higher app limit
#[utoipa::path(
    post,
    path = "/api/time-limit-requests",
    tag = "Limit requests",
    request_body = CreateLimitRequestRequest,
    responses(
        (status = 201, description = "Request filed", body = TimeLimitRequestResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 409, description = "Pending request already exists", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn create_limit_request(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateLimitRequestRequest>,
) -> Result<(StatusCode, Json<TimeLimitRequestResponse>), ApiError> {
    let app_name = request
        .app_name
        .ok_or_else(|| ApiError::bad_request("App name is required"))?;
    let requested_limit = request
        .requested_limit
        .ok_or_else(|| ApiError::bad_request("Requested limit is required"))?;

    let created = app_state
        .limit_service
        .create_limit_request(user.caller(), &app_name, requested_limit, request.reason)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Limit requests filed by the calling teenager
#[utoipa::path(
    get,
    path = "/api/time-limit-requests/my-requests",
    tag = "Limit requests",
    responses(
        (status = 200, description = "Requests", body = [TimeLimitRequestResponse])
    ),
    security(("session_token" = []))
)]
pub async fn my_limit_requests(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TimeLimitRequestResponse>>, ApiError> {
    let requests = app_state
        .limit_service
        .my_limit_requests(user.caller())
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Limit requests awaiting the calling parent
///
/// Defaults to pending requests; `?status=all` lists everything and
/// `?status=approved` or `?status=rejected` filters by outcome.
#[utoipa::path(
    get,
    path = "/api/time-limit-requests/parent-requests",
    tag = "Limit requests",
    params(LimitRequestQuery),
    responses(
        (status = 200, description = "Requests", body = [TimeLimitRequestResponse]),
        (status = 400, description = "Invalid status filter", body = crate::error::ApiErrorResponse),
        (status = 403, description = "Parent account required", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn parent_limit_requests(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<LimitRequestQuery>,
) -> Result<Json<Vec<TimeLimitRequestResponse>>, ApiError> {
    let filter = match query.status.as_deref() {
        None => StatusFilter::default(),
        Some(raw) => StatusFilter::parse(raw).ok_or_else(|| {
            ApiError::bad_request("Status must be 'all', 'pending', 'approved' or 'rejected'")
        })?,
    };

    let requests = app_state
        .limit_service
        .parent_limit_requests(user.caller(), filter)
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Approve or reject a limit request
///
/// Approval writes the requested allowance as the teenager's limit for
/// that app.
#[utoipa::path(
    put,
    path = "/api/time-limit-requests/{id}",
    tag = "Limit requests",
    params(("id" = TimeLimitRequestId, Path, description = "Request id")),
    request_body = DecideRequest,
    responses(
        (status = 200, description = "Decision recorded", body = MessageResponse),
        (status = 400, description = "Invalid status", body = crate::error::ApiErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ApiErrorResponse),
        (status = 409, description = "Request already decided", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn decide_limit_request(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<TimeLimitRequestId>,
    Json(request): Json<DecideRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let decision = request
        .status
        .as_deref()
        .and_then(RequestStatus::parse)
        .ok_or_else(|| ApiError::bad_request("Status must be 'approved' or 'rejected'"))?;

    app_state
        .limit_service
        .decide_limit_request(user.caller(), id, decision)
        .await?;

    Ok(Json(MessageResponse {
        message: "Limit request updated".to_string(),
    }))
}

/// Withdraw or clear a limit request
///
/// Teenagers can withdraw their own pending requests; parents can delete
/// any request addressed to them.
#[utoipa::path(
    delete,
    path = "/api/time-limit-requests/{id}",
    tag = "Limit requests",
    params(("id" = TimeLimitRequestId, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request deleted", body = MessageResponse),
        (status = 404, description = "Request not found", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn delete_limit_request(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<TimeLimitRequestId>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .limit_service
        .delete_limit_request(user.caller(), id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Limit request deleted".to_string(),
    }))
}

pub fn create_time_limit_request_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_limit_request))
        .route("/my-requests", get(my_limit_requests))
        .route("/parent-requests", get(parent_limit_requests))
        .route(
            "/:id",
            put(decide_limit_request).delete(delete_limit_request),
        )
}
