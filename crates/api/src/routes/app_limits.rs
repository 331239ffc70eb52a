use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use services::limits::{predefined_apps, LimitWrite};
use services::AppLimitId;

use crate::{error::ApiError, middleware::AuthenticatedUser, models::*, state::AppState};

/// Catalog of well-known apps
///
/// Public within the session: both roles can browse it when picking an app
/// to limit or to request more time for.
#[utoipa::path(
    get,
    path = "/api/app-limits/predefined",
    tag = "App limits",
    responses(
        (status = 200, description = "Known apps", body = [PredefinedAppResponse])
    ),
    security(("session_token" = []))
)]
pub async fn list_predefined_apps() -> Json<Vec<PredefinedAppResponse>> {
    Json(predefined_apps().iter().map(Into::into).collect())
}

/// List app limits
///
/// Parents see every limit they have set across their teenagers; teenagers
/// see the limits that apply to them.
#[utoipa::path(
    get,
    path = "/api/app-limits",
    tag = "App limits",
    responses(
        (status = 200, description = "Limits", body = [AppLimitResponse])
    ),
    security(("session_token" = []))
)]
pub async fn list_app_limits(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<AppLimitResponse>>, ApiError> {
    let limits = app_state.limit_service.list_limits(user.caller()).await?;
    Ok(Json(limits.into_iter().map(Into::into).collect()))
}

/// Set an app limit
///
/// Creates the limit, or overwrites the daily allowance when one already
/// exists for the same teenager and app.
#[utoipa::path(
    post,
    path = "/api/app-limits",
    tag = "App limits",
    request_body = SetLimitRequest,
    responses(
        (status = 201, description = "Limit created", body = MessageResponse),
        (status = 200, description = "Limit updated", body = MessageResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 403, description = "Parent account required", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn set_app_limit(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<SetLimitRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let teenager_id = request
        .teenager_id
        .ok_or_else(|| ApiError::bad_request("Teenager id is required"))?;
    let app_name = request
        .app_name
        .ok_or_else(|| ApiError::bad_request("App name is required"))?;
    let daily_limit_minutes = request
        .daily_limit_minutes
        .ok_or_else(|| ApiError::bad_request("Daily limit is required"))?;

    let write = app_state
        .limit_service
        .set_limit(user.caller(), teenager_id, &app_name, daily_limit_minutes)
        .await?;

    let (status, message) = match write {
        LimitWrite::Created => (StatusCode::CREATED, "App limit created"),
        LimitWrite::Updated => (StatusCode::OK, "App limit updated"),
    };
    Ok((
        status,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    ))
}

/// Remove an app limit
#[utoipa::path(
    delete,
    path = "/api/app-limits/{id}",
    tag = "App limits",
    params(("id" = AppLimitId, Path, description = "Limit id")),
    responses(
        (status = 200, description = "Limit removed", body = MessageResponse),
        (status = 404, description = "Limit not found", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn delete_app_limit(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<AppLimitId>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state.limit_service.delete_limit(user.caller(), id).await?;
    Ok(Json(MessageResponse {
        message: "App limit removed".to_string(),
    }))
}

pub fn create_app_limit_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_app_limits).post(set_app_limit))
        .route("/predefined", get(list_predefined_apps))
        .route("/:id", delete(delete_app_limit))
}
