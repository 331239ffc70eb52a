use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use services::{CustomAppId, UserId};

use crate::{error::ApiError, middleware::AuthenticatedUser, models::*, state::AppState};

/// List the calling teenager's custom apps
#[utoipa::path(
    get,
    path = "/api/custom-apps",
    tag = "Custom apps",
    responses(
        (status = 200, description = "Custom apps", body = [CustomAppResponse])
    ),
    security(("session_token" = []))
)]
pub async fn my_custom_apps(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<CustomAppResponse>>, ApiError> {
    let apps = app_state.custom_app_service.my_apps(user.caller()).await?;
    Ok(Json(apps.into_iter().map(Into::into).collect()))
}

/// List custom apps across the family
#[utoipa::path(
    get,
    path = "/api/custom-apps/all",
    tag = "Custom apps",
    responses(
        (status = 200, description = "Custom apps with owner names", body = [CustomAppResponse]),
        (status = 403, description = "Parent account required", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn all_custom_apps(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<CustomAppResponse>>, ApiError> {
    let apps = app_state.custom_app_service.all_apps(user.caller()).await?;
    Ok(Json(apps.into_iter().map(Into::into).collect()))
}

/// List one teenager's custom apps
#[utoipa::path(
    get,
    path = "/api/custom-apps/teenager/{teenager_id}",
    tag = "Custom apps",
    params(("teenager_id" = UserId, Path, description = "Teenager id")),
    responses(
        (status = 200, description = "Custom apps", body = [CustomAppResponse]),
        (status = 403, description = "Not this teenager's parent", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn apps_for_teenager(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(teenager_id): Path<UserId>,
) -> Result<Json<Vec<CustomAppResponse>>, ApiError> {
    let apps = app_state
        .custom_app_service
        .apps_for_teenager(user.caller(), teenager_id)
        .await?;
    Ok(Json(apps.into_iter().map(Into::into).collect()))
}

/// Register a custom app
#[utoipa::path(
    post,
    path = "/api/custom-apps",
    tag = "Custom apps",
    request_body = UpsertCustomAppRequest,
    responses(
        (status = 201, description = "App created", body = CustomAppResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 409, description = "App name already taken", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn create_custom_app(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpsertCustomAppRequest>,
) -> Result<(StatusCode, Json<CustomAppResponse>), ApiError> {
    let app_name = request
        .app_name
        .ok_or_else(|| ApiError::bad_request("App name is required"))?;
    let url = request
        .url
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    let created = app_state
        .custom_app_service
        .create_app(user.caller(), &app_name, &url, request.icon, request.category)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Edit a custom app
#[utoipa::path(
    put,
    path = "/api/custom-apps/{id}",
    tag = "Custom apps",
    params(("id" = CustomAppId, Path, description = "Custom app id")),
    request_body = UpsertCustomAppRequest,
    responses(
        (status = 200, description = "App updated", body = CustomAppResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 404, description = "App not found", body = crate::error::ApiErrorResponse),
        (status = 409, description = "App name already taken", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn update_custom_app(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<CustomAppId>,
    Json(request): Json<UpsertCustomAppRequest>,
) -> Result<Json<CustomAppResponse>, ApiError> {
    let app_name = request
        .app_name
        .ok_or_else(|| ApiError::bad_request("App name is required"))?;
    let url = request
        .url
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    let updated = app_state
        .custom_app_service
        .update_app(
            user.caller(),
            id,
            &app_name,
            &url,
            request.icon,
            request.category,
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Delete a custom app
#[utoipa::path(
    delete,
    path = "/api/custom-apps/{id}",
    tag = "Custom apps",
    params(("id" = CustomAppId, Path, description = "Custom app id")),
    responses(
        (status = 200, description = "App deleted", body = MessageResponse),
        (status = 404, description = "App not found", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn delete_custom_app(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<CustomAppId>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .custom_app_service
        .delete_app(user.caller(), id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Custom app deleted".to_string(),
    }))
}

/// Apps the calling teenager has hidden from their dashboard
#[utoipa::path(
    get,
    path = "/api/custom-apps/hidden",
    tag = "Custom apps",
    responses(
        (status = 200, description = "Hidden app names", body = [String])
    ),
    security(("session_token" = []))
)]
pub async fn hidden_apps(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = app_state
        .custom_app_service
        .hidden_apps(user.caller())
        .await?;
    Ok(Json(names))
}

/// Hide an app from the dashboard
#[utoipa::path(
    post,
    path = "/api/custom-apps/hide",
    tag = "Custom apps",
    request_body = HideAppRequest,
    responses(
        (status = 201, description = "App hidden", body = MessageResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 409, description = "App already hidden", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn hide_app(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<HideAppRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let app_name = request
        .app_name
        .ok_or_else(|| ApiError::bad_request("App name is required"))?;

    app_state
        .custom_app_service
        .hide_app(user.caller(), &app_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "App hidden".to_string(),
        }),
    ))
}

/// Put a hidden app back on the dashboard
#[utoipa::path(
    delete,
    path = "/api/custom-apps/hide/{app_name}",
    tag = "Custom apps",
    params(("app_name" = String, Path, description = "App name")),
    responses(
        (status = 200, description = "App visible again", body = MessageResponse)
    ),
    security(("session_token" = []))
)]
pub async fn unhide_app(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(app_name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .custom_app_service
        .unhide_app(user.caller(), &app_name)
        .await?;
    Ok(Json(MessageResponse {
        message: "App visible again".to_string(),
    }))
}

pub fn create_custom_app_router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_custom_apps).post(create_custom_app))
        .route("/all", get(all_custom_apps))
        .route("/teenager/:teenager_id", get(apps_for_teenager))
        .route("/hidden", get(hidden_apps))
        .route("/hide", post(hide_app))
        .route("/hide/:app_name", delete(unhide_app))
        .route(
            "/:id",
            axum::routing::put(update_custom_app).delete(delete_custom_app),
        )
}
