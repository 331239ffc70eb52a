use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use services::BlockedSiteId;

use crate::{error::ApiError, middleware::AuthenticatedUser, models::*, state::AppState};

/// List blocked sites
///
/// Parents see every block they have created; teenagers see the blocks
/// aimed at them.
#[utoipa::path(
    get,
    path = "/api/blocked-sites",
    tag = "Blocked sites",
    responses(
        (status = 200, description = "Blocked sites", body = [BlockedSiteResponse])
    ),
    security(("session_token" = []))
)]
pub async fn list_blocked_sites(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BlockedSiteResponse>>, ApiError> {
    let sites = app_state
        .blocked_site_service
        .list_sites(user.caller())
        .await?;
    Ok(Json(sites.into_iter().map(Into::into).collect()))
}

/// Block a site for a teenager
#[utoipa::path(
    post,
    path = "/api/blocked-sites",
    tag = "Blocked sites",
    request_body = BlockSiteRequest,
    responses(
        (status = 201, description = "Site blocked", body = BlockedSiteResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 403, description = "Parent account required", body = crate::error::ApiErrorResponse),
        (status = 409, description = "Site already blocked", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn block_site(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<BlockSiteRequest>,
) -> Result<(StatusCode, Json<BlockedSiteResponse>), ApiError> {
    let (teenager_id, site_url) = match (request.teenager_id, request.site_url) {
        (Some(teenager_id), Some(site_url)) => (teenager_id, site_url),
        _ => {
            return Err(ApiError::bad_request(
                "Teenager ID and site URL are required",
            ))
        }
    };

    let created = app_state
        .blocked_site_service
        .block_site(user.caller(), &site_url, teenager_id)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Unblock a site
#[utoipa::path(
    delete,
    path = "/api/blocked-sites/{id}",
    tag = "Blocked sites",
    params(("id" = BlockedSiteId, Path, description = "Blocked site id")),
    responses(
        (status = 200, description = "Site unblocked", body = MessageResponse),
        (status = 404, description = "Blocked site not found", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn unblock_site(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<BlockedSiteId>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .blocked_site_service
        .unblock_site(user.caller(), id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Site unblocked".to_string(),
    }))
}

pub fn create_blocked_site_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blocked_sites).post(block_site))
        .route("/:id", delete(unblock_site))
}
