use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use services::auth::ports::{RegisterParams, Role};

use crate::{error::ApiError, middleware::AuthenticatedUser, models::*, state::AppState};

/// Register a new account
///
/// Creates a parent or teenager account and returns a session token.
/// Teenager accounts must reference an existing parent.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let name = request
        .name
        .ok_or_else(|| ApiError::bad_request("Name is required"))?;
    let email = request
        .email
        .ok_or_else(|| ApiError::bad_request("Email is required"))?;
    let password = request
        .password
        .ok_or_else(|| ApiError::bad_request("Password is required"))?;
    let role = request
        .role
        .as_deref()
        .and_then(Role::parse)
        .ok_or_else(|| ApiError::bad_request("Role must be 'parent' or 'teenager'"))?;

    let auth = app_state
        .auth_service
        .register(RegisterParams {
            name,
            email,
            password,
            role,
            parent_id: request.parent_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(auth.into())))
}

/// Log in
///
/// Verifies credentials and returns a fresh session token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Missing credentials", body = crate::error::ApiErrorResponse),
        (status = 403, description = "Invalid credentials", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = request
        .email
        .ok_or_else(|| ApiError::bad_request("Email is required"))?;
    let password = request
        .password
        .ok_or_else(|| ApiError::bad_request("Password is required"))?;

    let auth = app_state.auth_service.login(&email, &password).await?;
    Ok(Json(auth.into()))
}

/// Log out
///
/// Revokes the current session token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session revoked", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state.auth_service.logout(user.session_id).await?;
    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn current_user(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let profile = app_state.auth_service.current_user(user.user_id).await?;
    Ok(Json(profile.into()))
}

/// List parent accounts
///
/// Public listing used by the teenager registration form to pick a parent.
#[utoipa::path(
    get,
    path = "/api/auth/parents",
    tag = "Auth",
    responses(
        (status = 200, description = "Parent accounts", body = [AccountResponse])
    )
)]
pub async fn list_parents(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let parents = app_state.auth_service.list_parents().await?;
    Ok(Json(parents.into_iter().map(Into::into).collect()))
}

/// Public auth routes (no session required)
pub fn create_public_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/parents", get(list_parents))
}

/// Auth routes that require an active session
pub fn create_session_auth_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(current_user))
}
