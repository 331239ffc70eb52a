use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use services::{
    auth::ports::{Caller, Role},
    SessionId, UserId,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::error::ApiError;

/// Authenticated user information inserted into request extensions by the auth middleware.
/// Extract in route handlers using `Extension<AuthenticatedUser>`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

/// State for authentication middleware
#[derive(Clone)]
pub struct AuthState {
    pub session_repository: Arc<dyn services::auth::ports::SessionRepository>,
    pub user_repository: Arc<dyn services::auth::ports::UserRepository>,
}

/// Hash a session token for lookup
fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extract and validate token from Authorization header
fn extract_token_from_request(request: &Request) -> Result<String, ApiError> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    let auth_value = auth_header.ok_or_else(|| {
        tracing::warn!("No authorization header found");
        ApiError::missing_auth_header()
    })?;

    let token = auth_value.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Authorization header does not start with 'Bearer '");
        ApiError::invalid_auth_header()
    })?;

    // Validate token format (should start with sess_ and be the right length)
    if !token.starts_with("sess_") {
        tracing::warn!("Invalid session token format: token does not start with 'sess_'");
        return Err(ApiError::invalid_token());
    }

    if token.len() != 37 {
        tracing::warn!(
            "Invalid session token format: expected length 37, got {}",
            token.len()
        );
        return Err(ApiError::invalid_token());
    }

    Ok(token.to_string())
}

/// Resolve a token into the authenticated user: session lookup, expiry
/// check, then role load.
async fn authenticate_token(
    token: &str,
    state: &AuthState,
) -> Result<AuthenticatedUser, ApiError> {
    let token_hash = hash_session_token(token);

    let session = state
        .session_repository
        .get_session_by_token_hash(token_hash)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get session from repository: {}", e);
            ApiError::internal_server_error("Failed to authenticate session")
        })?
        .ok_or_else(|| {
            tracing::warn!("Session not found for provided token");
            ApiError::session_not_found()
        })?;

    let now = Utc::now();
    if session.expires_at < now {
        tracing::warn!(
            "Session expired: session_id={}, expired {} seconds ago",
            session.session_id,
            now.signed_duration_since(session.expires_at).num_seconds()
        );
        return Err(ApiError::session_expired());
    }

    let user = state
        .user_repository
        .get_user(session.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user for session: {}", e);
            ApiError::internal_server_error("Failed to authenticate session")
        })?
        .ok_or_else(|| {
            tracing::warn!(
                "Session references a deleted user: user_id={}",
                session.user_id
            );
            ApiError::session_not_found()
        })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        session_id: session.session_id,
        role: user.role,
    })
}

/// Authentication middleware that validates session tokens
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let path = request.uri().path().to_string();
    let method = request.method().clone();

    let token = extract_token_from_request(&request).map_err(|e| e.into_response())?;
    let user = authenticate_token(&token, &state)
        .await
        .map_err(|e| e.into_response())?;

    tracing::debug!(
        "Authenticated user_id={} role={} on {} {}",
        user.user_id,
        user.role,
        method,
        path
    );

    // Add authenticated user to request extensions
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
