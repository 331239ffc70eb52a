pub mod app_limits;
pub mod auth;
pub mod blocked_sites;
pub mod custom_apps;
pub mod tasks;
pub mod time_limit_requests;
pub mod time_requests;
pub mod usage;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use http::HeaderValue;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::ToSchema;

use crate::{middleware::AuthState, state::AppState};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// API version
    pub version: &'static str,
}

/// Health check endpoint
///
/// Used by load balancers and monitoring to verify the service is up.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn is_origin_allowed(origin_str: &str, cors_config: &config::CorsConfig) -> bool {
    if cors_config.exact_matches.iter().any(|o| o == origin_str) {
        return true;
    }

    if let Some(remainder) = origin_str.strip_prefix("http://localhost") {
        if remainder.is_empty() || remainder.starts_with(':') {
            return true;
        }
    }

    if let Some(remainder) = origin_str.strip_prefix("http://127.0.0.1") {
        if remainder.is_empty() || remainder.starts_with(':') {
            return true;
        }
    }

    if origin_str.starts_with("https://")
        && cors_config
            .wildcard_suffixes
            .iter()
            .any(|suffix| origin_str.ends_with(suffix))
    {
        return true;
    }

    false
}

/// Create the main API router with CORS configuration
pub fn create_router_with_cors(app_state: AppState, cors_config: config::CorsConfig) -> Router {
    let auth_state = AuthState {
        session_repository: app_state.session_repository.clone(),
        user_repository: app_state.user_repository.clone(),
    };

    // Register, login and the parents listing stay reachable without a token.
    let public_auth_routes = auth::create_public_auth_router();
    let session_auth_routes = auth::create_session_auth_router().layer(from_fn_with_state(
        auth_state.clone(),
        crate::middleware::auth_middleware,
    ));

    let usage_routes = usage::create_usage_router().layer(from_fn_with_state(
        auth_state.clone(),
        crate::middleware::auth_middleware,
    ));
    let task_routes = tasks::create_task_router().layer(from_fn_with_state(
        auth_state.clone(),
        crate::middleware::auth_middleware,
    ));
    let time_request_routes = time_requests::create_time_request_router().layer(
        from_fn_with_state(auth_state.clone(), crate::middleware::auth_middleware),
    );
    let app_limit_routes = app_limits::create_app_limit_router().layer(from_fn_with_state(
        auth_state.clone(),
        crate::middleware::auth_middleware,
    ));
    let time_limit_request_routes = time_limit_requests::create_time_limit_request_router().layer(
        from_fn_with_state(auth_state.clone(), crate::middleware::auth_middleware),
    );
    let blocked_site_routes = blocked_sites::create_blocked_site_router().layer(
        from_fn_with_state(auth_state.clone(), crate::middleware::auth_middleware),
    );
    let custom_app_routes = custom_apps::create_custom_app_router().layer(from_fn_with_state(
        auth_state,
        crate::middleware::auth_middleware,
    ));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", public_auth_routes)
        .nest("/api/auth", session_auth_routes)
        .nest("/api/usage", usage_routes)
        .nest("/api/tasks", task_routes)
        .nest("/api/time-requests", time_request_routes)
        .nest("/api/app-limits", app_limit_routes)
        .nest("/api/time-limit-requests", time_limit_request_routes)
        .nest("/api/blocked-sites", blocked_site_routes)
        .nest("/api/custom-apps", custom_app_routes)
        .with_state(app_state);

    let cors_config_clone = cors_config.clone();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request_parts: &http::request::Parts| {
                let origin_str = match origin.to_str() {
                    Ok(s) => s,
                    Err(_) => return false,
                };
                is_origin_allowed(origin_str, &cors_config_clone)
            },
        ))
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    router.layer(cors)
}
