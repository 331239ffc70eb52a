use axum::{
    extract::{Extension, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use services::clock;

use crate::{error::ApiError, middleware::AuthenticatedUser, models::*, state::AppState};

const DEFAULT_REPORT_DAYS: i64 = 7;

/// Record app usage
///
/// Adds minutes to the caller's (app, today) bucket and returns the stored
/// total after the write. Repeated calls on the same day accumulate.
#[utoipa::path(
    post,
    path = "/api/usage/app",
    tag = "Usage",
    request_body = RecordUsageRequest,
    responses(
        (status = 200, description = "Usage recorded", body = RecordUsageResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse),
        (status = 403, description = "Teenager account required", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn record_app_usage(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<RecordUsageRequest>,
) -> Result<Json<RecordUsageResponse>, ApiError> {
    let app_name = request
        .app_name
        .ok_or_else(|| ApiError::bad_request("App name is required"))?;
    let minutes = request
        .usage_minutes
        .ok_or_else(|| ApiError::bad_request("Usage minutes are required"))?;

    // The report date is resolved once here and threaded through; a request
    // straddling midnight lands entirely on one day.
    let today = clock::report_date();

    let saved_minutes = app_state
        .usage_service
        .record_usage(user.caller(), &app_name, minutes, today)
        .await?;

    Ok(Json(RecordUsageResponse {
        message: "Usage recorded".to_string(),
        saved_minutes,
    }))
}

/// List own app usage
///
/// Per-app-per-day rows over a `days`-back window. `days=0` returns only
/// today's rows.
#[utoipa::path(
    get,
    path = "/api/usage/app",
    tag = "Usage",
    params(UsageQuery),
    responses(
        (status = 200, description = "Usage rows", body = UsageListResponse),
        (status = 400, description = "Invalid window", body = crate::error::ApiErrorResponse),
        (status = 403, description = "Teenager account required", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn list_app_usage(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<UsageListResponse>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_REPORT_DAYS);
    let today = clock::report_date();

    let rows = app_state
        .usage_service
        .list_usage(user.caller(), days, today)
        .await?;

    Ok(Json(UsageListResponse {
        usage: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Own usage report
///
/// The teenager's aggregated report: windowed rows, per-app rollups, an
/// exact today slice, task counts, and blocked sites. Responses are never
/// cached; the today slice backs live limit enforcement.
#[utoipa::path(
    get,
    path = "/api/usage/my-report",
    tag = "Usage",
    params(UsageQuery),
    responses(
        (status = 200, description = "Teen report", body = TeenReportResponse),
        (status = 403, description = "Teenager account required", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn my_report(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<UsageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_REPORT_DAYS);
    let today = clock::report_date();

    let report = app_state
        .report_service
        .teen_report(user.caller(), days, today)
        .await?;

    let headers = [
        (
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, private",
        ),
        (header::PRAGMA, "no-cache"),
        (header::EXPIRES, "0"),
    ];

    Ok((
        StatusCode::OK,
        headers,
        Json(TeenReportResponse::from(report)),
    ))
}

/// Household usage report
///
/// Parent view over all teenagers, or one teenager when `teenager_id` is
/// given. Every section applies the same filter.
#[utoipa::path(
    get,
    path = "/api/usage/report",
    tag = "Usage",
    params(ReportQuery),
    responses(
        (status = 200, description = "Parent report", body = ParentReportResponse),
        (status = 403, description = "Parent account required", body = crate::error::ApiErrorResponse)
    ),
    security(("session_token" = []))
)]
pub async fn parent_report(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ParentReportResponse>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_REPORT_DAYS);
    let today = clock::report_date();

    let report = app_state
        .report_service
        .parent_report(user.caller(), days, query.teenager_id, today)
        .await?;

    Ok(Json(report.into()))
}

pub fn create_usage_router() -> Router<AppState> {
    Router::new()
        .route("/app", post(record_app_usage).get(list_app_usage))
        .route("/my-report", get(my_report))
        .route("/report", get(parent_report))
}
