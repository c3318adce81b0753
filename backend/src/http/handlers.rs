//! HTTP handlers for the REST API.
//!
//! Each handler extracts the request, delegates to [`crate::services`] and
//! shapes the JSON response. Status codes:
//!
//! | outcome           | status |
//! |-------------------|--------|
//! | created           | 201    |
//! | missing fields    | 400    |
//! | unknown api key   | 404    |
//! | body over 100 KiB | 413    |
//! | store/cache error | 500    |

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::dto::{
    CollectRequest, CollectResponse, HealthErrorResponse, HealthResponse, RegisterRequest,
    StatsResponse, UserResponse,
};
use super::error::{ApiError, AppError};
use super::state::AppState;
use crate::models::AppId;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /healthz
///
/// Probe the store and the cache once each.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Both dependencies reachable", body = HealthResponse),
        (status = 500, description = "A probe failed", body = HealthErrorResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    match services::check_health(state.repository.as_ref(), state.cache.as_ref()).await {
        Ok(report) => Json(HealthResponse::from(report)).into_response(),
        Err(err) => {
            error!(error = %err, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthErrorResponse::new(state.public_message(&err))),
            )
                .into_response()
        }
    }
}

// =============================================================================
// Users
// =============================================================================

/// POST /api/register
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "email missing", body = ApiError),
        (status = 413, description = "Body too large", body = ApiError),
        (status = 500, description = "Store error", body = ApiError)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(request) = payload?;

    let user = services::register_user(state.repository.as_ref(), request.into())
        .await
        .map_err(|e| state.reject("register", e))?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

// =============================================================================
// Events
// =============================================================================

/// POST /api/collect
///
/// A 500 after the event row was written still leaves the event stored; only
/// the cache counter is behind.
#[utoipa::path(
    post,
    path = "/api/collect",
    tag = "events",
    request_body = CollectRequest,
    responses(
        (status = 201, description = "Event recorded", body = CollectResponse),
        (status = 400, description = "apiKey or type missing", body = ApiError),
        (status = 404, description = "No app owns the api key", body = ApiError),
        (status = 413, description = "Body too large", body = ApiError),
        (status = 500, description = "Store or cache error", body = ApiError)
    )
)]
pub async fn collect(
    State(state): State<AppState>,
    payload: Result<Json<CollectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CollectResponse>), AppError> {
    let Json(request) = payload?;

    services::collect_event(
        state.repository.as_ref(),
        state.cache.as_ref(),
        request.into(),
    )
    .await
    .map_err(|e| state.reject("collect", e))?;

    Ok((StatusCode::CREATED, Json(CollectResponse::ok())))
}

/// GET /api/apps/{id}/stats
///
/// Unknown app ids report zero for both counts.
#[utoipa::path(
    get,
    path = "/api/apps/{id}/stats",
    tag = "events",
    params(("id" = i64, Path, description = "App id")),
    responses(
        (status = 200, description = "Store and cache totals", body = StatsResponse),
        (status = 400, description = "Id is not an integer", body = ApiError),
        (status = 500, description = "Store or cache error", body = ApiError)
    )
)]
pub async fn app_stats(
    State(state): State<AppState>,
    app_id: Result<Path<i64>, PathRejection>,
) -> HandlerResult<StatsResponse> {
    let Path(app_id) = app_id?;

    let stats = services::app_stats(
        state.repository.as_ref(),
        state.cache.as_ref(),
        AppId::new(app_id),
    )
    .await
    .map_err(|e| state.reject("app_stats", e))?;

    Ok(Json(stats.into()))
}
