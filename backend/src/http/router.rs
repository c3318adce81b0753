//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, tracing, security headers, body
//! limit) and returns the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
        HeaderValue,
    },
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::docs;
use super::handlers;
use super::state::AppState;

/// Largest accepted JSON body.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ));

    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/api/register", post(handlers::register))
        .route("/api/collect", post(handlers::collect))
        .route("/api/apps/{id}/stats", get(handlers::app_stats))
        .route(docs::DOCS_PATH, get(docs::docs_page))
        .route(docs::OPENAPI_PATH, get(docs::openapi_json))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware)
        .with_state(state)
}
