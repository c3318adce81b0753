//! OpenAPI document and the Swagger UI page that renders it.

use axum::{response::Html, Json};
use utoipa::OpenApi;

use super::dto::{
    CollectRequest, CollectResponse, HealthErrorResponse, HealthResponse, RegisterRequest,
    StatsResponse, UserResponse,
};
use super::error::ApiError;
use super::handlers;

pub const DOCS_PATH: &str = "/api/docs";
pub const OPENAPI_PATH: &str = "/api/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "eventhub", description = "User registration and event collection API"),
    paths(
        handlers::health_check,
        handlers::register,
        handlers::collect,
        handlers::app_stats,
    ),
    components(schemas(
        ApiError,
        HealthResponse,
        HealthErrorResponse,
        RegisterRequest,
        UserResponse,
        CollectRequest,
        CollectResponse,
        StatsResponse,
    )),
    tags(
        (name = "health", description = "Liveness of the store and cache"),
        (name = "users", description = "User registration"),
        (name = "events", description = "Event collection and counts")
    )
)]
pub struct ApiDoc;

/// Swagger UI shell; the browser loads the UI bundle and then fetches
/// [`OPENAPI_PATH`].
const DOCS_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>eventhub API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/api/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// GET /api/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /api/docs
pub async fn docs_page() -> Html<&'static str> {
    Html(DOCS_PAGE)
}
