//! Data Transfer Objects for the HTTP API.
//!
//! Field names follow the wire format (`apiKey`, `type`, `redis_count`), which
//! is why some of them differ from the domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::User;
use crate::services::{field_text, AppStats, CollectEvent, HealthReport, RegisterUser};

/// Body of a healthy `/healthz` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub db: bool,
    pub redis: bool,
}

impl From<HealthReport> for HealthResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            status: "ok".to_string(),
            db: report.db,
            redis: report.cache,
        }
    }
}

/// Body of a failed `/healthz` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthErrorResponse {
    pub status: String,
    pub message: String,
}

impl HealthErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Registration body. Fields are loosely typed: a number or boolean is
/// accepted as its text, and falsy values count as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: field_text(request.email),
            name: field_text(request.name),
        }
    }
}

/// A created user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.value(),
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CollectRequest {
    #[serde(rename = "apiKey")]
    #[schema(value_type = Option<String>)]
    pub api_key: Option<Value>,
    #[serde(rename = "type")]
    #[schema(value_type = Option<String>)]
    pub event_type: Option<Value>,
    /// Arbitrary JSON attached to the event
    #[schema(value_type = Option<Object>)]
    pub payload: Option<Value>,
}

impl From<CollectRequest> for CollectEvent {
    fn from(request: CollectRequest) -> Self {
        Self {
            api_key: field_text(request.api_key),
            event_type: field_text(request.event_type),
            payload: request.payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollectResponse {
    pub status: String,
}

impl CollectResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Store and cache event totals, side by side.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub total_events: i64,
    pub redis_count: i64,
}

impl From<AppStats> for StatsResponse {
    fn from(stats: AppStats) -> Self {
        Self {
            total_events: stats.total_events,
            redis_count: stats.cached_count,
        }
    }
}
