//! Domain entities persisted by the store.
//!
//! Users and apps/events are disjoint: nothing links an event to a user.

pub mod macros;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

crate::define_id_type!(i64, UserId);
crate::define_id_type!(i64, AppId);
crate::define_id_type!(i64, EventId);

/// A registered user. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated registration data, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
}

/// A client application. `api_key` is the only credential event collection accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: AppId,
    pub api_key: String,
}

/// A single event occurrence to record for an app.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub app_id: AppId,
    pub event_type: String,
    pub payload: Option<Value>,
}

/// A recorded event as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub app_id: AppId,
    pub event_type: String,
    pub payload: Option<Value>,
    pub created_at: DateTime<Utc>,
}
