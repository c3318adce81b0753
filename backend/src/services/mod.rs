//! Request-level operations, written once against the store and cache traits.
//!
//! Each operation is a short sequence of awaited store/cache calls with no
//! transaction spanning the two. The HTTP layer only translates requests and
//! errors; all validation lives here.

mod collect;
mod error;
mod health;
mod register;
mod stats;

pub use collect::{collect_event, CollectEvent, CollectReceipt};
pub use error::{
    ServiceError, ServiceResult, APP_NOT_FOUND, COLLECT_FIELDS_REQUIRED, EMAIL_REQUIRED,
};
pub use health::{check_health, HealthReport};
pub use register::{register_user, RegisterUser};
pub use stats::{app_stats, AppStats};

use serde_json::Value;

/// A required string counts as missing when absent, `null` or empty.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Falsy JSON (`null`, `false`, `0`, `""`) is treated as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text of a loosely typed request field.
///
/// Falsy values become `None`. Strings pass through; any other value is
/// stored as its JSON text, so `{"type": 5}` records the type `"5"`.
pub fn field_text(value: Option<Value>) -> Option<String> {
    match value.filter(is_truthy)? {
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
