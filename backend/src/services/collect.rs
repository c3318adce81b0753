use serde_json::Value;
use tracing::{debug, warn};

use super::{is_truthy, present, ServiceError, ServiceResult, APP_NOT_FOUND, COLLECT_FIELDS_REQUIRED};
use crate::cache::{app_counter_key, CounterCache};
use crate::db::FullRepository;
use crate::models::{AppId, EventId, NewEvent};

/// Event submission as received.
#[derive(Debug, Clone, Default)]
pub struct CollectEvent {
    pub api_key: Option<String>,
    pub event_type: Option<String>,
    pub payload: Option<Value>,
}

/// What a successful collect wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectReceipt {
    pub app_id: AppId,
    pub event_id: EventId,
    /// Counter value after the increment.
    pub counter: i64,
}

/// Record one event for the app owning `api_key`.
///
/// 1. resolve the app (missing → `NotFound`)
/// 2. insert the event row
/// 3. bump the app's cache counter
///
/// Nothing is rolled back if step 3 fails: the event stays stored and the
/// counter falls one behind the store.
pub async fn collect_event(
    repository: &dyn FullRepository,
    cache: &dyn CounterCache,
    input: CollectEvent,
) -> ServiceResult<CollectReceipt> {
    let (api_key, event_type) = match (present(input.api_key), present(input.event_type)) {
        (Some(api_key), Some(event_type)) => (api_key, event_type),
        _ => return Err(ServiceError::InvalidInput(COLLECT_FIELDS_REQUIRED)),
    };

    let app = repository
        .find_app_by_api_key(&api_key)
        .await?
        .ok_or(ServiceError::NotFound(APP_NOT_FOUND))?;

    let event_id = repository
        .insert_event(&NewEvent {
            app_id: app.id,
            event_type,
            payload: input.payload.filter(is_truthy),
        })
        .await?;

    let counter = cache
        .incr(&app_counter_key(app.id))
        .await
        .inspect_err(|e| {
            warn!(
                app_id = %app.id,
                event_id = %event_id,
                error = %e,
                "event stored but counter increment failed"
            );
        })?;

    debug!(app_id = %app.id, event_id = %event_id, counter, "collected event");
    Ok(CollectReceipt {
        app_id: app.id,
        event_id,
        counter,
    })
}
