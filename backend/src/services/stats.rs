use super::ServiceResult;
use crate::cache::{app_counter_key, CounterCache};
use crate::db::FullRepository;
use crate::models::AppId;

/// Event totals for one app, from both sources, unreconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppStats {
    pub app_id: AppId,
    /// Authoritative count from the store.
    pub total_events: i64,
    /// Cache counter; may lag or drift from `total_events`.
    pub cached_count: i64,
}

/// Report both counts for `app_id`.
///
/// The app is not required to exist: an unknown id reports zero for both.
pub async fn app_stats(
    repository: &dyn FullRepository,
    cache: &dyn CounterCache,
    app_id: AppId,
) -> ServiceResult<AppStats> {
    let total_events = repository.count_events_for_app(app_id).await?;
    let cached_count = cache
        .get_raw(&app_counter_key(app_id))
        .await?
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(0);

    Ok(AppStats {
        app_id,
        total_events,
        cached_count,
    })
}
