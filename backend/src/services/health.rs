use tracing::debug;

use super::ServiceResult;
use crate::cache::{CounterCache, PONG};
use crate::db::FullRepository;

/// Outcome of a successful liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub db: bool,
    /// Whether the cache answered `PONG`.
    pub cache: bool,
}

/// Probe the store, then the cache. One attempt each; the first error wins.
pub async fn check_health(
    repository: &dyn FullRepository,
    cache: &dyn CounterCache,
) -> ServiceResult<HealthReport> {
    let db = repository.health_check().await?;
    let pong = cache.ping().await?;
    debug!(db, pong = %pong, "health probes completed");

    Ok(HealthReport {
        db,
        cache: pong == PONG,
    })
}
