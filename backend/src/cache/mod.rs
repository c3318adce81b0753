//! Counter cache: fast, non-authoritative per-app event tallies.
//!
//! The store owns the real event count. Counters here are bumped after each
//! accepted event and are never reconciled, so they can drift (e.g. when the
//! increment fails after the event row was written).
//!
//! Implementations:
//! - [`LocalCounterCache`]: in-memory, for development and tests
//! - [`RedisCounterCache`]: Redis via a shared `ConnectionManager` (feature `redis-cache`)

mod error;
mod local;
#[cfg(feature = "redis-cache")]
mod redis_cache;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

pub use error::{CacheError, CacheResult};
pub use local::LocalCounterCache;
#[cfg(feature = "redis-cache")]
pub use redis_cache::RedisCounterCache;

use crate::config::{ConfigError, RedisConfig};
use crate::models::AppId;

/// Reply a healthy cache gives to `PING`.
pub const PONG: &str = "PONG";

/// Cache key holding the event counter for `app_id`.
pub fn app_counter_key(app_id: AppId) -> String {
    format!("app:{}:events", app_id)
}

/// Minimal key-value surface the service layer needs.
#[async_trait]
pub trait CounterCache: Send + Sync {
    /// Atomically increment the integer at `key` (missing keys start at 0)
    /// and return the new value.
    async fn incr(&self, key: &str) -> CacheResult<i64>;

    /// Raw stored value, `None` when the key is absent.
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>>;

    /// Liveness probe. Returns the server's reply, [`PONG`] when healthy.
    async fn ping(&self) -> CacheResult<String>;
}

/// Cache type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
    Redis,
    Local,
}

impl FromStr for CacheType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown cache type: {}", s)),
        }
    }
}

impl CacheType {
    /// Reads `CACHE_TYPE`. Defaults to Redis if `REDIS_URL` is set, otherwise Local.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(val) = std::env::var("CACHE_TYPE") {
            return val.parse().map_err(|message| ConfigError::Invalid {
                key: "CACHE_TYPE".to_string(),
                message,
            });
        }

        if std::env::var("REDIS_URL").is_ok() {
            Ok(Self::Redis)
        } else {
            Ok(Self::Local)
        }
    }
}

pub struct CacheFactory;

impl CacheFactory {
    pub async fn create(
        cache_type: CacheType,
        redis_config: Option<&RedisConfig>,
    ) -> CacheResult<Arc<dyn CounterCache>> {
        match cache_type {
            CacheType::Redis => {
                #[cfg(feature = "redis-cache")]
                {
                    let config = redis_config.ok_or_else(|| {
                        CacheError::Configuration("Redis cache requires RedisConfig".to_string())
                    })?;
                    let cache = RedisCounterCache::connect(config).await?;
                    Ok(Arc::new(cache) as Arc<dyn CounterCache>)
                }
                #[cfg(not(feature = "redis-cache"))]
                {
                    let _ = redis_config;
                    Err(CacheError::Configuration(
                        "Redis cache feature not enabled".to_string(),
                    ))
                }
            }
            CacheType::Local => Ok(Arc::new(LocalCounterCache::new())),
        }
    }
}
