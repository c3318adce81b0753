use std::time::Duration;

use async_trait::async_trait;
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};
use tracing::info;

use super::{CacheError, CacheResult, CounterCache};
use crate::config::RedisConfig;

/// Redis-backed counter cache.
///
/// Holds one multiplexed `ConnectionManager`, cheap to clone, so each call
/// works on a clone instead of locking. Connection attempts are never
/// repeated; a failed command surfaces as a [`CacheError`] and the next call
/// reconnects.
#[derive(Clone)]
pub struct RedisCounterCache {
    connection: ConnectionManager,
}

impl RedisCounterCache {
    pub async fn connect(config: &RedisConfig) -> CacheResult<Self> {
        let manager_config = ConnectionManagerConfig::new()
            .set_number_of_retries(0)
            .set_connection_timeout(Duration::from_millis(config.connection_timeout_ms));

        let client = Client::open(config.redis_url.as_str())
            .map_err(|e| CacheError::Configuration(e.to_string()))?;
        let connection = client
            .get_connection_manager_with_config(manager_config)
            .await?;

        info!("Connected to Redis");
        Ok(Self { connection })
    }
}

#[async_trait]
impl CounterCache for RedisCounterCache {
    async fn incr(&self, key: &str) -> CacheResult<i64> {
        let mut conn = self.connection.clone();
        let value: i64 = conn.incr(key, 1).await?;
        Ok(value)
    }

    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn ping(&self) -> CacheResult<String> {
        let mut conn = self.connection.clone();
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(reply)
    }
}
