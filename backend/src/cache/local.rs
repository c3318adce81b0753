use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CacheError, CacheResult, CounterCache, PONG};

/// In-memory counter cache with Redis `INCR`/`GET` semantics.
///
/// Values are stored as strings so a key can hold something that is not a
/// counter, which is how the "unparsable counter" path gets exercised.
#[derive(Debug, Clone)]
pub struct LocalCounterCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
    available: Arc<AtomicBool>,
}

impl Default for LocalCounterCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalCounterCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Overwrite `key` with an arbitrary value (Redis `SET`).
    pub fn set_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().insert(key.into(), value.into());
    }

    /// Simulate the cache going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> CacheResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::Connection("Connection refused".to_string()))
        }
    }
}

#[async_trait]
impl CounterCache for LocalCounterCache {
    async fn incr(&self, key: &str) -> CacheResult<i64> {
        self.ensure_available()?;
        let mut entries = self.entries.lock();
        let current = match entries.get(key) {
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                CacheError::Command("ERR value is not an integer or out of range".to_string())
            })?,
            None => 0,
        };
        let next = current.checked_add(1).ok_or_else(|| {
            CacheError::Command("ERR increment or decrement would overflow".to_string())
        })?;
        entries.insert(key.to_string(), next.to_string());
        Ok(next)
    }

    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn ping(&self) -> CacheResult<String> {
        self.ensure_available()?;
        Ok(PONG.to_string())
    }
}
