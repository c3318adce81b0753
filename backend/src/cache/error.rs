use thiserror::Error;

pub type CacheResult<T> = Result<T, CacheError>;

/// Errors raised by the counter cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache could not be reached or the connection dropped.
    #[error("Cache connection error: {0}")]
    Connection(String),

    /// The cache rejected a command (wrong type, out of range, ...).
    #[error("Cache command error: {0}")]
    Command(String),

    #[error("Cache configuration error: {0}")]
    Configuration(String),
}

impl CacheError {
    /// The raw message reported by the cache.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(m) | Self::Command(m) | Self::Configuration(m) => m,
        }
    }
}

#[cfg(feature = "redis-cache")]
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_dropped()
            || err.is_connection_refusal()
            || err.is_timeout()
        {
            CacheError::Connection(err.to_string())
        } else {
            CacheError::Command(err.to_string())
        }
    }
}
