//! Process configuration.
//!
//! Loaded once at startup, either from environment variables
//! ([`ServerConfig::from_env`]) or from an `eventhub.toml` file
//! ([`ServerConfig::from_file`]).
//!
//! # Environment Variables
//!
//! - `HOST` (default `0.0.0.0`), `PORT` (default `5000`)
//! - `REPOSITORY_TYPE`: `postgres` | `local` (default: `postgres` when a database URL is set)
//! - `CACHE_TYPE`: `redis` | `local` (default: `redis` when `REDIS_URL` is set)
//! - `DATABASE_URL` or `PG_DATABASE_URL`, plus the `PG_*` pool settings
//! - `REDIS_URL`, `REDIS_CONN_TIMEOUT_MS`
//! - `EVENTHUB_REDACT_ERRORS`: hide raw store/cache messages from clients
//! - `EVENTHUB_SEED_API_KEYS`: comma-separated api keys registered as apps when
//!   the in-memory store is used

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheType;
use crate::db::factory::RepositoryType;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| ConfigError::Missing("DATABASE_URL or PG_DATABASE_URL"))?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
        })
    }
}

/// Configuration for connecting to Redis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub redis_url: String,
    /// Connection timeout in milliseconds
    pub connection_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            redis_url: String::new(),
            connection_timeout_ms: 500,
        }
    }
}

impl RedisConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let redis_url =
            std::env::var("REDIS_URL").map_err(|_| ConfigError::Missing("REDIS_URL"))?;

        let defaults = Self::default();
        Ok(Self {
            redis_url,
            connection_timeout_ms: env_or("REDIS_CONN_TIMEOUT_MS", defaults.connection_timeout_ms),
        })
    }
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub repository: RepositoryType,
    pub cache: CacheType,
    pub postgres: Option<PostgresConfig>,
    pub redis: Option<RedisConfig>,
    pub redact_errors: bool,
    /// Apps created at startup in the in-memory store.
    pub seed_api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            repository: RepositoryType::Local,
            cache: CacheType::Local,
            postgres: None,
            redis: None,
            redact_errors: false,
            seed_api_keys: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let repository = RepositoryType::from_env()?;
        let cache = CacheType::from_env()?;

        let postgres = match repository {
            RepositoryType::Postgres => Some(PostgresConfig::from_env()?),
            RepositoryType::Local => None,
        };
        let redis = match cache {
            CacheType::Redis => Some(RedisConfig::from_env()?),
            CacheType::Local => None,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env_parse("PORT")?.unwrap_or(DEFAULT_PORT),
            repository,
            cache,
            postgres,
            redis,
            redact_errors: env_parse("EVENTHUB_REDACT_ERRORS")?.unwrap_or(false),
            seed_api_keys: std::env::var("EVENTHUB_SEED_API_KEYS")
                .map(|raw| split_keys(&raw))
                .unwrap_or_default(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let file: FileConfig = toml::from_str(&content)?;
        file.try_into()
    }

    /// Load `eventhub.toml` from the working directory or `backend/`, if present.
    pub fn from_default_location() -> Option<Result<Self, ConfigError>> {
        [
            PathBuf::from("eventhub.toml"),
            PathBuf::from("backend/eventhub.toml"),
        ]
        .into_iter()
        .find(|p| p.exists())
        .map(Self::from_file)
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "HOST".to_string(),
                message: e.to_string(),
            })
    }
}

/// On-disk layout of `eventhub.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub redact_errors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            redact_errors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_local")]
    pub repo_type: String,
    #[serde(default)]
    pub seed_api_keys: Vec<String>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_local(),
            seed_api_keys: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(rename = "type", default = "default_local")]
    pub cache_type: String,
    #[serde(default)]
    pub redis_url: String,
    #[serde(default = "default_redis_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cache_type: default_local(),
            redis_url: String::new(),
            connect_timeout_ms: default_redis_timeout_ms(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_local() -> String {
    "local".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_redis_timeout_ms() -> u64 {
    500
}

impl TryFrom<FileConfig> for ServerConfig {
    type Error = ConfigError;

    fn try_from(file: FileConfig) -> Result<Self, Self::Error> {
        let repository = RepositoryType::from_str(&file.repository.repo_type).map_err(|e| {
            ConfigError::Invalid {
                key: "repository.type".to_string(),
                message: e,
            }
        })?;
        let cache = CacheType::from_str(&file.cache.cache_type).map_err(|e| ConfigError::Invalid {
            key: "cache.type".to_string(),
            message: e,
        })?;

        let postgres = match repository {
            RepositoryType::Postgres if file.postgres.database_url.is_empty() => {
                return Err(ConfigError::Missing("postgres.database_url"));
            }
            RepositoryType::Postgres => Some(PostgresConfig {
                database_url: file.postgres.database_url,
                max_pool_size: file.postgres.max_connections,
                min_pool_size: file.postgres.min_connections,
                connection_timeout_sec: file.postgres.connect_timeout,
                idle_timeout_sec: file.postgres.idle_timeout,
            }),
            RepositoryType::Local => None,
        };

        let redis = match cache {
            CacheType::Redis if file.cache.redis_url.is_empty() => {
                return Err(ConfigError::Missing("cache.redis_url"));
            }
            CacheType::Redis => Some(RedisConfig {
                redis_url: file.cache.redis_url,
                connection_timeout_ms: file.cache.connect_timeout_ms,
            }),
            CacheType::Local => None,
        };

        Ok(Self {
            host: file.server.host,
            port: file.server.port,
            repository,
            cache,
            postgres,
            redis,
            redact_errors: file.server.redact_errors,
            seed_api_keys: file.repository.seed_api_keys,
        })
    }
}

fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_parse<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                key: key.to_string(),
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
