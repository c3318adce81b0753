//! Repository factory.
//!
//! Picks and builds the store implementation from runtime configuration.

use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "postgres-repo")]
use tracing::warn;
use tracing::info;

use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::config::{ConfigError, PostgresConfig};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("postgres"/"pg", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Reads `REPOSITORY_TYPE`. Defaults to Postgres if a database URL is
    /// present, otherwise Local. An unrecognized value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().map_err(|message| ConfigError::Invalid {
                key: "REPOSITORY_TYPE".to_string(),
                message,
            });
        }

        if std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok() {
            Ok(Self::Postgres)
        } else {
            Ok(Self::Local)
        }
    }
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// `postgres_config` is required for [`RepositoryType::Postgres`].
    /// `seed_api_keys` only apply to the in-memory store; a Postgres database
    /// holds its own apps.
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
        seed_api_keys: &[String],
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config = postgres_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Postgres repository requires PostgresConfig",
                        )
                    })?;
                    if !seed_api_keys.is_empty() {
                        warn!(
                            count = seed_api_keys.len(),
                            "Ignoring seed api keys for the Postgres store"
                        );
                    }
                    let pg = Self::create_postgres(config).await?;
                    Ok(pg as Arc<dyn FullRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = (postgres_config, seed_api_keys);
                    Err(RepositoryError::configuration(
                        "Postgres repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Self::create_local(seed_api_keys),
        }
    }

    /// Create a Postgres repository. Pool setup and migrations block, so they
    /// run off the async workers.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository with one app per seed key.
    pub fn create_local(seed_api_keys: &[String]) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo = LocalRepository::new();
        for key in seed_api_keys {
            let app = repo.seed_app(key.as_str())?;
            info!(app_id = %app.id, "Seeded app");
        }
        Ok(Arc::new(repo))
    }
}
