use thiserror::Error;

use crate::cache::CacheError;
use crate::db::RepositoryError;

pub const EMAIL_REQUIRED: &str = "email required";
pub const COLLECT_FIELDS_REQUIRED: &str = "apiKey and type required";
pub const APP_NOT_FOUND: &str = "app not found";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures a request can end in.
///
/// `InvalidInput` and `NotFound` are the caller's problem and carry a fixed
/// message. `Repository` and `Cache` are dependency failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ServiceError {
    /// True for dependency failures (store or cache).
    pub fn is_dependency_failure(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::Cache(_))
    }

    /// Message suitable for the response body: the fixed text for client
    /// errors, the raw dependency message otherwise.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m) | Self::NotFound(m) => m,
            Self::Repository(e) => e.message(),
            Self::Cache(e) => e.message(),
        }
    }
}
