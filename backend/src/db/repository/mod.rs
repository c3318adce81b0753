//! Repository traits for the persistent store.
//!
//! The store is split by table so each trait stays small; [`FullRepository`]
//! is what the rest of the crate holds on to.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync`: one instance is shared by every
//! in-flight request.

pub mod error;

use async_trait::async_trait;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::{App, AppId, EventId, NewEvent, NewUser, User};

/// Operations on the `users` table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return the stored row, including the generated id
    /// and creation time.
    ///
    /// A duplicate email is reported as [`RepositoryError::QueryError`]
    /// carrying the store's own constraint message.
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
}

/// Read access to the `apps` table.
#[async_trait]
pub trait AppRepository: Send + Sync {
    /// Resolve an API key to its app, `Ok(None)` when no app owns the key.
    async fn find_app_by_api_key(&self, api_key: &str) -> RepositoryResult<Option<App>>;
}

/// Operations on the `events` table.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert one event row.
    async fn insert_event(&self, event: &NewEvent) -> RepositoryResult<EventId>;

    /// Exact number of events stored for `app_id`. Unknown apps count zero.
    async fn count_events_for_app(&self, app_id: AppId) -> RepositoryResult<i64>;
}

/// Everything the service layer needs from the store.
#[async_trait]
pub trait FullRepository: UserRepository + AppRepository + EventRepository {
    /// Trivial liveness probe (`SELECT 1` or equivalent).
    async fn health_check(&self) -> RepositoryResult<bool>;
}
