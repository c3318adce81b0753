//! In-memory store for development and tests.
//!
//! Mirrors the Postgres schema closely enough that the service layer cannot
//! tell the difference: sequential ids, `created_at` stamped on insert, and
//! unique `users.email` / `apps.api_key`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::db::repository::{
    AppRepository, ErrorContext, EventRepository, FullRepository, RepositoryError,
    RepositoryResult, UserRepository,
};
use crate::models::{App, AppId, Event, EventId, NewEvent, NewUser, User, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    apps: Vec<App>,
    events: Vec<Event>,
    user_seq: i64,
    app_seq: i64,
    event_seq: i64,
}

/// In-memory repository. Cloning shares the underlying tables.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    tables: Arc<RwLock<Tables>>,
    available: Arc<AtomicBool>,
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Register an app with the next free id.
    pub fn seed_app(&self, api_key: impl Into<String>) -> RepositoryResult<App> {
        let mut tables = self.tables.write();
        let id = AppId::new(tables.app_seq + 1);
        Self::insert_app(&mut tables, id, api_key.into())
    }

    /// Register an app under a fixed id. Later sequential ids skip past it.
    pub fn seed_app_with_id(
        &self,
        id: AppId,
        api_key: impl Into<String>,
    ) -> RepositoryResult<App> {
        let mut tables = self.tables.write();
        if tables.apps.iter().any(|a| a.id == id) {
            return Err(RepositoryError::query_with_context(
                "duplicate key value violates unique constraint \"apps_pkey\"",
                ErrorContext::new("seed_app").with_entity("app").with_entity_id(id),
            ));
        }
        Self::insert_app(&mut tables, id, api_key.into())
    }

    fn insert_app(tables: &mut Tables, id: AppId, api_key: String) -> RepositoryResult<App> {
        if tables.apps.iter().any(|a| a.api_key == api_key) {
            return Err(RepositoryError::query_with_context(
                "duplicate key value violates unique constraint \"apps_api_key_key\"",
                ErrorContext::new("seed_app").with_entity("app"),
            ));
        }
        tables.app_seq = tables.app_seq.max(id.value());
        let app = App { id, api_key };
        tables.apps.push(app.clone());
        Ok(app)
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.tables.read().users.len()
    }

    /// Number of stored events across all apps.
    pub fn event_count(&self) -> usize {
        self.tables.read().events.len()
    }

    /// Snapshot of the events recorded for one app, oldest first.
    pub fn events_for_app(&self, app_id: AppId) -> Vec<Event> {
        self.tables
            .read()
            .events
            .iter()
            .filter(|e| e.app_id == app_id)
            .cloned()
            .collect()
    }

    /// Simulate the store going away (or coming back). While unavailable
    /// every call fails with a connection error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self, operation: &str) -> RepositoryResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "connection refused",
                ErrorContext::new(operation),
            ))
        }
    }
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        self.ensure_available("create_user")?;
        let mut tables = self.tables.write();

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::query_with_context(
                "duplicate key value violates unique constraint \"users_email_key\"",
                ErrorContext::new("create_user")
                    .with_entity("user")
                    .with_details("db_error_kind=UniqueViolation"),
            ));
        }

        tables.user_seq += 1;
        let row = User {
            id: UserId::new(tables.user_seq),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl AppRepository for LocalRepository {
    async fn find_app_by_api_key(&self, api_key: &str) -> RepositoryResult<Option<App>> {
        self.ensure_available("find_app_by_api_key")?;
        Ok(self
            .tables
            .read()
            .apps
            .iter()
            .find(|a| a.api_key == api_key)
            .cloned())
    }
}

#[async_trait]
impl EventRepository for LocalRepository {
    async fn insert_event(&self, event: &NewEvent) -> RepositoryResult<EventId> {
        self.ensure_available("insert_event")?;
        let mut tables = self.tables.write();

        // events.app_id REFERENCES apps(id)
        if !tables.apps.iter().any(|a| a.id == event.app_id) {
            return Err(RepositoryError::query_with_context(
                "insert or update on table \"events\" violates foreign key constraint \"events_app_id_fkey\"",
                ErrorContext::new("insert_event")
                    .with_entity("event")
                    .with_entity_id(event.app_id),
            ));
        }

        tables.event_seq += 1;
        let id = EventId::new(tables.event_seq);
        tables.events.push(Event {
            id,
            app_id: event.app_id,
            event_type: event.event_type.clone(),
            payload: event.payload.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn count_events_for_app(&self, app_id: AppId) -> RepositoryResult<i64> {
        self.ensure_available("count_events_for_app")?;
        let count = self
            .tables
            .read()
            .events
            .iter()
            .filter(|e| e.app_id == app_id)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.ensure_available("health_check")?;
        Ok(true)
    }
}
