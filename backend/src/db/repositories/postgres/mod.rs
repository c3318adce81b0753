//! Postgres repository implementation using Diesel.
//!
//! Connections come from an r2d2 pool and pending migrations run on startup.
//! Diesel is synchronous, so every call runs on the blocking thread pool via
//! [`tokio::task::spawn_blocking`]. See [`crate::config::PostgresConfig`] for
//! the environment variables that tune the pool.
//!
//! Each call makes exactly one pool checkout and one statement. Failures are
//! returned to the caller as they are.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;
use tracing::debug;

use crate::config::PostgresConfig;
use crate::db::repository::{
    AppRepository, ErrorContext, EventRepository, FullRepository, RepositoryError,
    RepositoryResult, UserRepository,
};
use crate::models::{App, AppId, EventId, NewEvent, NewUser, User};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self::from_pool(pool))
    }

    fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run `f` once on a pooled connection in the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection"),
                )
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let row = NewUserRow {
            email: user.email.clone(),
            name: user.name.clone(),
        };
        self.with_conn(move |conn| {
            diesel::insert_into(users::table)
                .values(&row)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(conn)
                .map(User::from)
                .map_err(|e| map_diesel_error(e).with_operation("create_user"))
        })
        .await
    }
}

#[async_trait]
impl AppRepository for PostgresRepository {
    async fn find_app_by_api_key(&self, api_key: &str) -> RepositoryResult<Option<App>> {
        let api_key = api_key.to_string();
        self.with_conn(move |conn| {
            apps::table
                .filter(apps::api_key.eq(&api_key))
                .select(AppRow::as_select())
                .first::<AppRow>(conn)
                .optional()
                .map(|row| row.map(App::from))
                .map_err(|e| map_diesel_error(e).with_operation("find_app_by_api_key"))
        })
        .await
    }
}

#[async_trait]
impl EventRepository for PostgresRepository {
    async fn insert_event(&self, event: &NewEvent) -> RepositoryResult<EventId> {
        let row = NewEventRow {
            app_id: event.app_id.value(),
            event_type: event.event_type.clone(),
            payload: event.payload.clone(),
        };
        self.with_conn(move |conn| {
            diesel::insert_into(events::table)
                .values(&row)
                .returning(events::id)
                .get_result::<i64>(conn)
                .map(EventId::new)
                .map_err(|e| map_diesel_error(e).with_operation("insert_event"))
        })
        .await
    }

    async fn count_events_for_app(&self, app_id: AppId) -> RepositoryResult<i64> {
        let id = app_id.value();
        let count = self
            .with_conn(move |conn| {
                events::table
                    .filter(events::app_id.eq(id))
                    .count()
                    .get_result::<i64>(conn)
                    .map_err(|e| map_diesel_error(e).with_operation("count_events_for_app"))
            })
            .await?;
        debug!(app_id = id, count, "counted events");
        Ok(count)
    }
}

#[async_trait]
impl FullRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }
}
