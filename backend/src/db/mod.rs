//! Persistent store: users, apps and events.
//!
//! ```text
//! services ──► repository traits (FullRepository)
//!                   │
//!          ┌────────┴─────────┐
//!   PostgresRepository   LocalRepository
//!    (Diesel + r2d2)       (in-memory)
//! ```
//!
//! The store is authoritative. Counters in [`crate::cache`] are derived from
//! it and may lag.

pub mod factory;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    AppRepository, ErrorContext, EventRepository, FullRepository, RepositoryError,
    RepositoryResult, UserRepository,
};
