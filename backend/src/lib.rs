//! # eventhub
//!
//! A small event-collection service: it registers users, accepts
//! analytics-style events tagged by an app's API key, and reports per-app
//! event counts.
//!
//! ## Architecture
//!
//! - [`models`]: domain entities and id newtypes
//! - [`db`]: persistent store (Postgres via Diesel, or in-memory)
//! - [`cache`]: per-app event counters (Redis, or in-memory)
//! - [`services`]: the register / collect / stats / health operations
//! - [`http`]: Axum router, handlers and OpenAPI docs
//! - [`config`]: environment and file configuration
//!
//! The store is the source of truth. Cache counters are best-effort and are
//! reported next to the store count, never in place of it.

pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
