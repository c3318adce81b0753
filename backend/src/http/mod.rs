//! HTTP server module.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - JSON extraction and response shaping                   │
//! │  - Error → status mapping, CORS, tracing                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (crate::services)                          │
//! │  - Validation, store/cache sequencing                     │
//! └───────────┬───────────────────────────────┬──────────────┘
//!             │                               │
//! ┌───────────▼──────────────┐   ┌────────────▼─────────────┐
//! │  Store (crate::db)        │   │  Cache (crate::cache)     │
//! └──────────────────────────┘   └──────────────────────────┘
//! ```

pub mod docs;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
