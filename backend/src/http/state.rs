//! Application state for the HTTP server.

use std::sync::Arc;

use tracing::{debug, error};

use super::error::AppError;
use crate::cache::CounterCache;
use crate::db::FullRepository;
use crate::services::ServiceError;

/// Body text used in place of dependency messages when redaction is on.
pub const REDACTED_MESSAGE: &str = "internal error";

/// Shared application state passed to all handlers.
///
/// Both handles are created once at startup; cloning the state only bumps
/// reference counts.
#[derive(Clone)]
pub struct AppState {
    /// Store for users, apps and events
    pub repository: Arc<dyn FullRepository>,
    /// Per-app event counters
    pub cache: Arc<dyn CounterCache>,
    /// Hide raw store/cache messages from response bodies
    pub redact_errors: bool,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>, cache: Arc<dyn CounterCache>) -> Self {
        Self {
            repository,
            cache,
            redact_errors: false,
        }
    }

    pub fn with_redacted_errors(mut self, redact: bool) -> Self {
        self.redact_errors = redact;
        self
    }

    /// Message a client is allowed to see for `err`.
    pub fn public_message(&self, err: &ServiceError) -> String {
        if self.redact_errors && err.is_dependency_failure() {
            REDACTED_MESSAGE.to_string()
        } else {
            err.message().to_string()
        }
    }

    /// Log a failed operation and turn it into a response error.
    ///
    /// Dependency failures are logged with full context at `error`; client
    /// mistakes only at `debug`.
    pub fn reject(&self, operation: &'static str, err: ServiceError) -> AppError {
        let message = self.public_message(&err);
        match &err {
            ServiceError::InvalidInput(_) => {
                debug!(operation, reason = %err, "rejected request");
                AppError::BadRequest(message)
            }
            ServiceError::NotFound(_) => {
                debug!(operation, reason = %err, "rejected request");
                AppError::NotFound(message)
            }
            ServiceError::Repository(_) | ServiceError::Cache(_) => {
                error!(operation, error = %err, "request failed");
                AppError::Internal(message)
            }
        }
    }
}
