#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

use eventhub::cache::LocalCounterCache;
use eventhub::db::LocalRepository;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to the process-global
/// environment so parallel tests do not see each other's changes.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Every variable the config loader reads, cleared.
pub const CLEAN_ENV: &[(&str, Option<&str>)] = &[
    ("HOST", None),
    ("PORT", None),
    ("REPOSITORY_TYPE", None),
    ("CACHE_TYPE", None),
    ("DATABASE_URL", None),
    ("PG_DATABASE_URL", None),
    ("PG_POOL_MAX", None),
    ("PG_POOL_MIN", None),
    ("PG_CONN_TIMEOUT_SEC", None),
    ("PG_IDLE_TIMEOUT_SEC", None),
    ("REDIS_URL", None),
    ("REDIS_CONN_TIMEOUT_MS", None),
    ("EVENTHUB_REDACT_ERRORS", None),
    ("EVENTHUB_SEED_API_KEYS", None),
];

/// In-memory store and cache, shared with whatever is built on top of them.
pub struct Backends {
    pub repo: LocalRepository,
    pub cache: LocalCounterCache,
}

impl Backends {
    pub fn new() -> Self {
        Self {
            repo: LocalRepository::new(),
            cache: LocalCounterCache::new(),
        }
    }

    pub fn repo_arc(&self) -> Arc<LocalRepository> {
        Arc::new(self.repo.clone())
    }

    pub fn cache_arc(&self) -> Arc<LocalCounterCache> {
        Arc::new(self.cache.clone())
    }
}

#[cfg(feature = "http-server")]
pub mod http {
    use axum::{
        body::{to_bytes, Body},
        http::{HeaderMap, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use eventhub::http::{create_router, AppState};

    use super::Backends;

    pub struct TestResponse {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Vec<u8>,
    }

    impl TestResponse {
        pub fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap_or(Value::Null)
        }

        pub fn text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    /// Router wired to in-memory backends the test can inspect and poke.
    pub struct TestApp {
        pub backends: Backends,
        pub router: Router,
    }

    impl TestApp {
        pub fn new() -> Self {
            Self::build(false)
        }

        pub fn with_redacted_errors() -> Self {
            Self::build(true)
        }

        fn build(redact: bool) -> Self {
            let backends = Backends::new();
            let state = AppState::new(backends.repo_arc(), backends.cache_arc())
                .with_redacted_errors(redact);
            Self {
                router: create_router(state),
                backends,
            }
        }

        pub async fn get(&self, uri: &str) -> TestResponse {
            self.send(Method::GET, uri, Body::empty(), None).await
        }

        pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
            self.send(
                Method::POST,
                uri,
                Body::from(body.to_string()),
                Some("application/json"),
            )
            .await
        }

        pub async fn post_raw(
            &self,
            uri: &str,
            body: impl Into<Body>,
            content_type: Option<&str>,
        ) -> TestResponse {
            self.send(Method::POST, uri, body.into(), content_type)
                .await
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            body: Body,
            content_type: Option<&str>,
        ) -> TestResponse {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(ct) = content_type {
                builder = builder.header("content-type", ct);
            }
            let request = builder.body(body).unwrap();

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let body = to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap()
                .to_vec();

            TestResponse {
                status,
                headers,
                body,
            }
        }
    }
}
