mod support;

use std::io::Write;

use eventhub::cache::CacheType;
use eventhub::config::{ConfigError, ServerConfig, DEFAULT_PORT};
use eventhub::db::factory::RepositoryType;
use support::{with_scoped_env, CLEAN_ENV};

fn env_with(extra: &[(&'static str, Option<&'static str>)]) -> Vec<(&'static str, Option<&'static str>)> {
    let mut changes = CLEAN_ENV.to_vec();
    changes.extend_from_slice(extra);
    changes
}

#[test]
fn test_defaults_to_in_memory_backends() {
    let config = with_scoped_env(CLEAN_ENV, ServerConfig::from_env).unwrap();
    assert_eq!(config.repository, RepositoryType::Local);
    assert_eq!(config.cache, CacheType::Local);
    assert_eq!(config.port, DEFAULT_PORT);
    assert!(config.postgres.is_none());
    assert!(config.redis.is_none());
    assert!(!config.redact_errors);
    assert!(config.seed_api_keys.is_empty());
    assert_eq!(config.bind_address().unwrap().port(), 5000);
}

#[test]
fn test_database_url_selects_postgres() {
    let changes = env_with(&[
        ("DATABASE_URL", Some("postgres://u:p@db/eventhub")),
        ("PG_POOL_MAX", Some("4")),
    ]);
    let config = with_scoped_env(&changes, ServerConfig::from_env).unwrap();
    assert_eq!(config.repository, RepositoryType::Postgres);

    let pg = config.postgres.unwrap();
    assert_eq!(pg.database_url, "postgres://u:p@db/eventhub");
    assert_eq!(pg.max_pool_size, 4);
    assert_eq!(pg.min_pool_size, 1);
}

#[test]
fn test_redis_url_selects_redis() {
    let changes = env_with(&[
        ("REDIS_URL", Some("redis://cache:6379")),
        ("REDIS_CONN_TIMEOUT_MS", Some("250")),
    ]);
    let config = with_scoped_env(&changes, ServerConfig::from_env).unwrap();
    assert_eq!(config.cache, CacheType::Redis);
    let redis = config.redis.unwrap();
    assert_eq!(redis.redis_url, "redis://cache:6379");
    assert_eq!(redis.connection_timeout_ms, 250);
}

#[test]
fn test_explicit_type_overrides_url() {
    let changes = env_with(&[
        ("REDIS_URL", Some("redis://cache:6379")),
        ("CACHE_TYPE", Some("local")),
    ]);
    let config = with_scoped_env(&changes, ServerConfig::from_env).unwrap();
    assert_eq!(config.cache, CacheType::Local);
    assert!(config.redis.is_none());
}

#[test]
fn test_postgres_without_url_is_missing() {
    let changes = env_with(&[("REPOSITORY_TYPE", Some("postgres"))]);
    let err = with_scoped_env(&changes, ServerConfig::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));
}

#[test]
fn test_unknown_repository_type_is_rejected() {
    let changes = env_with(&[
        ("REPOSITORY_TYPE", Some("postgresql")),
        ("DATABASE_URL", Some("postgres://u:p@db/eventhub")),
    ]);
    let err = with_scoped_env(&changes, ServerConfig::from_env).unwrap_err();
    match err {
        ConfigError::Invalid { key, message } => {
            assert_eq!(key, "REPOSITORY_TYPE");
            assert!(message.contains("postgresql"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_cache_type_is_rejected() {
    let changes = env_with(&[("CACHE_TYPE", Some("memcached"))]);
    let err = with_scoped_env(&changes, ServerConfig::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "CACHE_TYPE"));
}

#[test]
fn test_seed_api_keys_from_env() {
    let changes = env_with(&[("EVENTHUB_SEED_API_KEYS", Some("demo-key, other-key"))]);
    let config = with_scoped_env(&changes, ServerConfig::from_env).unwrap();
    assert_eq!(config.seed_api_keys, vec!["demo-key", "other-key"]);
}

#[test]
fn test_invalid_port_is_reported() {
    let changes = env_with(&[("PORT", Some("not-a-port"))]);
    let err = with_scoped_env(&changes, ServerConfig::from_env).unwrap_err();
    match err {
        ConfigError::Invalid { key, .. } => assert_eq!(key, "PORT"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_redaction_switch() {
    let changes = env_with(&[("EVENTHUB_REDACT_ERRORS", Some("true")), ("PORT", Some("8080"))]);
    let config = with_scoped_env(&changes, ServerConfig::from_env).unwrap();
    assert!(config.redact_errors);
    assert_eq!(config.port, 8080);
}

#[test]
fn test_config_file_round_trip_through_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 7000
redact_errors = true

[repository]
type = "postgres"

[postgres]
database_url = "postgres://localhost/eventhub"
max_connections = 20

[cache]
type = "local"
"#
    )
    .unwrap();

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.port, 7000);
    assert!(config.redact_errors);
    assert_eq!(config.repository, RepositoryType::Postgres);
    assert_eq!(config.cache, CacheType::Local);
    let pg = config.postgres.unwrap();
    assert_eq!(pg.max_pool_size, 20);
    assert_eq!(pg.idle_timeout_sec, 600);
}

#[test]
fn test_config_file_redis_requires_url() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[cache]\ntype = \"redis\"").unwrap();
    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("cache.redis_url")));
}

#[test]
fn test_config_file_rejects_bad_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server\nport = ").unwrap();
    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ServerConfig::from_file(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
