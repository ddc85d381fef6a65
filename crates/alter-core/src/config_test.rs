use super::*;
use crate::error::ErrorKind;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_defaults_without_file() {
    let temp = tempdir().unwrap();
    let config = Config::load_from_dir(temp.path()).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.migrations_dir, "SchemaMigrations");
    assert_eq!(
        config.migrations_path(temp.path()),
        temp.path().join("SchemaMigrations")
    );
}

#[test]
fn test_load_full_config() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("alter.yml"),
        r#"
migrations_dir: db/migrations
connection:
  engine: postgres
  host: localhost
  port: 5432
  database: app
  username: app
  password: secret
"#,
    )
    .unwrap();

    let config = Config::load_from_dir(temp.path()).unwrap();
    assert_eq!(config.migrations_dir, "db/migrations");
    assert_eq!(config.connection.port, Some(5432));
    assert_eq!(config.connection.engine().unwrap(), Engine::Postgres);
}

#[test]
fn test_load_yaml_extension() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("alter.yaml"),
        "connection:\n  engine: duckdb\n  database: ':memory:'\n",
    )
    .unwrap();

    let config = Config::load_from_dir(temp.path()).unwrap();
    assert_eq!(config.connection.engine().unwrap(), Engine::DuckDb);
    assert_eq!(config.migrations_dir, "SchemaMigrations");
}

#[test]
fn test_unknown_keys_rejected() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("alter.yml"), "migration_folder: x\n").unwrap();

    let err = Config::load_from_dir(temp.path()).unwrap_err();
    assert!(matches!(err, CoreError::YamlParse(_)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_invalid_engine_in_file() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("alter.yml"),
        "connection:\n  engine: cassandra\n",
    )
    .unwrap();

    let err = Config::load_from_dir(temp.path()).unwrap_err();
    assert!(matches!(err, CoreError::UnknownEngine { .. }));
}

#[test]
fn test_empty_migrations_dir_rejected() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("alter.yml"), "migrations_dir: ''\n").unwrap();

    let err = Config::load_from_dir(temp.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_explicit_missing_file() {
    let err = Config::load(Path::new("/definitely/not/here/alter.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_engine_parsing() {
    assert_eq!("postgres".parse::<Engine>().unwrap(), Engine::Postgres);
    assert_eq!("PostgreSQL".parse::<Engine>().unwrap(), Engine::Postgres);
    assert_eq!("duckdb".parse::<Engine>().unwrap(), Engine::DuckDb);

    for name in ["sqlserver", "oracle", "sqlite", "mysql"] {
        let err = name.parse::<Engine>().unwrap_err();
        assert!(matches!(err, CoreError::EngineNotImplemented { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    let err = "db2".parse::<Engine>().unwrap_err();
    assert!(err.to_string().contains("No adapter named 'db2'"));
}

#[test]
fn test_missing_engine() {
    let err = ConnectionProperties::default().engine().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_merge_overrides_win() {
    let file = ConnectionProperties {
        engine: Some("postgres".to_string()),
        host: Some("db.internal".to_string()),
        port: Some(5432),
        database: Some("app".to_string()),
        ..Default::default()
    };
    let flags = ConnectionProperties {
        host: Some("localhost".to_string()),
        password: Some("pw".to_string()),
        ..Default::default()
    };

    let merged = file.merge(flags);
    assert_eq!(merged.engine.as_deref(), Some("postgres"));
    assert_eq!(merged.host.as_deref(), Some("localhost"));
    assert_eq!(merged.port, Some(5432));
    assert_eq!(merged.database.as_deref(), Some("app"));
    assert_eq!(merged.password.as_deref(), Some("pw"));
    assert_eq!(merged.connection_string, None);
}
