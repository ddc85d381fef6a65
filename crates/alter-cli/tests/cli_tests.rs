//! Binary-level tests for the `alter` CLI against a DuckDB file

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled alter binary
fn alter_bin() -> String {
    env!("CARGO_BIN_EXE_alter").to_string()
}

/// Run `alter -p <project> <args>` and return (stdout, stderr, exit code).
fn run_alter(project: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(alter_bin())
        .arg("-p")
        .arg(project)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("ALTER_ENGINE")
        .env_remove("ALTER_DATABASE")
        .env_remove("ALTER_MIGRATIONS_DIR")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute alter with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// A project initialised with `alter init` (DuckDB file `alter.duckdb`).
fn init_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_alter(dir.path(), &["init"]);
    assert_eq!(code, 0, "init failed: {stderr}");
    assert!(stdout.contains("SchemaMigrations"));
    assert!(dir.path().join("alter.yml").exists());
    dir
}

fn write_migration(dir: &Path, id: &str, sql: &str) {
    fs::write(dir.join("SchemaMigrations").join(format!("{id}.sql")), sql).unwrap();
}

#[test]
fn test_init_is_idempotent() {
    let dir = init_project();
    fs::write(dir.path().join("alter.yml"), "connection:\n  engine: duckdb\n").unwrap();

    let (stdout, _, code) = run_alter(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("already exists"));
    let config = fs::read_to_string(dir.path().join("alter.yml")).unwrap();
    assert_eq!(config, "connection:\n  engine: duckdb\n");
}

#[test]
fn test_status_of_new_database() {
    let dir = init_project();
    let (stdout, stderr, code) = run_alter(dir.path(), &["status"]);
    assert_eq!(code, 0, "status failed: {stderr}");
    assert_eq!(stdout.trim(), "0");
    assert!(dir.path().join("alter.duckdb").exists());
}

#[test]
fn test_add_dryrun_migrate_history() {
    let dir = init_project();

    let (stdout, stderr, code) = run_alter(
        dir.path(),
        &["add", "-i", "create_people", "-s", "CREATE TABLE people (id INT);"],
    );
    assert_eq!(code, 0, "add failed: {stderr}");
    let file = stdout.trim();
    assert!(file.ends_with("_create_people.sql"), "unexpected path {file}");
    assert_eq!(
        fs::read_to_string(file).unwrap(),
        "CREATE TABLE people (id INT);"
    );

    let (stdout, _, code) = run_alter(dir.path(), &["dryrun", "--sql"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("_create_people"));
    assert!(stdout.contains("incremental"));
    assert!(stdout.contains("CREATE TABLE people"));

    let (stdout, stderr, code) = run_alter(dir.path(), &["migrate"]);
    assert_eq!(code, 0, "migrate failed: {stderr}");
    assert!(stdout.contains("Applied "));

    let (stdout, _, code) = run_alter(dir.path(), &["dryrun"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Database is up to date."));

    let (stdout, _, code) = run_alter(dir.path(), &["history", "-o", "json"]);
    assert_eq!(code, 0);
    let events: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0]["id"].as_str().unwrap().ends_with("_create_people"));
    assert!(events[0]["date_applied"].is_string());
}

#[test]
fn test_migrate_to_target_then_latest() {
    let dir = init_project();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (x INT);");
    write_migration(dir.path(), "002_b", "CREATE TABLE b (x INT);");
    write_migration(dir.path(), "003_c", "CREATE TABLE c (x INT);");

    let (stdout, _, code) = run_alter(dir.path(), &["migrate", "-t", "002_b"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Database is now at version 002_b"));

    let (stdout, _, _) = run_alter(dir.path(), &["status"]);
    assert_eq!(stdout.trim(), "002_b");

    let (stdout, _, code) = run_alter(dir.path(), &["migrate"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Applied 003_c"));
    assert!(!stdout.contains("Applied 001_a"));

    let (stdout, _, code) = run_alter(dir.path(), &["history"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("001_a"));
    assert!(stdout.contains("003_c"));
}

#[test]
fn test_failed_migration_exits_one_and_rolls_back() {
    let dir = init_project();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (x INT);");
    write_migration(dir.path(), "002_bad", "CREATE TABLE (");

    let (_, stderr, code) = run_alter(dir.path(), &["migrate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Migration error"), "stderr: {stderr}");
    assert!(stderr.contains("002_bad"), "stderr: {stderr}");

    let (stdout, _, _) = run_alter(dir.path(), &["status"]);
    assert_eq!(stdout.trim(), "0");
}

#[test]
fn test_reserved_description_exits_two() {
    let dir = init_project();
    let (_, stderr, code) = run_alter(dir.path(), &["add", "-i", "my_DIFF_change"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Invalid input"), "stderr: {stderr}");
    assert!(stderr.contains("DIFF"));
}

#[test]
fn test_conflicting_kind_flags_exit_two() {
    let dir = init_project();
    let (_, _, code) = run_alter(dir.path(), &["add", "-i", "x", "-D", "-b"]);
    assert_eq!(code, 2);
    let count = fs::read_dir(dir.path().join("SchemaMigrations")).unwrap().count();
    assert_eq!(count, 0);
}

#[test]
fn test_unimplemented_engine_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_alter(dir.path(), &["status", "-e", "oracle"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Configuration error"), "stderr: {stderr}");
    assert!(stderr.contains("not implemented"));
}

#[test]
fn test_missing_migrations_folder() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) =
        run_alter(dir.path(), &["dryrun", "-e", "duckdb", "-d", "app.duckdb"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Migrations directory not found"), "stderr: {stderr}");
}
