use super::*;
use alter_db::DuckDbBackend;

fn event(id: &str, log: &str) -> MigrationEvent {
    MigrationEvent {
        id: MigrationId::new(id),
        date_applied: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        time_taken_ms: 42,
        log: log.to_string(),
    }
}

#[tokio::test]
async fn test_ensure_table_reports_existing() {
    let db = DuckDbBackend::in_memory().unwrap();
    let tracker = HistoryTracker::new(&db);

    assert!(!tracker.ensure_table().await.unwrap());
    assert!(tracker.ensure_table().await.unwrap());
    assert!(db.relation_exists(MIGRATION_TABLE).await.unwrap());
}

#[tokio::test]
async fn test_empty_table_is_uninitialized() {
    let db = DuckDbBackend::in_memory().unwrap();
    let tracker = HistoryTracker::new(&db);

    assert!(tracker.current_version().await.unwrap().is_uninitialized());
    // The table is created as a side effect.
    assert!(db.relation_exists(MIGRATION_TABLE).await.unwrap());
    assert!(tracker.current_version().await.unwrap().is_uninitialized());
}

#[tokio::test]
async fn test_current_version_is_greatest_id() {
    let db = DuckDbBackend::in_memory().unwrap();
    let tracker = HistoryTracker::new(&db);
    tracker.ensure_table().await.unwrap();

    tracker.record(&event("002_b", "")).await.unwrap();
    tracker.record(&event("010_DIFF_c", "")).await.unwrap();
    tracker.record(&event("001_a", "")).await.unwrap();

    assert_eq!(tracker.current_version().await.unwrap(), "010_DIFF_c");
}

#[tokio::test]
async fn test_history_round_trips_events() {
    let db = DuckDbBackend::in_memory().unwrap();
    let tracker = HistoryTracker::new(&db);
    tracker.ensure_table().await.unwrap();

    tracker.record(&event("2_b", "it's done")).await.unwrap();
    tracker.record(&event("1_a", "3 row(s) affected.")).await.unwrap();

    let history = tracker.history().await.unwrap();
    assert_eq!(
        history,
        vec![event("1_a", "3 row(s) affected."), event("2_b", "it's done")]
    );
}

#[tokio::test]
async fn test_record_truncates_long_log() {
    let db = DuckDbBackend::in_memory().unwrap();
    let tracker = HistoryTracker::new(&db);
    tracker.ensure_table().await.unwrap();

    let long = "x".repeat(LOG_MAX_CHARS + 500);
    tracker.record(&event("1_a", &long)).await.unwrap();

    let history = tracker.history().await.unwrap();
    assert_eq!(history[0].log.chars().count(), LOG_MAX_CHARS);
}

#[tokio::test]
async fn test_record_rejects_duplicate_id() {
    let db = DuckDbBackend::in_memory().unwrap();
    let tracker = HistoryTracker::new(&db);
    tracker.ensure_table().await.unwrap();

    tracker.record(&event("1_a", "")).await.unwrap();
    let err = tracker.record(&event("1_a", "")).await.unwrap_err();
    assert!(matches!(err, MigrateError::Record { ref id, .. } if id == "1_a"));
}

#[tokio::test]
async fn test_history_without_table_creates_it() {
    let db = DuckDbBackend::in_memory().unwrap();
    let tracker = HistoryTracker::new(&db);

    assert!(tracker.history().await.unwrap().is_empty());
    assert!(db.relation_exists(MIGRATION_TABLE).await.unwrap());
}

#[test]
fn test_parse_event_rejects_bad_date() {
    let row: Row = vec![
        Some("1_a".to_string()),
        Some("yesterday".to_string()),
        Some("5".to_string()),
        Some(String::new()),
    ];
    let err = parse_event(&row).unwrap_err();
    assert!(matches!(err, MigrateError::InvalidHistoryRow(_)));
}

#[test]
fn test_parse_event_rejects_missing_id() {
    let row: Row = vec![None, Some("2024-03-09".to_string()), Some("5".to_string())];
    let err = parse_event(&row).unwrap_err();
    assert!(err.to_string().contains("missing id"));
}

#[tokio::test]
async fn test_quoted_table_is_the_plain_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let tracker = HistoryTracker::new(&db);
    tracker.ensure_table().await.unwrap();
    tracker.record(&event("1_a", "")).await.unwrap();

    let rows = db
        .query_rows("SELECT id FROM _schema_migrations")
        .await
        .unwrap();
    assert_eq!(rows, vec![vec![Some("1_a".to_string())]]);
}
