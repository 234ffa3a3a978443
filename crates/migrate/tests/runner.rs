//! Runner and version-store semantics against the in-memory adapter.

mod common;

use chrono::Utc;
use common::{CreateTableMigration, FailingMigration, MemoryAdapter};
use strata_migrate::{
    AdapterError, Migration, MigrationDirection, MigrationRunner, SchemaAdapter,
};

fn create_widgets(version: i64) -> CreateTableMigration {
    CreateTableMigration {
        version,
        table: "widgets".to_string(),
    }
}

#[tokio::test]
async fn versions_track_up_and_down_exactly_once() {
    let mut adapter = MemoryAdapter::new();
    adapter.connect().await.unwrap();

    let t0 = Utc::now();
    let t1 = Utc::now();
    adapter
        .record_migration(20240101120000, "add widgets", MigrationDirection::Up, t0, t1)
        .await
        .unwrap();

    let versions = adapter.versions().await.unwrap();
    assert_eq!(versions, vec![20240101120000]);

    adapter
        .record_migration(20240101120000, "add widgets", MigrationDirection::Down, t0, t1)
        .await
        .unwrap();
    assert!(adapter.versions().await.unwrap().is_empty());

    // a second down is a no-op, not an error cascade
    adapter
        .record_migration(20240101120000, "add widgets", MigrationDirection::Down, t0, t1)
        .await
        .unwrap();
    assert!(adapter.versions().await.unwrap().is_empty());
}

#[tokio::test]
async fn versions_are_ascending() {
    let mut adapter = MemoryAdapter::new();
    adapter.connect().await.unwrap();

    let t = Utc::now();
    for version in [30, 10, 20] {
        adapter
            .record_migration(version, "m", MigrationDirection::Up, t, t)
            .await
            .unwrap();
    }
    assert_eq!(adapter.versions().await.unwrap(), vec![10, 20, 30]);
}

#[tokio::test]
async fn migration_records_carry_names_and_times() {
    let mut adapter = MemoryAdapter::new();
    adapter.connect().await.unwrap();

    let t0 = Utc::now();
    let t1 = Utc::now();
    adapter
        .record_migration(42, "add widgets", MigrationDirection::Up, t0, t1)
        .await
        .unwrap();

    let records = adapter.migration_records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].version, 42);
    assert_eq!(records[0].name, "add widgets");
    assert!(!records[0].breakpoint);
}

#[tokio::test]
async fn schema_table_creation_is_idempotent() {
    let mut adapter = MemoryAdapter::new();
    adapter.connect().await.unwrap();

    assert!(!adapter.has_schema_table().await.unwrap());
    adapter.create_schema_table().await.unwrap();
    adapter.create_schema_table().await.unwrap();
    assert!(adapter.has_schema_table().await.unwrap());
}

#[tokio::test]
async fn apply_records_the_version_and_skips_reruns() {
    let mut adapter = MemoryAdapter::new();
    let runner = MigrationRunner::new();
    let migration = create_widgets(100);

    assert!(runner.apply(&mut adapter, &migration).await.unwrap());
    assert!(adapter.has_table("widgets").await.unwrap());
    assert_eq!(adapter.versions().await.unwrap(), vec![100]);

    // repeated invocation is idempotent
    assert!(!runner.apply(&mut adapter, &migration).await.unwrap());
    assert_eq!(adapter.versions().await.unwrap(), vec![100]);
}

#[tokio::test]
async fn revert_removes_version_and_schema() {
    let mut adapter = MemoryAdapter::new();
    let runner = MigrationRunner::new();
    let migration = create_widgets(100);

    runner.apply(&mut adapter, &migration).await.unwrap();
    assert!(runner.revert(&mut adapter, &migration).await.unwrap());
    assert!(!adapter.has_table("widgets").await.unwrap());
    assert!(adapter.versions().await.unwrap().is_empty());

    // reverting an unapplied migration is a no-op
    assert!(!runner.revert(&mut adapter, &migration).await.unwrap());
}

#[tokio::test]
async fn failed_migration_rolls_back_schema_and_version() {
    let mut adapter = MemoryAdapter::new();
    let runner = MigrationRunner::new();
    let migration = FailingMigration { version: 200 };

    let result = runner.apply(&mut adapter, &migration).await;
    assert!(matches!(result, Err(AdapterError::SchemaNotFound { .. })));

    // the transaction rolled back the partial table and the version row
    assert!(!adapter.has_table("half_done").await.unwrap());
    assert!(adapter.versions().await.unwrap().is_empty());
}

#[tokio::test]
async fn failure_without_transactions_surfaces_partial_state() {
    let mut adapter = MemoryAdapter::with_transactions(false);
    let runner = MigrationRunner::new();
    let migration = FailingMigration { version: 200 };

    let result = runner.apply(&mut adapter, &migration).await;
    match result {
        Err(AdapterError::PartiallyApplied { version, .. }) => assert_eq!(version, 200),
        other => panic!("expected PartiallyApplied, got {:?}", other.map(|_| ())),
    }

    // no safety net: the partial mutation stays, the version was never
    // recorded
    assert!(adapter.has_table("half_done").await.unwrap());
    assert!(adapter.versions().await.unwrap().is_empty());
}

#[tokio::test]
async fn apply_all_runs_in_ascending_version_order() {
    let mut adapter = MemoryAdapter::new();
    let runner = MigrationRunner::new();

    let migrations: Vec<Box<dyn Migration>> = vec![
        Box::new(CreateTableMigration {
            version: 300,
            table: "later".to_string(),
        }),
        Box::new(CreateTableMigration {
            version: 100,
            table: "earlier".to_string(),
        }),
    ];

    let report = runner.apply_all(&mut adapter, &migrations).await.unwrap();
    assert_eq!(report.applied_count, 2);
    assert_eq!(report.applied_versions, vec![100, 300]);
    assert_eq!(report.skipped_count, 0);

    // second run skips everything
    let report = runner.apply_all(&mut adapter, &migrations).await.unwrap();
    assert_eq!(report.applied_count, 0);
    assert_eq!(report.skipped_count, 2);
}

#[tokio::test]
async fn revert_last_unwinds_the_newest_migration() {
    let mut adapter = MemoryAdapter::new();
    let runner = MigrationRunner::new();

    let migrations: Vec<Box<dyn Migration>> = vec![
        Box::new(CreateTableMigration {
            version: 100,
            table: "first".to_string(),
        }),
        Box::new(CreateTableMigration {
            version: 200,
            table: "second".to_string(),
        }),
    ];

    runner.apply_all(&mut adapter, &migrations).await.unwrap();

    let report = runner.revert_last(&mut adapter, &migrations).await.unwrap();
    assert_eq!(report.reverted_versions, vec![200]);
    assert!(adapter.has_table("first").await.unwrap());
    assert!(!adapter.has_table("second").await.unwrap());
    assert_eq!(adapter.versions().await.unwrap(), vec![100]);
}

#[tokio::test]
async fn revert_all_unwinds_newest_first() {
    let mut adapter = MemoryAdapter::new();
    let runner = MigrationRunner::new();

    let migrations: Vec<Box<dyn Migration>> = vec![
        Box::new(CreateTableMigration {
            version: 100,
            table: "first".to_string(),
        }),
        Box::new(CreateTableMigration {
            version: 200,
            table: "second".to_string(),
        }),
    ];

    runner.apply_all(&mut adapter, &migrations).await.unwrap();
    let report = runner.revert_all(&mut adapter, &migrations).await.unwrap();

    assert_eq!(report.reverted_versions, vec![200, 100]);
    assert!(adapter.versions().await.unwrap().is_empty());
    assert!(!adapter.has_table("first").await.unwrap());
}

#[tokio::test]
async fn revert_last_requires_a_known_migration() {
    let mut adapter = MemoryAdapter::new();
    let runner = MigrationRunner::new();

    runner
        .apply(&mut adapter, &create_widgets(100))
        .await
        .unwrap();

    // the applied version has no matching migration object
    let unknown: Vec<Box<dyn Migration>> = Vec::new();
    let result = runner.revert_last(&mut adapter, &unknown).await;
    assert!(matches!(result, Err(AdapterError::SchemaNotFound { .. })));
}

#[tokio::test]
async fn status_reports_applied_and_pending() {
    let mut adapter = MemoryAdapter::new();
    let runner = MigrationRunner::new();

    let migrations: Vec<Box<dyn Migration>> = vec![
        Box::new(CreateTableMigration {
            version: 100,
            table: "first".to_string(),
        }),
        Box::new(CreateTableMigration {
            version: 200,
            table: "second".to_string(),
        }),
    ];

    runner
        .apply(&mut adapter, migrations[0].as_ref())
        .await
        .unwrap();

    let statuses = runner.status(&mut adapter, &migrations).await.unwrap();
    assert_eq!(statuses.len(), 2);
    assert!(statuses[0].applied);
    assert!(!statuses[1].applied);
}
