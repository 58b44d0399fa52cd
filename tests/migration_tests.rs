use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempus::core::migration::{
    MigrationPhase, convert_legacy_store, convert_with, migration_status, prepare_store,
};
use tempus::core::paths::StorePaths;
use tempus::db::entries::load_report_rows;
use tempus::db::migrate::migrate_records;
use tempus::db::schema::create_schema;
use tempus::errors::{AppError, AppResult};
use tempus::legacy::{MemorySource, RecordSource};
use tempus::models::LegacyRecord;
use tempus::utils::duration::parse_duration;

mod common;
use common::{data_dir, list_dir, record, ten_records, write_legacy_store};

/// Yields its records, then fails on the call after the last one.
struct FailingSource {
    inner: MemorySource,
    left: usize,
}

impl RecordSource for FailingSource {
    fn next_record(&mut self) -> AppResult<Option<LegacyRecord>> {
        if self.left == 0 {
            return Err(AppError::LegacyStore("disk went away".to_string()));
        }
        self.left -= 1;
        self.inner.next_record()
    }
}

fn destination_rows(paths: &StorePaths) -> Vec<(String, String, String, String, i64, String)> {
    let conn = Connection::open(paths.destination()).unwrap();
    let mut stmt = conn
        .prepare(
            "SELECT date, entity, project, sub_project, duration, description \
             FROM tempus ORDER BY id",
        )
        .unwrap();
    stmt.query_map([], |r| {
        Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
    })
    .unwrap()
    .map(Result::unwrap)
    .collect()
}

fn snapshot(dir: &Path) -> Vec<(String, u64, std::time::SystemTime)> {
    list_dir(dir)
        .into_iter()
        .map(|name| {
            let meta = fs::metadata(dir.join(&name)).unwrap();
            (name, meta.len(), meta.modified().unwrap())
        })
        .collect()
}

#[test]
fn test_migration_copies_every_field() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());
    let records = ten_records();
    write_legacy_store(dir.path(), &records);

    let state = convert_legacy_store(&paths).unwrap();
    assert_eq!(state.phase, MigrationPhase::Promoted);
    assert!(state.legacy_found && state.migrated && state.backed_up);
    assert_eq!(state.records, 10);

    let rows = destination_rows(&paths);
    assert_eq!(rows.len(), records.len());

    // inserted in date order, one row per record
    let mut expected = records.clone();
    expected.sort_by(|a, b| a.date.cmp(&b.date));
    for (row, rec) in rows.iter().zip(&expected) {
        assert_eq!(row.0, rec.date);
        assert_eq!(row.1, rec.company);
        assert_eq!(row.2, rec.project);
        assert_eq!(row.3, rec.sub_project);
        assert_eq!(row.4, parse_duration(&rec.hours).unwrap());
        assert_eq!(row.5, rec.description);
    }
}

#[test]
fn test_migration_backs_up_legacy_store() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());
    let legacy = write_legacy_store(dir.path(), &ten_records());
    let original = fs::read(&legacy).unwrap();

    convert_legacy_store(&paths).unwrap();

    assert!(!paths.legacy().exists());
    assert!(!paths.staging().exists());
    assert!(paths.destination().exists());
    assert_eq!(fs::read(paths.backup()).unwrap(), original);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(paths.backup()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o400);
    }
}

#[test]
fn test_second_run_is_a_noop() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());
    write_legacy_store(dir.path(), &ten_records());

    let first = convert_legacy_store(&paths);
    assert_eq!(migration_status(&first), 0);

    let before = snapshot(dir.path());
    let second = convert_legacy_store(&paths);
    assert_eq!(migration_status(&second), 0);
    assert_eq!(second.unwrap().phase, MigrationPhase::NoOp);
    assert_eq!(snapshot(dir.path()), before);
    assert_eq!(destination_rows(&paths).len(), 10);
}

#[test]
fn test_failed_row_leaves_no_destination_and_legacy_intact() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());

    let mut records = ten_records();
    // 2020-03-03 is the third record in date order
    let third = records
        .iter_mut()
        .find(|r| r.date == "2020-03-03")
        .unwrap();
    third.hours = "three hours".to_string();

    let legacy = write_legacy_store(dir.path(), &records);
    let original = fs::read(&legacy).unwrap();

    let result = convert_legacy_store(&paths);
    assert_eq!(migration_status(&result), -1);
    assert!(matches!(result, Err(AppError::Transform { .. })));

    assert!(!paths.destination().exists());
    assert!(!paths.staging().exists());
    assert!(!paths.backup().exists());
    assert_eq!(fs::read(&legacy).unwrap(), original);
    assert_eq!(list_dir(dir.path()), ["tempus.tdb"]);
}

#[test]
fn test_failed_run_is_retried_next_launch() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());

    let mut records = ten_records();
    records[4].date = "2020-02-30".to_string();
    write_legacy_store(dir.path(), &records);
    assert!(convert_legacy_store(&paths).is_err());

    // the user repairs the store; the next launch converts it from scratch
    write_legacy_store(dir.path(), &ten_records());
    let state = convert_legacy_store(&paths).unwrap();
    assert_eq!(state.phase, MigrationPhase::Promoted);
    assert_eq!(destination_rows(&paths).len(), 10);
}

#[test]
fn test_fresh_install_creates_empty_store() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());

    let state = convert_legacy_store(&paths).unwrap();
    assert_eq!(state.phase, MigrationPhase::NoLegacyStore);
    assert!(!state.legacy_found);
    assert!(!state.backed_up);

    assert_eq!(list_dir(dir.path()), ["tempus.sqlite"]);
    assert!(destination_rows(&paths).is_empty());
}

#[test]
fn test_stale_staging_file_is_replaced() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());
    fs::write(paths.staging(), b"half-written garbage").unwrap();
    fs::write(paths.staging_journal(), b"stale journal").unwrap();
    write_legacy_store(dir.path(), &ten_records());

    convert_legacy_store(&paths).unwrap();

    assert!(!paths.staging().exists());
    assert!(!paths.staging_journal().exists());
    assert_eq!(destination_rows(&paths).len(), 10);
}

#[test]
fn test_unremovable_staging_aborts_before_touching_legacy() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());
    fs::create_dir(paths.staging()).unwrap();
    let legacy = write_legacy_store(dir.path(), &ten_records());
    let original = fs::read(&legacy).unwrap();

    let result = convert_legacy_store(&paths);
    assert!(matches!(result, Err(AppError::Filesystem(_))));
    assert!(!paths.destination().exists());
    assert_eq!(fs::read(&legacy).unwrap(), original);
}

#[test]
fn test_unreadable_legacy_store_fails_without_destination() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());
    fs::write(paths.legacy(), vec![0u8; 300]).unwrap();

    let result = convert_legacy_store(&paths);
    assert!(matches!(result, Err(AppError::LegacyStore(_))));
    assert_eq!(list_dir(dir.path()), ["tempus.tdb"]);
}

#[test]
fn test_injected_source_failure_discards_staging() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());

    let result = convert_with(&paths, |_| {
        Ok(Some(FailingSource {
            inner: MemorySource::new(ten_records()),
            left: 2,
        }))
    });

    assert_eq!(migration_status(&result), -1);
    assert!(list_dir(dir.path()).is_empty());
}

#[test]
fn test_injected_source_success_backs_up_legacy_file() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());
    fs::write(paths.legacy(), b"opaque legacy bytes").unwrap();

    let state = convert_with(&paths, |p| {
        assert_eq!(p, paths.legacy());
        Ok(Some(MemorySource::new(ten_records())))
    })
    .unwrap();

    assert_eq!(state.records, 10);
    assert_eq!(list_dir(dir.path()), ["tempus.sqlite", "tempus.tdb.bak"]);
}

#[test]
fn test_prepare_store_creates_data_dir() {
    let dir = data_dir();
    let nested = dir.path().join("share").join("tempus");

    let state = prepare_store(&nested).unwrap();
    assert_eq!(state.phase, MigrationPhase::NoLegacyStore);
    assert!(nested.join("tempus.sqlite").exists());
}

#[test]
fn test_prepare_store_reports_unusable_data_dir() {
    let dir = data_dir();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"").unwrap();

    let result = prepare_store(&blocker.join("tempus"));
    assert!(matches!(result, Err(AppError::Configuration(_))));
}

#[test]
fn test_migrate_records_rolls_back_on_bad_row() {
    let mut conn = Connection::open_in_memory().unwrap();
    create_schema(&conn).unwrap();

    let mut source = MemorySource::new(vec![
        record("a", "2021-01-01", "Acme", "Web", "FE", "01:00:00"),
        record("b", "2021-01-02", "Acme", "Web", "FE", "01:00:00"),
        record("c", "2021-01-03", "Acme", "Web", "FE", "1h"),
    ]);

    let err = migrate_records(&mut conn, &mut source).unwrap_err();
    match err {
        AppError::Transform { record, .. } => assert_eq!(record, "c"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(load_report_rows(&conn).unwrap().is_empty());
}

#[test]
fn test_create_schema_twice_is_a_schema_error() {
    let conn = Connection::open_in_memory().unwrap();
    create_schema(&conn).unwrap();
    assert!(matches!(create_schema(&conn), Err(AppError::Schema(_))));
}

#[test]
fn test_failed_insert_of_third_row_rolls_back() {
    let mut conn = Connection::open_in_memory().unwrap();
    create_schema(&conn).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER refuse_third BEFORE INSERT ON tempus \
         WHEN (SELECT count(*) FROM tempus) = 2 \
         BEGIN SELECT RAISE(ABORT, 'disk full'); END",
    )
    .unwrap();

    let mut source = MemorySource::new(ten_records());
    let err = migrate_records(&mut conn, &mut source).unwrap_err();
    match err {
        AppError::Transform { record, reason } => {
            // third record in date order is 2020-03-03
            assert_eq!(record, "c0ffee00-0000-4000-8000-000000000003");
            assert!(reason.contains("disk full"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(load_report_rows(&conn).unwrap().is_empty());
}

#[test]
fn test_backup_failure_keeps_promoted_store() {
    let dir = data_dir();
    let paths = StorePaths::new(dir.path());

    // records come from the injected source; there is no tempus.tdb to rename
    let result = convert_with(&paths, |_| Ok(Some(MemorySource::new(ten_records()))));
    assert_eq!(migration_status(&result), -1);
    assert!(matches!(result, Err(AppError::Filesystem(_))));

    assert_eq!(list_dir(dir.path()), ["tempus.sqlite"]);
    assert_eq!(destination_rows(&paths).len(), 10);

    let next = convert_legacy_store(&paths).unwrap();
    assert_eq!(next.phase, MigrationPhase::NoOp);
    assert_eq!(list_dir(dir.path()), ["tempus.sqlite"]);
}
