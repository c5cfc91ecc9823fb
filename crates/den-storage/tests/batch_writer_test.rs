//! BatchWriter: batch boundaries, crash safety, idempotent reruns, and
//! rollback of the failing batch only.

use den_core::errors::StorageError;
use den_core::types::{CatalogEntry, Extension};
use den_storage::queries::files;
use den_storage::{BatchWriter, CatalogStore, InsertOutcome};
use tempfile::tempdir;

fn entry(i: usize) -> CatalogEntry {
    CatalogEntry {
        path: format!("/root/file_{i:05}.txt"),
        size: i as i64,
        created_guess: 1_700_000_000,
        modified: 1_700_000_000,
        mime: "text/plain".to_string(),
        extension: Extension::Document,
    }
}

fn count(store: &CatalogStore) -> i64 {
    store.with_reader(files::count_files).unwrap()
}

#[test]
fn commits_at_cap_and_on_finish() {
    let store = CatalogStore::open_in_memory().unwrap();
    let mut writer = BatchWriter::new(&store, 1_000);
    for i in 0..2_500 {
        writer.insert(&entry(i)).unwrap();
    }
    assert_eq!(writer.pending(), 500);
    let stats = writer.finish().unwrap();

    assert_eq!(stats.inserted, 2_500);
    assert_eq!(stats.already_present, 0);
    assert_eq!(stats.batches_committed, 3);
    assert_eq!(count(&store), 2_500);
}

#[test]
fn crash_mid_run_keeps_committed_batches_and_rerun_completes() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("db.sqlite3");

    {
        let store = CatalogStore::open(&db_path).unwrap();
        let mut writer = BatchWriter::new(&store, 1_000);
        for i in 0..2_100 {
            writer.insert(&entry(i)).unwrap();
        }
        assert_eq!(writer.stats().batches_committed, 2);
        // Simulated crash: the writer goes away without finish().
        drop(writer);
    }

    let store = CatalogStore::open(&db_path).unwrap();
    assert_eq!(count(&store), 2_000);

    let mut writer = BatchWriter::new(&store, 1_000);
    for i in 0..2_500 {
        writer.insert(&entry(i)).unwrap();
    }
    let stats = writer.finish().unwrap();
    assert_eq!(stats.already_present, 2_000);
    assert_eq!(stats.inserted, 500);
    assert_eq!(count(&store), 2_500);
    assert_eq!(
        store
            .with_reader(|c| files::count_category(c, den_core::types::Category::Document))
            .unwrap(),
        2_500
    );
}

#[test]
fn second_run_reports_already_exists_for_every_entry() {
    let store = CatalogStore::open_in_memory().unwrap();
    for run in 0..2 {
        let mut writer = BatchWriter::new(&store, 7);
        for i in 0..20 {
            let outcome = writer.insert(&entry(i)).unwrap();
            if run == 1 {
                assert_eq!(outcome, InsertOutcome::AlreadyExists);
            }
        }
        writer.finish().unwrap();
    }
    assert_eq!(count(&store), 20);
}

#[test]
fn failing_insert_rolls_back_current_batch_only() {
    let store = CatalogStore::open_in_memory().unwrap();
    store
        .with_writer(|conn| {
            conn.execute_batch(
                "CREATE TEMP TRIGGER fail_on_poison BEFORE INSERT ON file
                 WHEN NEW.path = '/root/file_00015.txt'
                 BEGIN SELECT RAISE(ABORT, 'poisoned'); END;",
            )
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })
        })
        .unwrap();

    let mut writer = BatchWriter::new(&store, 10);
    let mut failure = None;
    for i in 0..20 {
        if let Err(e) = writer.insert(&entry(i)) {
            failure = Some(i);
            assert!(e.to_string().contains("poisoned"));
            break;
        }
    }
    assert_eq!(failure, Some(15));
    assert_eq!(writer.pending(), 0);
    assert_eq!(writer.stats().inserted, 10);
    drop(writer);

    // Batch one (0..10) committed, batch two (10..15) rolled back.
    assert_eq!(count(&store), 10);
}
