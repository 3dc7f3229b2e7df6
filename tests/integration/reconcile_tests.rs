//! Integration tests for reconciliation against a database file
//!
//! These tests open several store handles on the same file to check that
//! reconciliations exclude each other and that the ledger survives reopening.

use chrono::{Duration as ChronoDuration, Utc};
use shelf_feed::model::Record;
use shelf_feed::reconcile::reconcile;
use shelf_feed::storage::{SqliteStore, StorageError, Store};
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn records(identities: &[&str]) -> Vec<Record> {
    let now = Utc::now();
    identities
        .iter()
        .enumerate()
        .map(|(i, identity)| Record {
            identity: identity.to_string(),
            rank: format!("{}.", i + 1),
            title: format!("Title {}", identity),
            byline: String::new(),
            link: String::new(),
            review: String::new(),
            price: String::new(),
            image: String::new(),
            synopsis: String::new(),
            created_at: now - ChronoDuration::seconds(i as i64),
        })
        .collect()
}

fn open(path: &Path, lock_timeout: Duration) -> SqliteStore {
    SqliteStore::open(path, lock_timeout).expect("Failed to open store")
}

#[test]
fn test_ledger_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shelf.db");

    {
        let mut store = open(&path, Duration::from_secs(1));
        reconcile(&mut store, &records(&["A", "B", "C"])).unwrap();
        reconcile(&mut store, &records(&["B", "C"])).unwrap();
    }

    let mut store = open(&path, Duration::from_secs(1));
    assert!(store.is_retired("A").unwrap());

    let report = reconcile(&mut store, &records(&["A", "B", "C", "D"])).unwrap();
    assert_eq!(report.suppressed, vec!["A"]);
    assert_eq!(report.added, vec!["D"]);
    assert_eq!(store.count_items().unwrap(), 3);
}

#[test]
fn test_reconcile_fails_while_another_holds_the_lock() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shelf.db");

    let mut holder = open(&path, Duration::from_secs(1));
    let mut contender = open(&path, Duration::from_millis(200));

    {
        let _lock = holder.begin_exclusive().unwrap();
        let started = Instant::now();
        let result = reconcile(&mut contender, &records(&["A"]));

        // Gave up only after waiting out its lock timeout
        assert!(started.elapsed() >= Duration::from_millis(150));
        assert!(matches!(result, Err(StorageError::Sqlite(_))));
    }

    // Lock released: nothing from the failed attempt was written
    assert_eq!(contender.count_items().unwrap(), 0);
    let report = reconcile(&mut contender, &records(&["A"])).unwrap();
    assert_eq!(report.added, vec!["A"]);
}

#[test]
fn test_second_reconcile_waits_for_the_first() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shelf.db");
    let mut waiter = open(&path, Duration::from_secs(10));

    let holder_path = path.clone();
    let (locked_tx, locked_rx) = std::sync::mpsc::channel();
    let holder = std::thread::spawn(move || {
        let mut store = open(&holder_path, Duration::from_secs(1));
        let tx = store.begin_exclusive().unwrap();
        tx.execute(
            "INSERT INTO items (identity, created_at)
             VALUES ('FIRST', '2026-10-16T12:00:00.000000Z')",
            [],
        )
        .unwrap();
        locked_tx.send(()).unwrap();
        std::thread::sleep(Duration::from_millis(300));
        tx.commit().unwrap();
    });

    locked_rx.recv().unwrap();
    let started = Instant::now();
    let report = reconcile(&mut waiter, &records(&["SECOND"])).unwrap();
    assert!(started.elapsed() >= Duration::from_millis(200));
    holder.join().unwrap();

    // The waiter saw the committed row and retired it
    assert_eq!(report.removed, vec!["FIRST"]);
    assert_eq!(report.added, vec!["SECOND"]);
    assert!(waiter.is_retired("FIRST").unwrap());
}
