//! Reconciliation of a fresh crawl against the store
//!
//! One reconciliation is one exclusive transaction:
//! 1. Stored identities missing from the crawl are deleted from `items` and
//!    written to the `history` ledger
//! 2. Crawled identities already stored are left untouched
//! 3. Crawled identities that are new are inserted, unless the ledger already
//!    holds them
//!
//! Any failure drops the transaction, which rolls back every change.

use crate::model::{format_timestamp, Record};
use crate::storage::{initialize_schema, SqliteStore, StorageResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::fmt;

/// Outcome of one reconciliation, by identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Crawled and already stored; no change
    pub kept: Vec<String>,

    /// Stored but no longer crawled; deleted and ledgered
    pub removed: Vec<String>,

    /// Newly inserted
    pub added: Vec<String>,

    /// New to `items` but present in the ledger; not inserted
    pub suppressed: Vec<String>,
}

impl ReconcileReport {
    /// Checks whether the reconciliation changed the store
    pub fn has_changes(&self) -> bool {
        !self.removed.is_empty() || !self.added.is_empty()
    }

    /// Rows inserted into `items`
    pub fn inserts(&self) -> usize {
        self.added.len()
    }

    /// Rows deleted from `items`
    pub fn deletes(&self) -> usize {
        self.removed.len()
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kept, {} removed, {} added, {} suppressed",
            self.kept.len(),
            self.removed.len(),
            self.added.len(),
            self.suppressed.len()
        )
    }
}

/// Brings the store's current items into agreement with `crawled`
///
/// Runs inside an exclusive transaction, so concurrent reconciliations
/// against the same database are serialized. Either every change commits or
/// none does.
pub fn reconcile(store: &mut SqliteStore, crawled: &[Record]) -> StorageResult<ReconcileReport> {
    reconcile_at(store, crawled, Utc::now())
}

/// Same as [`reconcile`], stamping ledger entries with `retired_at`
pub fn reconcile_at(
    store: &mut SqliteStore,
    crawled: &[Record],
    retired_at: DateTime<Utc>,
) -> StorageResult<ReconcileReport> {
    tracing::info!("Starting database transaction...");
    let tx = store.begin_exclusive()?;

    initialize_schema(&tx)?;
    let report = apply(&tx, crawled, retired_at)?;

    tx.commit()?;
    tracing::info!("Reconciliation committed: {}", report);
    Ok(report)
}

fn apply(
    conn: &Connection,
    crawled: &[Record],
    retired_at: DateTime<Utc>,
) -> StorageResult<ReconcileReport> {
    let mut report = ReconcileReport::default();

    let mut pending: HashSet<&str> = crawled
        .iter()
        .map(|record| record.identity.as_str())
        .filter(|identity| !identity.is_empty())
        .collect();
    tracing::info!("Found {} identities from crawling", pending.len());

    let mut select = conn.prepare("SELECT identity FROM items")?;
    let stored = select
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for identity in stored {
        if pending.remove(identity.as_str()) {
            tracing::debug!("Index already contains {}", identity);
            report.kept.push(identity);
        } else {
            tracing::info!("Obsolete entry {} will be retired", identity);
            report.removed.push(identity);
        }
    }

    retire(conn, &report.removed, retired_at)?;

    let mut ledger_lookup = conn.prepare("SELECT 1 FROM history WHERE identity = ?1")?;
    let mut insert = conn.prepare(
        "INSERT INTO items
             (identity, created_at, rank, title, byline, link, review, price, image, synopsis)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;

    // Crawl order decides which record wins for a repeated identity
    for record in crawled {
        if !pending.remove(record.identity.as_str()) {
            continue;
        }

        if ledger_lookup.exists(params![record.identity])? {
            tracing::info!("{} is in the history and will be ignored", record.identity);
            report.suppressed.push(record.identity.clone());
            continue;
        }

        insert.execute(params![
            record.identity,
            format_timestamp(&record.created_at),
            record.rank,
            record.title,
            record.byline,
            record.link,
            record.review,
            record.price,
            record.image,
            record.synopsis,
        ])?;
        tracing::info!("Adding {}", record.identity);
        report.added.push(record.identity.clone());
    }

    Ok(report)
}

/// Deletes retired identities from `items` and records them in `history`
///
/// An identity that is somehow already ledgered keeps its first retirement
/// time.
fn retire(
    conn: &Connection,
    identities: &[String],
    retired_at: DateTime<Utc>,
) -> StorageResult<()> {
    if identities.is_empty() {
        return Ok(());
    }

    tracing::info!("Removing {} old items from index...", identities.len());
    let retired_at = format_timestamp(&retired_at);

    let mut delete = conn.prepare("DELETE FROM items WHERE identity = ?1")?;
    let mut ledger = conn.prepare(
        "INSERT INTO history (identity, retired_at) VALUES (?1, ?2)
         ON CONFLICT(identity) DO NOTHING",
    )?;

    for identity in identities {
        delete.execute(params![identity])?;
        ledger.execute(params![identity, retired_at])?;
    }

    Ok(())
}
