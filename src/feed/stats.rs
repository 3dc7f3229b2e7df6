//! Store statistics for the command line

use crate::model::Record;
use crate::storage::{StorageResult, Store};

/// Snapshot of the store's contents
#[derive(Debug, Clone)]
pub struct FeedStatistics {
    /// Current items in feed order
    pub items: Vec<Record>,

    /// Number of retired identities in the ledger
    pub retired: u64,
}

/// Loads the current feed and ledger size from the store
pub fn load_statistics(store: &dyn Store) -> StorageResult<FeedStatistics> {
    Ok(FeedStatistics {
        items: store.load_items()?,
        retired: store.count_history()?,
    })
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &FeedStatistics) {
    println!("=== Shelf-Feed Store ===\n");
    println!("Current items: {}", stats.items.len());
    println!("Retired items: {}\n", stats.retired);

    for record in &stats.items {
        println!(
            "{:>4} {} [{}] {}",
            record.rank,
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            record.identity,
            record.title
        );
    }
}
