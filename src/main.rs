//! Shelf-Feed main entry point
//!
//! This is the command-line interface for the Shelf-Feed listing harvester.

use anyhow::Context;
use clap::Parser;
use shelf_feed::config::{load_config_with_hash, Config};
use shelf_feed::crawler::crawl;
use shelf_feed::feed::{export_feed, load_statistics, print_statistics, write_feed};
use shelf_feed::reconcile::reconcile;
use shelf_feed::storage::open_store;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shelf-Feed: a ranked-listing harvester
///
/// Crawls the configured best-seller listing, reconciles it against the
/// store, and never re-publishes an item that has dropped off the list.
#[derive(Parser, Debug)]
#[command(name = "shelf-feed")]
#[command(version = "1.0.0")]
#[command(about = "A ranked-listing harvester with a retirement ledger", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl and print the records without touching the store
    #[arg(long, conflicts_with_all = ["list", "export_feed"])]
    dry_run: bool,

    /// Show the stored items in feed order and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_feed"])]
    list: bool,

    /// Write the stored items as RSS to PATH ("-" for stdout) and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "list"])]
    export_feed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config).await
    } else if cli.list {
        handle_list(&config)
    } else if let Some(path) = cli.export_feed.as_deref() {
        handle_export_feed(&config, path)
    } else {
        handle_run(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_feed=info,warn"),
            1 => EnvFilter::new("shelf_feed=debug,info"),
            2 => EnvFilter::new("shelf_feed=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so `--export-feed -` leaves stdout as pure RSS
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: crawls and prints what would be reconciled
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let records = crawl(config).await?;

    println!("=== Shelf-Feed Dry Run ===\n");
    println!(
        "Crawled {} records from {} page(s)\n",
        records.len(),
        config.source.pages
    );
    for record in &records {
        println!("{:>4} [{}] {}", record.rank, record.identity, record.title);
        println!("     {} | {} | {}", record.byline, record.review, record.price);
        println!("     {}", record.link);
    }

    Ok(())
}

/// Handles the --list mode: shows the store's current feed
fn handle_list(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let store = open_store(&config.storage).context("failed to open store")?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-feed mode: renders the stored items as RSS
fn handle_export_feed(config: &Config, path: &Path) -> anyhow::Result<()> {
    let store = open_store(&config.storage).context("failed to open store")?;

    if path == Path::new("-") {
        let count = write_feed(&store, &config.feed, &mut std::io::stdout().lock())?;
        tracing::debug!("Feed with {} items written to stdout", count);
    } else {
        let count = export_feed(&store, &config.feed, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Feed with {} items exported to: {}", count, path.display());
    }

    Ok(())
}

/// Handles the main operation: crawl, then reconcile
async fn handle_run(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Crawling pages...");
    let records = crawl(config).await?;
    tracing::info!("Crawling complete.");

    tracing::info!("Opening database {}", config.storage.database_path);
    let mut store = open_store(&config.storage).context("failed to open store")?;

    match reconcile(&mut store, &records) {
        Ok(report) => {
            if !report.has_changes() {
                tracing::info!("Feed unchanged");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Reconciliation rolled back: {}", e);
            Err(e.into())
        }
    }
}
