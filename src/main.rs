//! Contact-Scout main entry point
//!
//! This is the command-line interface for the Contact-Scout enrichment
//! crawler.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use contact_scout::config::{load_config_with_hash, Config};
use contact_scout::crawler::{extract_contact_info, process_batches, ContactScraper, SiteCrawler};
use contact_scout::model::{EnrichedItem, Item};
use contact_scout::output::{
    format_run_markdown, print_statistics, Notifier, RunStats, WebhookNotifier,
};
use contact_scout::storage::{SqliteStore, StateStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Contact-Scout: contact enrichment for product websites
///
/// Crawls each website for emails, social profiles, and contact and about
/// pages, then prints, stores or posts the results.
#[derive(Parser, Debug)]
#[command(name = "contact-scout")]
#[command(version = "1.0.0")]
#[command(about = "Contact enrichment crawler for product websites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply without one)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Crawl a single website
    #[arg(long, value_name = "URL", conflicts_with = "input")]
    url: Option<String>,

    /// JSON file holding an array of items ({ "id", "name", "website", ... })
    #[arg(long, value_name = "ITEMS.json")]
    input: Option<PathBuf>,

    /// Crawl one item at a time instead of in concurrent batches
    #[arg(long)]
    sequential: bool,

    /// Maximum number of websites to crawl in sequential mode
    #[arg(long, value_name = "N", requires = "sequential")]
    max: Option<usize>,

    /// Concurrent crawls per batch
    #[arg(long, value_name = "N", conflicts_with = "sequential")]
    concurrency: Option<usize>,

    /// Persist results and run statistics to the SQLite database
    #[arg(long)]
    store: bool,

    /// Post each result to the configured webhook
    #[arg(long)]
    notify: bool,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the latest stored run and exit
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.stats {
        return handle_stats(&config);
    }

    let items = load_items(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &cli, &items);
        return Ok(());
    }

    handle_enrich(config, &cli, items).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("contact_scout=info,warn"),
            1 => EnvFilter::new("contact_scout=debug,info"),
            2 => EnvFilter::new("contact_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout stays clean for results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the item list from `--url` or `--input`
fn load_items(cli: &Cli) -> anyhow::Result<Vec<Item>> {
    if let Some(url) = &cli.url {
        return Ok(vec![Item::new(url.clone(), url.clone(), Some(url.clone()))]);
    }

    let Some(path) = &cli.input else {
        bail!("either --url or --input is required");
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let items: Vec<Item> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of items", path.display()))?;

    tracing::info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

/// Handles the --dry-run mode: shows settings and the items that would be crawled
fn handle_dry_run(config: &Config, cli: &Cli, items: &[Item]) {
    println!("=== Contact-Scout Dry Run ===\n");

    println!("Batching:");
    if cli.sequential {
        println!("  Mode: sequential");
        println!("  Max crawls: {}", cli.max.unwrap_or(config.batch.max_count));
    } else {
        println!("  Mode: concurrent batches");
        println!(
            "  Concurrency: {}",
            cli.concurrency.unwrap_or(config.batch.concurrency_limit)
        );
        println!("  Delay between batches: {}ms", config.batch.delay_ms);
    }

    println!("\nTimeouts:");
    println!("  Main page: {}ms", config.timeouts.main_page);
    println!("  Secondary pages: {}ms", config.timeouts.secondary_page);
    println!("  Parse phase: {}ms", config.timeouts.parse_phase);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!(
        "  Webhook: {}",
        if config.notifier.webhook_url.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    println!("\nItems ({}):", items.len());
    for item in items {
        match item.website() {
            Some(website) => println!("  - {} -> {}", item.id, website),
            None => println!("  - {} (no website, skipped)", item.id),
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows the latest stored run
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}", config.output.database_path);

    let store = SqliteStore::new(Path::new(&config.output.database_path))?;
    println!("Stored items: {}", store.count_enriched_items()?);

    match store.get_latest_run()? {
        Some(run) => {
            println!("Latest run: #{} at {}", run.id, run.recorded_at.to_rfc3339());
            print_statistics(&run.stats);
        }
        None => println!("No runs recorded yet"),
    }

    Ok(())
}

/// Handles the main enrichment operation
async fn handle_enrich(config: Config, cli: &Cli, items: Vec<Item>) -> anyhow::Result<()> {
    let notifier = if cli.notify {
        match WebhookNotifier::from_config(&config.notifier)? {
            Some(notifier) => Some(notifier),
            None => bail!("--notify needs notifier.webhook-url in the configuration"),
        }
    } else {
        None
    };

    let mut store = if cli.store {
        Some(SqliteStore::new(Path::new(&config.output.database_path))?)
    } else {
        None
    };

    let scraper: Arc<dyn ContactScraper> = Arc::new(SiteCrawler::new(&config)?);
    let found = items.len();
    let started = Instant::now();

    let results = if cli.sequential {
        let max_count = cli.max.unwrap_or(config.batch.max_count);
        tracing::info!("Crawling up to {} sites sequentially", max_count);
        extract_contact_info(scraper, items, max_count).await
    } else {
        let limit = cli.concurrency.unwrap_or(config.batch.concurrency_limit);
        tracing::info!("Crawling {} items, {} at a time", found, limit);
        process_batches(
            scraper,
            items,
            limit,
            Duration::from_millis(config.batch.delay_ms),
        )
        .await
    };

    let stats = RunStats::from_results(found, &results, started.elapsed());

    if let Some(notifier) = &notifier {
        let mut sent = 0;
        for item in &results {
            if notifier.notify(item).await {
                sent += 1;
            }
        }
        tracing::info!("Sent {}/{} notifications", sent, results.len());
    }

    if let Some(store) = store.as_mut() {
        persist(store, &results, &stats)?;
    }

    print_results(&results, &stats, cli.format)?;
    Ok(())
}

fn persist(store: &mut SqliteStore, results: &[EnrichedItem], stats: &RunStats) -> anyhow::Result<()> {
    for item in results {
        store.save_enriched_item(item)?;
    }
    let run_id = store.record_run(stats)?;
    tracing::info!("Stored {} results as run #{}", results.len(), run_id);
    Ok(())
}

fn print_results(results: &[EnrichedItem], stats: &RunStats, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::Markdown => print!("{}", format_run_markdown(results, stats)),
    }
    Ok(())
}
