//! Teleplay main entry point
//!
//! Command-line interface for the show/writer network mapper.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use teleplay::config::{load_config, Config};
use teleplay::crawler::expand_network;
use teleplay::enrich::enrich_writer_details;
use teleplay::output::{load_statistics, print_statistics, print_summary};
use teleplay::scrape::ImdbScraper;
use teleplay::storage::SqliteStore;
use tracing_subscriber::EnvFilter;

/// Teleplay: a TV-show / writer network mapper
///
/// Teleplay crawls a public content site to build a graph of television
/// shows and their writers, expanding outward from what is already stored
/// by following prolific writers to shows not yet visited.
#[derive(Parser, Debug)]
#[command(name = "teleplay")]
#[command(version = "1.0.0")]
#[command(about = "A TV-show / writer network mapper", long_about = None)]
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

    /// Override the configured show target for this run
    #[arg(long, value_name = "N")]
    target_shows: Option<u32>,

    /// Override the configured episode threshold for this run
    #[arg(long, value_name = "N")]
    min_episodes: Option<u32>,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["enrich", "serve", "dry_run"])]
    stats: bool,

    /// Fetch missing writer images and bios instead of crawling
    #[arg(long, conflicts_with_all = ["stats", "serve", "dry_run"])]
    enrich: bool,

    /// Serve the stored graph as a read-only JSON API
    #[arg(long, conflicts_with_all = ["stats", "enrich", "dry_run"])]
    serve: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["stats", "enrich", "serve"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(target) = cli.target_shows {
        config.crawl.target_shows = target;
    }
    if let Some(min) = cli.min_episodes {
        config.crawl.min_episodes = min;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.enrich {
        handle_enrich(&config).await?;
    } else if cli.serve {
        handle_serve(&config).await?;
    } else {
        handle_expand(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("teleplay=info,warn"),
            1 => EnvFilter::new("teleplay=debug,info"),
            2 => EnvFilter::new("teleplay=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the run plan
fn handle_dry_run(config: &Config) {
    println!("=== Teleplay Dry Run ===\n");

    println!("Crawl:");
    println!("  Target shows: {}", config.crawl.target_shows);
    println!("  Minimum episodes: {}", config.crawl.min_episodes);
    println!("  Max iterations: {}", config.crawl.max_iterations);
    println!("  Request delay: {}ms", config.crawl.request_delay_ms);

    println!("\nSource:");
    println!("  Base URL: {}", config.source.base_url);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nEnrichment:");
    println!("  Bio length: {} chars", config.enrich.bio_max_chars);

    println!("\nAPI:");
    println!("  Bind address: {}", config.api.bind_address);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::open(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;

    print_statistics(&stats);

    Ok(())
}

/// Handles the --enrich mode: fetches missing writer details
async fn handle_enrich(config: &Config) -> Result<()> {
    let store = SqliteStore::open(Path::new(&config.output.database_path))?;
    let scraper = ImdbScraper::new(&config.source, &config.user_agent)?;

    let report = enrich_writer_details(&store, &scraper, &config.enrich).await?;

    println!("=== Enrichment Complete ===\n");
    println!("Processed: {} writers", report.processed);
    println!("Updated: {} writers", report.updated);
    println!("Images found: {}", report.images_found);
    println!("Bios found: {}", report.bios_found);

    Ok(())
}

/// Handles the --serve mode: runs the read-only JSON API
async fn handle_serve(config: &Config) -> Result<()> {
    let store = SqliteStore::open(Path::new(&config.output.database_path))?;

    teleplay::api::serve(store, &config.api).await?;

    Ok(())
}

/// Handles the main graph expansion crawl
async fn handle_expand(config: &Config) -> Result<()> {
    tracing::info!(
        "Expanding network: target {} shows, {}+ episode credits",
        config.crawl.target_shows,
        config.crawl.min_episodes
    );

    let store = SqliteStore::open(Path::new(&config.output.database_path))?;
    let scraper = ImdbScraper::new(&config.source, &config.user_agent)?;

    let summary = expand_network(&store, &scraper, &config.crawl).await?;

    print_summary(&summary);

    Ok(())
}
