//! Job-Cascade main entry point
//!
//! This is the command-line interface for the Job-Cascade listing extractor.

use anyhow::Context;
use clap::Parser;
use job_cascade::config::{load_config_with_hash, validate, Config};
use job_cascade::crawler::{build_collaborators, harvest};
use job_cascade::extract::api_candidates;
use job_cascade::output::{load_statistics, print_statistics, SqliteOutput};
use job_cascade::proxy::{redact, ProxyRotation};
use job_cascade::url::build_search_url;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Job-Cascade: a waterfall job-listing extractor
///
/// Job-Cascade pulls job postings from a listing site by trying direct API
/// guesses, HTML cards, JSON-LD and finally a rendered browser page, then
/// follows pagination and stores deduplicated records in SQLite.
#[derive(Parser, Debug)]
#[command(name = "job-cascade")]
#[command(version = "1.0.0")]
#[command(about = "A waterfall job-listing extractor", long_about = None)]
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

    /// Validate config and show what would be fetched without fetching
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show the last run's statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_cascade=info,warn"),
            1 => EnvFilter::new("job_cascade=debug,info"),
            2 => EnvFilter::new("job_cascade=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    validate(config)?;
    let listing = build_search_url(&config.search)?;

    println!("=== Job-Cascade Dry Run ===\n");

    println!("Search:");
    println!("  Listing URL: {}", listing);
    println!("  Max jobs: {}", config.effective_max_jobs());
    if let Some(job_type) = config.search.job_type.as_deref().filter(|t| !t.is_empty()) {
        println!("  Job type filter: {}", job_type);
    }

    println!("\nAPI candidates:");
    for candidate in api_candidates(&listing) {
        println!("  - {}", candidate);
    }

    println!("\nPagination:");
    println!("  Max pages: {}", config.pagination.max_pages);
    println!("  Page parameter: {}", config.pagination.page_param);

    println!("\nEnrichment:");
    if config.enrichment_requested() {
        println!("  Enabled ({} workers)", config.enrichment.concurrency);
        println!("  Full descriptions: {}", config.search.include_full_description);
    } else {
        println!("  Disabled");
    }

    println!("\nProxies ({}):", config.proxy.urls.len());
    for proxy in &config.proxy.urls {
        println!("  - {}", redact(proxy));
    }

    println!("\nBrowser:");
    match config.browser.remote_url.as_deref().filter(|u| !u.is_empty()) {
        Some(remote) => println!("  Remote renderer: {} (max {} pages)", remote, config.browser.max_pages),
        None => println!("  None (browser strategy skipped)"),
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Batch size: {}", config.output.batch_size);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows the stored statistics record
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let output = SqliteOutput::new(Path::new(&config.output.database_path))
        .context("Failed to open output database")?;

    match load_statistics(&output)? {
        Some(stats) => print_statistics(&stats),
        None => println!("No statistics recorded yet"),
    }

    Ok(())
}

/// Handles the main extraction run
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    let proxies = ProxyRotation::new(config.proxy.urls.clone());
    let (fetcher, browser) = build_collaborators(&config, &proxies)?;

    let mut output = SqliteOutput::new(Path::new(&config.output.database_path))
        .context("Failed to open output database")?;

    match harvest(config, fetcher, browser, &mut output).await {
        Ok(stats) => {
            tracing::info!(
                "Run completed: {} jobs via {} in {:.2}s",
                stats.total_jobs,
                stats.extraction_method,
                stats.duration_seconds
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
