//! Extraction run orchestration
//!
//! This module contains the core extraction logic, including:
//! - The strategy waterfall and browser fallback
//! - Listing pagination
//! - Concurrent detail enrichment
//! - Deduplication and normalization
//! - Writing results and statistics to the output stores

pub mod dedup;
pub mod enricher;
mod orchestrator;
pub mod paginator;
pub mod state;

pub use dedup::{deduplicate, normalize, normalize_job};
pub use enricher::DetailEnricher;
pub use orchestrator::{Orchestrator, RunOutcome};
pub use paginator::{next_page_url, Paginator, StopReason};
pub use state::RunState;

use crate::browser::{BrowserSession, RemoteRenderSession};
use crate::config::{validate, Config};
use crate::fetch::HttpFetcher;
use crate::output::{save_statistics, write_in_batches, DatasetSink, KeyValueStore, RunStats, StatsCollector};
use crate::proxy::{redact, ProxyProvider};
use crate::url::build_search_url;
use crate::HarvestError;

/// Builds the HTTP fetcher and optional browser session for one run
///
/// A single proxy URL is drawn from `proxies` and applied to both.
pub fn build_collaborators(
    config: &Config,
    proxies: &dyn ProxyProvider,
) -> Result<(HttpFetcher, Option<Box<dyn BrowserSession>>), HarvestError> {
    let proxy = proxies.new_url();
    match proxy.as_deref() {
        Some(p) => tracing::info!("Routing through proxy {}", redact(p)),
        None => tracing::info!("No proxy configured, connecting directly"),
    }

    let fetcher = HttpFetcher::new(&config.http, proxy.as_deref())?;

    let browser = match config
        .browser
        .remote_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(remote) => {
            let token = config.browser.token.as_deref().filter(|t| !t.is_empty());
            let session = RemoteRenderSession::new(remote, token, proxy.as_deref())?;
            Some(Box::new(session) as Box<dyn BrowserSession>)
        }
        None => None,
    };

    Ok((fetcher, browser))
}

/// Runs a complete extraction
///
/// This is the main entry point. It will:
/// 1. Validate the configuration
/// 2. Build the listing URL
/// 3. Run the strategy waterfall, pagination and enrichment
/// 4. Write the jobs in batches to `output`
/// 5. Store the run statistics under `statistics`
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `fetcher` - HTTP client for listing, API and detail requests
/// * `browser` - Optional rendering session for the last strategy
/// * `output` - Dataset sink and key-value store
///
/// # Returns
///
/// * `Ok(RunStats)` - The stored statistics record
/// * `Err(HarvestError)` - Invalid configuration or an output failure
pub async fn harvest<O>(
    config: Config,
    fetcher: HttpFetcher,
    browser: Option<Box<dyn BrowserSession>>,
    output: &mut O,
) -> Result<RunStats, HarvestError>
where
    O: DatasetSink + KeyValueStore,
{
    validate(&config)?;

    let collector = StatsCollector::start();
    let listing = build_search_url(&config.search)?;
    let batch_size = config.output.batch_size;

    let mut orchestrator = Orchestrator::new(config, fetcher, browser);
    let outcome = orchestrator.run(&listing).await;

    let written = write_in_batches(&mut *output, &outcome.jobs, batch_size)?;
    tracing::info!("Stored {} jobs", written);

    let stats = collector.finish(
        outcome.method,
        outcome.pages_processed,
        written,
        outcome.detail_pages_fetched,
    );
    save_statistics(&mut *output, &stats)?;

    Ok(stats)
}
