//! Strategy waterfall orchestration
//!
//! This module runs one extraction from a listing URL:
//! - Tries the strategies in ascending cost (API, HTML, JSON-LD, browser)
//! - Continues with browser or HTTP pagination
//! - Deduplicates, optionally enriches, and normalizes the result

use crate::browser::{BrowserSession, CapturedResponse};
use crate::config::Config;
use crate::crawler::dedup::{deduplicate, normalize};
use crate::crawler::enricher::DetailEnricher;
use crate::crawler::paginator::Paginator;
use crate::crawler::state::RunState;
use crate::extract::{
    extract_from_api, extract_jobs_from_json, extract_structured_jobs, ExtractionMethod,
    HtmlExtractor, JobPosting,
};
use crate::fetch::{FetchResult, HttpFetcher};
use url::Url;

/// Result of a full extraction run
#[derive(Debug)]
pub struct RunOutcome {
    pub jobs: Vec<JobPosting>,
    /// Winning strategy, or None when every strategy came back empty
    pub method: Option<ExtractionMethod>,
    pub pages_processed: usize,
    pub detail_pages_fetched: usize,
}

/// Where pagination picks up after the initial strategy
enum Continuation {
    /// Continue over HTTP from this page
    Http { url: Url, html: Option<String> },
    /// The browser already walked the listing
    Done,
}

/// Runs the extraction waterfall
///
/// The browser session is a single serialized resource owned here and used
/// through `&mut`.
pub struct Orchestrator {
    config: Config,
    fetcher: HttpFetcher,
    browser: Option<Box<dyn BrowserSession>>,
    html: HtmlExtractor,
}

impl Orchestrator {
    /// Creates an orchestrator
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `fetcher` - HTTP client, already routed through the run's proxy
    /// * `browser` - Optional rendering session used as the last strategy
    pub fn new(
        config: Config,
        fetcher: HttpFetcher,
        browser: Option<Box<dyn BrowserSession>>,
    ) -> Self {
        Self {
            config,
            fetcher,
            browser,
            html: HtmlExtractor::new(),
        }
    }

    /// Runs every phase against `listing`
    pub async fn run(&mut self, listing: &Url) -> RunOutcome {
        let max_jobs = self.config.effective_max_jobs();
        tracing::info!("Extracting up to {} jobs from {}", max_jobs, listing);

        let mut state = RunState::new(listing.clone());
        state.mark_visited(listing);

        let continuation = match self.initial_strategies(&mut state, listing).await {
            Some(continuation) => continuation,
            None => {
                tracing::warn!("No strategy produced jobs for {}", listing);
                return RunOutcome {
                    jobs: Vec::new(),
                    method: None,
                    pages_processed: state.pages_processed,
                    detail_pages_fetched: 0,
                };
            }
        };

        if let Continuation::Http { url, html } = continuation {
            let paginator = Paginator::new(
                &self.fetcher,
                &self.html,
                &self.config.pagination.page_param,
                self.config.pagination.max_pages,
                max_jobs,
            );
            let (paginated, _) = paginator.paginate(state, url, html).await;
            state = paginated;
        }

        let method = state.method;
        let pages_processed = state.pages_processed;
        let base = state.base().clone();

        let jobs = deduplicate(
            state.into_jobs(),
            &base,
            max_jobs,
            self.config.search.job_type.as_deref(),
        );
        tracing::info!("{} unique jobs after deduplication", jobs.len());

        let (jobs, detail_pages_fetched) = if self.config.enrichment_requested() {
            let enricher = DetailEnricher::new(
                self.fetcher.clone(),
                self.config.enrichment.concurrency,
                self.config.search.include_full_description,
            );
            enricher.enrich(jobs).await
        } else {
            (jobs, 0)
        };

        RunOutcome {
            jobs: normalize(jobs),
            method,
            pages_processed,
            detail_pages_fetched,
        }
    }

    /// Tries each strategy until one yields jobs
    ///
    /// Returns None when all of them came back empty.
    async fn initial_strategies(&mut self, state: &mut RunState, listing: &Url) -> Option<Continuation> {
        tracing::info!("Trying strategy: {}", ExtractionMethod::Api);
        let api = extract_from_api(&self.fetcher, listing).await;
        if !api.is_empty() {
            accept_initial(state, api.method, api.jobs);
            return Some(Continuation::Http {
                url: listing.clone(),
                html: None,
            });
        }

        tracing::info!("Trying strategy: {}", ExtractionMethod::Html);
        match self.fetcher.fetch(listing.as_str(), self.fetcher.listing_options()).await {
            FetchResult::Success { body, .. } => {
                let (method, jobs) = self.scan_listing(&body, listing);
                if !jobs.is_empty() {
                    accept_initial(state, method, jobs);
                    return Some(Continuation::Http {
                        url: listing.clone(),
                        html: Some(body),
                    });
                }
                tracing::info!("Listing page had no HTML cards or JSON-LD jobs");
            }
            failure => {
                tracing::warn!(
                    "Listing fetch failed ({}), falling back to browser",
                    failure.describe_failure()
                );
            }
        }

        self.browser_strategy(state, listing).await
    }

    /// HTML cards first, then JSON-LD, over one fetched page
    fn scan_listing(&self, body: &str, listing: &Url) -> (ExtractionMethod, Vec<JobPosting>) {
        let jobs = self.html.extract(body, listing);
        if !jobs.is_empty() {
            return (ExtractionMethod::Html, jobs);
        }

        tracing::info!("Trying strategy: {}", ExtractionMethod::JsonLd);
        (ExtractionMethod::JsonLd, extract_structured_jobs(body))
    }

    async fn browser_strategy(&mut self, state: &mut RunState, listing: &Url) -> Option<Continuation> {
        let Some(browser) = self.browser.as_mut() else {
            tracing::warn!("No browser session configured, skipping browser strategy");
            return None;
        };

        tracing::info!("Trying strategy: browser");
        let page = match browser.render(listing.as_str()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Browser render failed: {}", e);
                return None;
            }
        };

        let captured = browser.take_captured();
        let (method, jobs) = scan_rendered(&self.html, captured, &page.html, listing);
        if jobs.is_empty() {
            tracing::info!("Rendered page had no jobs");
            return None;
        }
        accept_initial(state, method, jobs);

        let max_jobs = self.config.effective_max_jobs();
        let max_pages = self.config.browser.max_pages;
        let mut clicks = 0;
        let mut hit_limit = false;

        loop {
            if state.unique_jobs() >= max_jobs || state.pages_processed >= max_pages {
                hit_limit = true;
                break;
            }

            match browser.click_next().await {
                Ok(true) => clicks += 1,
                Ok(false) => break,
                Err(e) => {
                    tracing::warn!("Browser pagination click failed: {}", e);
                    break;
                }
            }

            let html = match browser.content().await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Could not read browser page after click: {}", e);
                    break;
                }
            };

            let captured = browser.take_captured();
            let (_, jobs) = scan_rendered(&self.html, captured, &html, listing);
            if jobs.is_empty() {
                break;
            }

            state.pages_processed += 1;
            let added = state.add_jobs(jobs);
            tracing::info!(
                "Browser page {}: {} new jobs ({} unique total)",
                state.pages_processed,
                added,
                state.unique_jobs()
            );
            if added == 0 {
                break;
            }
        }

        if clicks > 0 || hit_limit {
            tracing::info!("Browser pagination completed after {} clicks", clicks);
            return Some(Continuation::Done);
        }

        // Reuse the session that got past the bot check
        let cookie_url = Url::parse(&page.final_url).unwrap_or_else(|_| listing.clone());
        self.fetcher.seed_cookies(&page.cookies, &cookie_url);

        Some(Continuation::Http {
            url: listing.clone(),
            html: Some(page.html),
        })
    }
}

fn accept_initial(state: &mut RunState, method: ExtractionMethod, jobs: Vec<JobPosting>) {
    tracing::info!("Strategy {} yielded {} jobs", method, jobs.len());
    state.method = Some(method);
    state.add_jobs(jobs);
    state.pages_processed = 1;
}

/// Captured JSON first, then JSON-LD, then HTML cards
fn scan_rendered(
    html: &HtmlExtractor,
    captured: Vec<CapturedResponse>,
    page_html: &str,
    page_url: &Url,
) -> (ExtractionMethod, Vec<JobPosting>) {
    let jobs: Vec<_> = captured
        .iter()
        .flat_map(|response| extract_jobs_from_json(&response.body))
        .collect();
    if !jobs.is_empty() {
        return (ExtractionMethod::BrowserApi, jobs);
    }

    let jobs = extract_structured_jobs(page_html);
    if !jobs.is_empty() {
        return (ExtractionMethod::BrowserJsonLd, jobs);
    }

    (ExtractionMethod::BrowserHtml, html.extract(page_html, page_url))
}
