//! Detail page enrichment
//!
//! A fixed pool of workers fetches job detail pages concurrently. Workers
//! claim job indices from a shared atomic cursor, so each job is processed by
//! exactly one worker. A failed fetch leaves that job as it was.

use crate::extract::{DetailFields, DetailParser, JobPosting};
use crate::fetch::{FetchResult, HttpFetcher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Upper bound on concurrent detail fetches
pub const MAX_CONCURRENCY: usize = 10;

pub struct DetailEnricher {
    fetcher: HttpFetcher,
    parser: Arc<DetailParser>,
    concurrency: usize,
    include_description: bool,
}

impl DetailEnricher {
    pub fn new(fetcher: HttpFetcher, concurrency: usize, include_description: bool) -> Self {
        Self {
            fetcher,
            parser: Arc::new(DetailParser::new()),
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
            include_description,
        }
    }

    /// Enriches `jobs` from their detail pages
    ///
    /// # Returns
    ///
    /// The jobs in their original order, and the number of detail pages
    /// fetched successfully.
    pub async fn enrich(&self, jobs: Vec<JobPosting>) -> (Vec<JobPosting>, usize) {
        if jobs.is_empty() {
            return (jobs, 0);
        }

        let workers = self.concurrency.min(jobs.len());
        tracing::info!("Enriching {} jobs with {} workers", jobs.len(), workers);

        let source = Arc::new(jobs);
        let cursor = Arc::new(AtomicUsize::new(0));
        let mut pool = JoinSet::new();

        for _ in 0..workers {
            let source = Arc::clone(&source);
            let cursor = Arc::clone(&cursor);
            let parser = Arc::clone(&self.parser);
            let fetcher = self.fetcher.clone();

            pool.spawn(async move {
                let mut details = Vec::new();
                loop {
                    let index = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(job) = source.get(index) else {
                        break;
                    };
                    if let Some(detail) = fetch_detail(&fetcher, &parser, &job.url).await {
                        details.push((index, detail));
                    }
                }
                details
            });
        }

        let mut details = Vec::new();
        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(found) => details.extend(found),
                Err(e) => tracing::warn!("Enrichment worker failed: {}", e),
            }
        }

        // Every worker has finished, so this is the only reference left
        let mut jobs = Arc::try_unwrap(source).unwrap_or_else(|shared| (*shared).clone());

        let fetched = details.len();
        for (index, detail) in details {
            if let Some(job) = jobs.get_mut(index) {
                detail.merge_into(job, self.include_description);
            }
        }

        tracing::info!("Enrichment fetched {} of {} detail pages", fetched, jobs.len());
        (jobs, fetched)
    }
}

async fn fetch_detail(fetcher: &HttpFetcher, parser: &DetailParser, url: &str) -> Option<DetailFields> {
    if url.is_empty() {
        return None;
    }

    match fetcher.fetch(url, fetcher.page_options()).await {
        FetchResult::Success { body, .. } => Some(parser.parse(&body)),
        failure => {
            tracing::debug!("Detail page {} failed: {}", url, failure.describe_failure());
            None
        }
    }
}
