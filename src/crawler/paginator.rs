//! HTTP listing pagination
//!
//! Follows "next" links (or an incremented page parameter) from the first
//! listing page, extracting job cards from every page until a stop condition
//! is met.

use crate::crawler::state::RunState;
use crate::extract::HtmlExtractor;
use crate::fetch::{FetchResult, HttpFetcher};
use scraper::{Html, Selector};
use url::Url;

/// Known "next page" patterns, tried in order
const NEXT_PAGE_SELECTORS: &[&str] = &[
    r#"a[rel="next"]"#,
    r#"link[rel="next"]"#,
    "li.next a",
    "a.next",
    r#"a[title="Siguiente"]"#,
    r#"a[aria-label="Siguiente"]"#,
    r#"a[aria-label="Next"]"#,
    ".pagination a.next",
];

/// Why pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxJobs,
    MaxPages,
    NoNextPage,
    AlreadyVisited,
    EmptyPage,
    NoNewJobs,
    FetchFailed,
}

pub struct Paginator<'a> {
    fetcher: &'a HttpFetcher,
    extractor: &'a HtmlExtractor,
    page_param: &'a str,
    max_pages: usize,
    max_jobs: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(
        fetcher: &'a HttpFetcher,
        extractor: &'a HtmlExtractor,
        page_param: &'a str,
        max_pages: usize,
        max_jobs: usize,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            page_param,
            max_pages,
            max_jobs,
        }
    }

    /// Walks the listing pages following `start_url`
    ///
    /// # Arguments
    ///
    /// * `state` - Run state holding the jobs gathered so far
    /// * `start_url` - URL of the last page already processed
    /// * `start_html` - Its HTML, when available; without it only the page
    ///   parameter is incremented
    ///
    /// # Returns
    ///
    /// The updated state and the reason pagination stopped.
    pub async fn paginate(
        &self,
        mut state: RunState,
        start_url: Url,
        start_html: Option<String>,
    ) -> (RunState, StopReason) {
        let mut current_url = start_url;
        let mut current_html = start_html.unwrap_or_default();

        let reason = loop {
            if state.unique_jobs() >= self.max_jobs {
                break StopReason::MaxJobs;
            }
            if state.pages_processed >= self.max_pages {
                break StopReason::MaxPages;
            }

            let Some(next_url) = next_page_url(&current_html, &current_url, self.page_param) else {
                break StopReason::NoNextPage;
            };

            if !state.mark_visited(&next_url) {
                break StopReason::AlreadyVisited;
            }

            let (final_url, body) = match self
                .fetcher
                .fetch(next_url.as_str(), self.fetcher.page_options())
                .await
            {
                FetchResult::Success { final_url, body, .. } => (final_url, body),
                failure => {
                    tracing::warn!(
                        "Page {} failed ({}), stopping pagination",
                        next_url,
                        failure.describe_failure()
                    );
                    break StopReason::FetchFailed;
                }
            };

            // Redirects back to an already-seen page end the walk
            if let Ok(landed) = Url::parse(&final_url) {
                if landed != next_url && !state.mark_visited(&landed) {
                    break StopReason::AlreadyVisited;
                }
            }

            let jobs = self.extractor.extract(&body, &next_url);
            if jobs.is_empty() {
                break StopReason::EmptyPage;
            }

            let found = jobs.len();
            let added = state.add_jobs(jobs);
            state.pages_processed += 1;
            tracing::info!(
                "Page {}: {} jobs ({} new, {} unique total)",
                state.pages_processed,
                found,
                added,
                state.unique_jobs()
            );

            if added == 0 {
                break StopReason::NoNewJobs;
            }

            current_url = next_url;
            current_html = body;
        };

        tracing::info!("Pagination stopped: {:?}", reason);
        (state, reason)
    }
}

/// Determines the next listing page URL
///
/// Tries the known "next" patterns on the page first, then falls back to
/// incrementing `page_param` in the current URL.
pub fn next_page_url(html: &str, current: &Url, page_param: &str) -> Option<Url> {
    if !html.trim().is_empty() {
        let document = Html::parse_document(html);
        for pattern in NEXT_PAGE_SELECTORS {
            let Ok(selector) = Selector::parse(pattern) else {
                continue;
            };
            let found = document
                .select(&selector)
                .filter_map(|el| el.value().attr("href"))
                .find_map(|href| resolve_next_href(href, current));
            if found.is_some() {
                return found;
            }
        }
    }

    increment_page_param(current, page_param)
}

fn resolve_next_href(href: &str, current: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }
    let resolved = current.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}

/// Returns `current` with `page_param` set to its current value plus one
///
/// A missing or non-numeric parameter counts as page 1. Returns None when the
/// counter cannot be advanced.
pub fn increment_page_param(current: &Url, page_param: &str) -> Option<Url> {
    if page_param.is_empty() {
        return None;
    }

    let page: u64 = current
        .query_pairs()
        .find(|(k, _)| k == page_param)
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(1);

    let others: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(k, _)| k != page_param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let next_page = page.checked_add(1)?;

    let mut next = current.clone();
    next.set_fragment(None);
    next.query_pairs_mut()
        .clear()
        .extend_pairs(others)
        .append_pair(page_param, &next_page.to_string());
    Some(next)
}
