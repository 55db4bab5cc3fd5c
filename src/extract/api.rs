//! Speculative direct-API extraction
//!
//! Guesses a handful of JSON endpoints from the listing URL and scans whatever
//! comes back for job records. None of these endpoints is guaranteed to exist;
//! a miss on every candidate simply hands control to the next strategy.

use crate::extract::json_scan::extract_jobs_from_json;
use crate::extract::types::{ExtractionMethod, ExtractionResult};
use crate::fetch::{FetchResult, HttpFetcher};
use crate::url::origin_root;
use url::Url;

/// Listing path segment that carries the search keyword
const SEARCH_SEGMENT: &str = "/empleos-de-";

/// Builds the ordered list of candidate API URLs for a listing URL
///
/// 1. `/empleos-de-<q>` → `/api/search?q=<q>&limit=100` (only when the segment exists)
/// 2. the listing URL with `format=json` appended to its query
/// 3. `<origin>/api/jobs`
///
/// ```
/// use job_cascade::extract::api_candidates;
/// use url::Url;
///
/// let listing = Url::parse("https://ar.computrabajo.com/empleos-de-ventas").unwrap();
/// let candidates = api_candidates(&listing);
/// assert_eq!(candidates[0].as_str(), "https://ar.computrabajo.com/api/search?q=ventas&limit=100");
/// assert_eq!(candidates.len(), 3);
/// ```
pub fn api_candidates(listing: &Url) -> Vec<Url> {
    let mut candidates = Vec::with_capacity(3);
    let origin = origin_root(listing);

    if let Some(idx) = listing.path().find(SEARCH_SEGMENT) {
        let keyword = &listing.path()[idx + SEARCH_SEGMENT.len()..];
        let keyword = keyword.trim_end_matches('/');
        if !keyword.is_empty() {
            if let Ok(mut search) = origin.join("/api/search") {
                search
                    .query_pairs_mut()
                    .append_pair("q", keyword)
                    .append_pair("limit", "100");
                candidates.push(search);
            }
        }
    }

    let mut formatted = listing.clone();
    formatted.set_fragment(None);
    formatted.query_pairs_mut().append_pair("format", "json");
    candidates.push(formatted);

    if let Ok(well_known) = origin.join("/api/jobs") {
        candidates.push(well_known);
    }

    candidates
}

/// Tries each candidate endpoint in order; the first with ≥1 job wins
///
/// Every failure (non-200, timeout, unparsable JSON, no job arrays) is logged
/// and moves on to the next candidate.
pub async fn extract_from_api(fetcher: &HttpFetcher, listing: &Url) -> ExtractionResult {
    for candidate in api_candidates(listing) {
        tracing::debug!("Probing API candidate {}", candidate);

        let body = match fetcher.fetch(candidate.as_str(), fetcher.api_options()).await {
            FetchResult::Success { body, .. } => body,
            failure => {
                tracing::debug!("API candidate {} failed: {}", candidate, failure.describe_failure());
                continue;
            }
        };

        let payload = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!("API candidate {} returned non-JSON body: {}", candidate, e);
                continue;
            }
        };

        let jobs = extract_jobs_from_json(&payload);
        if !jobs.is_empty() {
            tracing::info!("API candidate {} yielded {} jobs", candidate, jobs.len());
            return ExtractionResult::new(ExtractionMethod::Api, jobs);
        }
    }

    ExtractionResult::empty(ExtractionMethod::Api)
}
