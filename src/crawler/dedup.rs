//! Deduplication and final-pass normalization
//!
//! - Dedup key is the canonical job URL; the first occurrence wins
//! - Jobs whose URL cannot be resolved are dropped
//! - Output is truncated to the requested maximum, in first-seen order
//! - The final pass fills every field with a value or the sentinel

use crate::extract::{escape_html, is_blank, strip_html, JobPosting, NOT_SPECIFIED};
use crate::url::canonicalize_url;
use std::collections::HashSet;
use url::Url;

/// Deduplicates `jobs` by canonical URL and truncates to `max`
///
/// Each kept job's `url` is replaced by its canonical form. When
/// `job_type_filter` is set, jobs with a known job type that does not contain
/// it (case-insensitive) are dropped before truncation.
pub fn deduplicate(
    jobs: Vec<JobPosting>,
    base: &Url,
    max: usize,
    job_type_filter: Option<&str>,
) -> Vec<JobPosting> {
    let filter = job_type_filter
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty());

    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for mut job in jobs {
        if kept.len() >= max {
            break;
        }

        let canonical = match canonicalize_url(&job.url, base) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::debug!("Dropping '{}': unusable URL '{}' ({})", job.title, job.url, e);
                continue;
            }
        };

        if !seen.insert(canonical.clone()) {
            continue;
        }

        if let Some(filter) = filter.as_deref() {
            if !matches_job_type(&job.job_type, filter) {
                continue;
            }
        }

        job.url = canonical;
        kept.push(job);
    }

    kept
}

/// Unknown job types always match
fn matches_job_type(job_type: &str, filter: &str) -> bool {
    is_blank(job_type) || job_type.to_lowercase().contains(filter)
}

/// Applies the final-pass guarantees to one job
pub fn normalize_job(job: &mut JobPosting) {
    for field in [
        &mut job.company,
        &mut job.location,
        &mut job.salary,
        &mut job.job_type,
    ] {
        if field.trim().is_empty() {
            *field = NOT_SPECIFIED.to_string();
        } else {
            *field = field.trim().to_string();
        }
    }

    let html = job.description_html.trim();
    let text = job.description_text.trim();

    if html.is_empty() {
        job.description_html = if text.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            format!("<p>{}</p>", escape_html(text))
        };
    }

    if job.description_text.trim().is_empty() && job.description_html != NOT_SPECIFIED {
        job.description_text = strip_html(&job.description_html);
    }
}

/// Applies [`normalize_job`] to every job
pub fn normalize(mut jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    jobs.iter_mut().for_each(normalize_job);
    jobs
}
