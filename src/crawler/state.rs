//! Cross-page run state
//!
//! [`RunState`] accumulates jobs across the strategy, pagination and
//! enrichment phases. The orchestrator owns it and hands it to the paginator
//! by value.

use crate::extract::{ExtractionMethod, JobPosting};
use crate::url::canonicalize_url;
use std::collections::HashSet;
use url::Url;

#[derive(Debug)]
pub struct RunState {
    /// Accumulated jobs in insertion order, duplicates included
    pub jobs: Vec<JobPosting>,
    /// Listing page URLs already fetched
    visited: HashSet<String>,
    /// Canonical job URLs seen so far
    seen: HashSet<String>,
    pub pages_processed: usize,
    pub method: Option<ExtractionMethod>,
    base: Url,
}

impl RunState {
    /// Creates an empty state; job URLs are canonicalized against `listing`
    pub fn new(listing: Url) -> Self {
        Self {
            jobs: Vec::new(),
            visited: HashSet::new(),
            seen: HashSet::new(),
            pages_processed: 0,
            method: None,
            base: listing,
        }
    }

    /// Marks a listing page as visited
    ///
    /// Returns false if it had already been visited.
    pub fn mark_visited(&mut self, page: &Url) -> bool {
        let mut key = page.clone();
        key.set_fragment(None);
        self.visited.insert(key.to_string())
    }

    pub fn is_visited(&self, page: &Url) -> bool {
        let mut key = page.clone();
        key.set_fragment(None);
        self.visited.contains(key.as_str())
    }

    /// Appends jobs and returns how many carried a canonical URL not seen before
    pub fn add_jobs(&mut self, jobs: Vec<JobPosting>) -> usize {
        let mut added = 0;
        for job in &jobs {
            if let Ok(canonical) = canonicalize_url(&job.url, &self.base) {
                if self.seen.insert(canonical.to_string()) {
                    added += 1;
                }
            }
        }
        self.jobs.extend(jobs);
        added
    }

    /// Number of distinct canonical job URLs accumulated
    pub fn unique_jobs(&self) -> usize {
        self.seen.len()
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Consumes the state, returning the accumulated jobs
    pub fn into_jobs(self) -> Vec<JobPosting> {
        self.jobs
    }
}
