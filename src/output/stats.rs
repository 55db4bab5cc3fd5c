//! Run statistics
//!
//! One [`RunStats`] record is produced per run and stored under
//! [`STATISTICS_KEY`] in the key-value store.

use crate::extract::ExtractionMethod;
use crate::output::traits::{KeyValueStore, OutputResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Key the statistics record is stored under
pub const STATISTICS_KEY: &str = "statistics";

/// Label recorded when no strategy produced jobs
pub const NO_METHOD: &str = "None";

/// Immutable snapshot of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Winning strategy label, or `"None"`
    pub extraction_method: String,
    pub pages_processed: usize,
    pub total_jobs: usize,
    pub duration_seconds: f64,
    pub detail_pages_fetched: usize,
    pub started_at: DateTime<Utc>,
}

/// Tracks wall-clock timing for a run and assembles its [`RunStats`]
#[derive(Debug)]
pub struct StatsCollector {
    started_at: DateTime<Utc>,
    clock: Instant,
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::start()
    }
}

impl StatsCollector {
    /// Starts timing a run
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            clock: Instant::now(),
        }
    }

    /// Builds the final snapshot
    pub fn finish(
        &self,
        method: Option<ExtractionMethod>,
        pages_processed: usize,
        total_jobs: usize,
        detail_pages_fetched: usize,
    ) -> RunStats {
        let elapsed = self.clock.elapsed().as_secs_f64();
        RunStats {
            extraction_method: method
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| NO_METHOD.to_string()),
            pages_processed,
            total_jobs,
            duration_seconds: (elapsed * 100.0).round() / 100.0,
            detail_pages_fetched,
            started_at: self.started_at,
        }
    }
}

/// Stores `stats` under [`STATISTICS_KEY`]
pub fn save_statistics(store: &mut dyn KeyValueStore, stats: &RunStats) -> OutputResult<()> {
    let value = serde_json::to_value(stats)?;
    store.set_value(STATISTICS_KEY, &value)
}

/// Loads the last stored statistics record, if any
///
/// # Returns
///
/// * `Ok(Some(RunStats))` - A record was found
/// * `Ok(None)` - No run has stored statistics yet
/// * `Err(OutputError)` - The store failed or the record is malformed
pub fn load_statistics(store: &dyn KeyValueStore) -> OutputResult<Option<RunStats>> {
    match store.get_value(STATISTICS_KEY)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStats) {
    println!("=== Run Statistics ===\n");

    println!("Overview:");
    println!("  Started at: {}", stats.started_at.to_rfc3339());
    println!("  Duration: {:.2}s", stats.duration_seconds);
    println!("  Extraction method: {}", stats.extraction_method);
    println!();

    println!("Results:");
    println!("  Listing pages processed: {}", stats.pages_processed);
    println!("  Jobs stored: {}", stats.total_jobs);
    println!("  Detail pages fetched: {}", stats.detail_pages_fetched);

    if stats.duration_seconds > 0.0 {
        println!();
        println!(
            "Throughput: {:.2} jobs/s",
            stats.total_jobs as f64 / stats.duration_seconds
        );
    }
}
