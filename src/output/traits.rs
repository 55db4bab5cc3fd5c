//! Output store traits and errors
//!
//! This module defines the two narrow interfaces the extractor writes to:
//! an append-only dataset of job records and a single-slot key-value store
//! for the run statistics.

use crate::extract::JobPosting;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only, batched sink for job records
pub trait DatasetSink {
    /// Appends a batch of records, preserving their order
    ///
    /// # Arguments
    ///
    /// * `jobs` - The records to append
    fn push_batch(&mut self, jobs: &[JobPosting]) -> OutputResult<()>;

    /// Number of records appended so far
    fn item_count(&self) -> OutputResult<usize>;
}

/// Single-slot key-value store
///
/// Setting a key replaces any previous value.
pub trait KeyValueStore {
    fn set_value(&mut self, key: &str, value: &serde_json::Value) -> OutputResult<()>;

    fn get_value(&self, key: &str) -> OutputResult<Option<serde_json::Value>>;
}

/// Writes `jobs` to `sink` in batches of at most `batch_size`
///
/// Batches already written stay written if a later batch fails.
pub fn write_in_batches(
    sink: &mut dyn DatasetSink,
    jobs: &[JobPosting],
    batch_size: usize,
) -> OutputResult<usize> {
    let batch_size = batch_size.max(1);
    let mut written = 0;

    for batch in jobs.chunks(batch_size) {
        sink.push_batch(batch)?;
        written += batch.len();
        tracing::debug!("Wrote batch of {} records ({} total)", batch.len(), written);
    }

    Ok(written)
}
