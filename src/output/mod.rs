//! Output stores and run statistics
//!
//! This module handles:
//! - Appending job records to a batched dataset sink
//! - Storing the run statistics record in a key-value store
//! - Printing stored statistics

mod memory;
mod schema;
mod sqlite_output;
pub mod stats;
mod traits;

pub use memory::MemoryOutput;
pub use sqlite_output::SqliteOutput;
pub use stats::{
    load_statistics, print_statistics, save_statistics, RunStats, StatsCollector, STATISTICS_KEY,
};
pub use traits::{write_in_batches, DatasetSink, KeyValueStore, OutputError, OutputResult};
