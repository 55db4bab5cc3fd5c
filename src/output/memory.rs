//! In-memory output store

use crate::extract::JobPosting;
use crate::output::traits::{DatasetSink, KeyValueStore, OutputResult};
use std::collections::HashMap;

/// Dataset sink and key-value store held in memory
#[derive(Debug, Default)]
pub struct MemoryOutput {
    pub items: Vec<JobPosting>,
    /// Size of every batch received, in order
    pub batches: Vec<usize>,
    pub values: HashMap<String, serde_json::Value>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetSink for MemoryOutput {
    fn push_batch(&mut self, jobs: &[JobPosting]) -> OutputResult<()> {
        self.batches.push(jobs.len());
        self.items.extend_from_slice(jobs);
        Ok(())
    }

    fn item_count(&self) -> OutputResult<usize> {
        Ok(self.items.len())
    }
}

impl KeyValueStore for MemoryOutput {
    fn set_value(&mut self, key: &str, value: &serde_json::Value) -> OutputResult<()> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn get_value(&self, key: &str) -> OutputResult<Option<serde_json::Value>> {
        Ok(self.values.get(key).cloned())
    }
}
