//! SQLite-backed output store
//!
//! Implements both output traits on a single database file:
//! - `dataset_items`: one JSON row per job, in insertion order
//! - `key_value`: the single-slot store holding run statistics

use crate::extract::JobPosting;
use crate::output::schema::initialize_schema;
use crate::output::traits::{DatasetSink, KeyValueStore, OutputResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite dataset sink and key-value store
pub struct SqliteOutput {
    conn: Connection,
}

impl SqliteOutput {
    /// Opens or creates the output database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteOutput)` - Successfully opened/created database
    /// * `Err(OutputError)` - Failed to open database
    pub fn new(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Loads every stored job, oldest first
    pub fn load_items(&self) -> OutputResult<Vec<JobPosting>> {
        let mut stmt = self
            .conn
            .prepare("SELECT data FROM dataset_items ORDER BY id ASC")?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut jobs = Vec::new();
        for row in rows {
            jobs.push(serde_json::from_str(&row?)?);
        }
        Ok(jobs)
    }
}

impl DatasetSink for SqliteOutput {
    fn push_batch(&mut self, jobs: &[JobPosting]) -> OutputResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO dataset_items (url, title, data, stored_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for job in jobs {
                let data = serde_json::to_string(job)?;
                stmt.execute(params![job.url, job.title, data, now])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn item_count(&self) -> OutputResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dataset_items", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl KeyValueStore for SqliteOutput {
    fn set_value(&mut self, key: &str, value: &serde_json::Value) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO key_value (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn get_value(&self, key: &str) -> OutputResult<Option<serde_json::Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM key_value WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn job(title: &str, url: &str) -> JobPosting {
        let mut job = JobPosting::new(title).unwrap();
        job.url = url.to_string();
        job
    }

    #[test]
    fn test_push_batches_preserve_order() {
        let mut output = SqliteOutput::new_in_memory().unwrap();
        output
            .push_batch(&[job("A", "https://x.com/a"), job("B", "https://x.com/b")])
            .unwrap();
        output.push_batch(&[job("C", "https://x.com/c")]).unwrap();

        assert_eq!(output.item_count().unwrap(), 3);
        let titles: Vec<_> = output
            .load_items()
            .unwrap()
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_key_value_replaces() {
        let mut output = SqliteOutput::new_in_memory().unwrap();
        assert!(output.get_value("statistics").unwrap().is_none());

        output.set_value("statistics", &json!({"totalJobs": 1})).unwrap();
        output.set_value("statistics", &json!({"totalJobs": 2})).unwrap();

        assert_eq!(
            output.get_value("statistics").unwrap(),
            Some(json!({"totalJobs": 2}))
        );
    }

    #[test]
    fn test_file_database_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.db");

        {
            let mut output = SqliteOutput::new(&path).unwrap();
            output.push_batch(&[job("A", "https://x.com/a")]).unwrap();
        }

        let output = SqliteOutput::new(&path).unwrap();
        assert_eq!(output.item_count().unwrap(), 1);
    }
}
