//! Configuration module for Job-Cascade
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use job_cascade::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Will collect up to {} jobs", config.effective_max_jobs());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, EnrichmentConfig, HttpConfig, OutputConfig, PaginationConfig,
    ProxyConfig, SearchConfig, HARD_MAX_JOBS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
