use serde::Deserialize;

/// Hard ceiling on emitted jobs; `max-jobs = 0` means "this many".
pub const HARD_MAX_JOBS: usize = 10_000;

/// Main configuration structure for Job-Cascade
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Effective job limit after applying the hard ceiling
    ///
    /// Negative values are rejected by validation before this is called.
    pub fn effective_max_jobs(&self) -> usize {
        match usize::try_from(self.search.max_jobs) {
            Ok(0) | Err(_) => HARD_MAX_JOBS,
            Ok(n) => n.min(HARD_MAX_JOBS),
        }
    }

    /// Whether detail pages should be fetched at all
    pub fn enrichment_requested(&self) -> bool {
        self.enrichment.enabled || self.search.include_full_description
    }
}

/// What to search for
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Country/region subdomain code (e.g. "ar", "mx")
    #[serde(default = "default_country")]
    pub country: String,

    /// Search-query slug (e.g. "administracion-y-oficina")
    #[serde(rename = "search-query", default = "default_search_query")]
    pub search_query: String,

    /// Free-text location, turned into a slug
    #[serde(default)]
    pub location: Option<String>,

    /// Explicit listing URL; overrides country/query/location when set
    #[serde(rename = "search-url", default)]
    pub search_url: Option<String>,

    /// Keep only jobs whose known job type contains this text
    #[serde(rename = "job-type", default)]
    pub job_type: Option<String>,

    /// Maximum jobs to emit (0 means the hard ceiling)
    #[serde(rename = "max-jobs", default = "default_max_jobs")]
    pub max_jobs: i64,

    /// Replace listing descriptions with the full detail-page description
    #[serde(rename = "include-full-description", default)]
    pub include_full_description: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            search_query: default_search_query(),
            location: None,
            search_url: None,
            job_type: None,
            max_jobs: default_max_jobs(),
            include_full_description: false,
        }
    }
}

/// Lightweight HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,

    /// Timeout for page fetches (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for speculative API probes (seconds)
    #[serde(rename = "api-timeout-secs", default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,

    /// Retry budget for the initial listing fetch
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Lower bound of the randomized pre-request delay (milliseconds)
    #[serde(rename = "min-delay-ms", default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the randomized pre-request delay (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_timeout_secs(),
            api_timeout_secs: default_api_timeout_secs(),
            retries: default_retries(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Listing pagination limits
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Hard ceiling on listing pages processed per run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Query parameter carrying the page number
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            page_param: default_page_param(),
        }
    }
}

/// Detail-page enrichment
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Number of concurrent detail fetches
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            concurrency: default_concurrency(),
        }
    }
}

/// Outbound proxies, rotated one per run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Rendering transport used as the last strategy
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Browserless-style rendering endpoint
    #[serde(rename = "remote-url", default)]
    pub remote_url: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    /// Maximum pages walked by clicking "next" inside the browser
    #[serde(rename = "max-pages", default = "default_browser_max_pages")]
    pub max_pages: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            token: None,
            max_pages: default_browser_max_pages(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite dataset file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Number of jobs written per sink call
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_country() -> String {
    "ar".to_string()
}

fn default_search_query() -> String {
    "administracion-y-oficina".to_string()
}

fn default_max_jobs() -> i64 {
    50
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "es-ES,es;q=0.9,en;q=0.8".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_api_timeout_secs() -> u64 {
    10
}

fn default_retries() -> u32 {
    2
}

fn default_min_delay_ms() -> u64 {
    300
}

fn default_max_delay_ms() -> u64 {
    1500
}

fn default_max_pages() -> usize {
    50
}

fn default_page_param() -> String {
    "p".to_string()
}

fn default_concurrency() -> usize {
    10
}

fn default_browser_max_pages() -> usize {
    10
}

fn default_database_path() -> String {
    "./jobs.db".to_string()
}

fn default_batch_size() -> usize {
    20
}
