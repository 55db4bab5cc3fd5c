//! Lightweight HTTP fetcher
//!
//! This module handles every non-browser request the extractor makes:
//! - Building a cookie-aware, proxy-routed client
//! - Randomized delay before each request
//! - Per-request timeout and a small retry budget
//! - Error classification into [`FetchResult`]

use crate::browser::BrowserCookie;
use crate::config::HttpConfig;
use rand::Rng;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client, Proxy, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_JSON: &str = "application/json";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// HTTP 200 with a readable body
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// Any non-200 response once retries are exhausted
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, ...)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Consumes the result, returning the body of a successful fetch
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchResult::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Short human-readable description of a failed fetch
    pub fn describe_failure(&self) -> String {
        match self {
            FetchResult::Success { .. } => "ok".to_string(),
            FetchResult::HttpError { status_code } => format!("HTTP {}", status_code),
            FetchResult::NetworkError { error } => error.clone(),
        }
    }
}

/// What kind of content a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Html,
    Json,
}

/// Per-request timeout and retry budget
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub retries: u32,
    pub accept: Accept,
}

/// Cookie-aware HTTP client shared by strategies, pagination and enrichment
///
/// Cloning is cheap: clones share the connection pool and the cookie jar.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    jar: Arc<Jar>,
    timeout: Duration,
    api_timeout: Duration,
    retries: u32,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl HttpFetcher {
    /// Builds a fetcher from the HTTP settings, optionally routed through a proxy
    ///
    /// # Example
    ///
    /// ```
    /// use job_cascade::config::HttpConfig;
    /// use job_cascade::fetch::HttpFetcher;
    ///
    /// let fetcher = HttpFetcher::new(&HttpConfig::default(), None).unwrap();
    /// ```
    pub fn new(config: &HttpConfig, proxy: Option<&str>) -> Result<Self, reqwest::Error> {
        let jar = Arc::new(Jar::default());

        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        }

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .cookie_provider(jar.clone())
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(10))
            .gzip(true)
            .brotli(true);

        if let Some(proxy_url) = proxy {
            builder = builder.proxy(Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            jar,
            timeout: Duration::from_secs(config.timeout_secs),
            api_timeout: Duration::from_secs(config.api_timeout_secs),
            retries: config.retries,
            min_delay_ms: config.min_delay_ms,
            max_delay_ms: config.max_delay_ms,
        })
    }

    /// Options for the initial listing fetch
    pub fn listing_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.timeout,
            retries: self.retries,
            accept: Accept::Html,
        }
    }

    /// Options for follow-up listing pages and detail pages
    pub fn page_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.timeout,
            retries: self.retries.min(1),
            accept: Accept::Html,
        }
    }

    /// Options for speculative API probes
    pub fn api_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.api_timeout,
            retries: self.retries.min(1),
            accept: Accept::Json,
        }
    }

    /// Adds cookies captured by a browser session to the jar
    ///
    /// Subsequent requests to matching domains carry them, which keeps the
    /// session that passed the anti-bot check valid for plain HTTP.
    pub fn seed_cookies(&self, cookies: &[BrowserCookie], page_url: &Url) {
        for cookie in cookies {
            if cookie.name.is_empty() {
                continue;
            }

            let mut header = format!("{}={}", cookie.name, cookie.value);
            if !cookie.domain.is_empty() {
                header.push_str(&format!("; Domain={}", cookie.domain));
            }
            if !cookie.path.is_empty() {
                header.push_str(&format!("; Path={}", cookie.path));
            }
            if cookie.secure {
                header.push_str("; Secure");
            }

            self.jar.add_cookie_str(&header, page_url);
        }

        tracing::debug!("Seeded {} browser cookies for {}", cookies.len(), page_url);
    }

    /// Fetches a URL with jitter, timeout and retry handling
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 200 | Success |
    /// | HTTP 5xx | Retry while budget remains |
    /// | Other HTTP status | Immediate → HttpError |
    /// | Timeout / connect error | Retry while budget remains |
    /// | Other network error | Immediate → NetworkError |
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> FetchResult {
        let accept = match options.accept {
            Accept::Html => ACCEPT_HTML,
            Accept::Json => ACCEPT_JSON,
        };

        let mut attempt = 0;
        loop {
            let delay = self.jitter();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let can_retry = attempt < options.retries;
            attempt += 1;

            let response = self
                .client
                .get(url)
                .header(ACCEPT, accept)
                .timeout(options.timeout)
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status();
                    let final_url = response.url().to_string();

                    if status == StatusCode::OK {
                        return match response.text().await {
                            Ok(body) => FetchResult::Success {
                                final_url,
                                status_code: status.as_u16(),
                                body,
                            },
                            Err(e) => FetchResult::NetworkError {
                                error: e.to_string(),
                            },
                        };
                    }

                    if status.is_server_error() && can_retry {
                        tracing::debug!("{} returned {}, retrying (attempt {})", url, status, attempt);
                        continue;
                    }

                    return FetchResult::HttpError {
                        status_code: status.as_u16(),
                    };
                }
                Err(e) => {
                    let transient = e.is_timeout() || e.is_connect();
                    if transient && can_retry {
                        tracing::debug!("{} failed ({}), retrying (attempt {})", url, e, attempt);
                        continue;
                    }

                    let error = if e.is_timeout() {
                        "Request timeout".to_string()
                    } else if e.is_connect() {
                        "Connection refused".to_string()
                    } else {
                        e.to_string()
                    };
                    return FetchResult::NetworkError { error };
                }
            }
        }
    }

    /// Random pause inserted before every request
    fn jitter(&self) -> Duration {
        if self.max_delay_ms == 0 {
            return Duration::ZERO;
        }
        let millis = rand::rng().random_range(self.min_delay_ms..=self.max_delay_ms);
        Duration::from_millis(millis)
    }
}
