use crate::config::types::{
    BrowserConfig, Config, EnrichmentConfig, HttpConfig, OutputConfig, PaginationConfig,
    ProxyConfig, SearchConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_http_config(&config.http)?;
    validate_pagination_config(&config.pagination)?;
    validate_enrichment_config(&config.enrichment)?;
    validate_proxy_config(&config.proxy)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates search parameters
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.max_jobs < 0 {
        return Err(ConfigError::Validation(format!(
            "max_jobs must be non-negative, got {}",
            config.max_jobs
        )));
    }

    let override_url = config
        .search_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match override_url {
        Some(raw) => {
            validate_http_url(raw, "search_url")?;
        }
        None => {
            if config.country.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "country cannot be empty without a search_url".to_string(),
                ));
            }

            if !config
                .country
                .trim()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
            {
                return Err(ConfigError::Validation(format!(
                    "country must be an alphanumeric code, got '{}'",
                    config.country
                )));
            }

            if config.search_query.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "search_query cannot be empty without a search_url".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 || config.api_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "HTTP timeouts must be at least 1 second".to_string(),
        ));
    }

    if config.retries > 5 {
        return Err(ConfigError::Validation(format!(
            "retries must be between 0 and 5, got {}",
            config.retries
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) cannot exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates pagination limits
fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.page_param.trim().is_empty() {
        return Err(ConfigError::Validation(
            "page_param cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates enrichment settings
fn validate_enrichment_config(config: &EnrichmentConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 10 {
        return Err(ConfigError::Validation(format!(
            "enrichment concurrency must be between 1 and 10, got {}",
            config.concurrency
        )));
    }

    Ok(())
}

/// Validates proxy URLs
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    for proxy in &config.urls {
        let url = Url::parse(proxy).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid proxy URL '{}': {}", proxy, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "Proxy URL '{}' must use http or https",
                proxy
            )));
        }
    }

    Ok(())
}

/// Validates the rendering transport
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if let Some(remote) = config.remote_url.as_deref().filter(|s| !s.trim().is_empty()) {
        validate_http_url(remote, "browser remote_url")?;
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "browser max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.batch_size < 1 || config.batch_size > 1000 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be between 1 and 1000, got {}",
            config.batch_size
        )));
    }

    Ok(())
}

/// Validates that a string is an absolute http(s) URL
fn validate_http_url(raw: &str, field: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            field, raw
        )));
    }

    Ok(())
}
