//! Proxy URL provisioning
//!
//! A run asks its provider for one proxy URL up front and routes both the
//! HTTP client and the browser session through it.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of proxy URLs
pub trait ProxyProvider: Send + Sync {
    /// Next proxy URL, or None to connect directly
    fn new_url(&self) -> Option<String>;
}

/// Round-robin rotation over a fixed proxy list
#[derive(Debug, Default)]
pub struct ProxyRotation {
    urls: Vec<String>,
    counter: AtomicUsize,
}

impl ProxyRotation {
    pub fn new(urls: Vec<String>) -> Self {
        let urls = urls
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        Self {
            urls,
            counter: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl ProxyProvider for ProxyRotation {
    fn new_url(&self) -> Option<String> {
        if self.urls.is_empty() {
            return None;
        }
        let idx = self.counter.fetch_add(1, Ordering::Relaxed) % self.urls.len();
        self.urls.get(idx).cloned()
    }
}

/// Redacts credentials from a proxy URL for logging
pub fn redact(proxy_url: &str) -> String {
    match url::Url::parse(proxy_url) {
        Ok(mut parsed) if !parsed.username().is_empty() || parsed.password().is_some() => {
            let _ = parsed.set_username("***");
            let _ = parsed.set_password(None);
            parsed.to_string()
        }
        Ok(parsed) => parsed.to_string(),
        Err(_) => "<invalid proxy url>".to_string(),
    }
}
