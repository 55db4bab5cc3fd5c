//! Browser transport used as the last extraction strategy
//!
//! A browser session renders pages that plain HTTP cannot get through
//! (JavaScript-built listings, anti-bot interstitials). It is a transport
//! only: the orchestrator runs its own JSON, JSON-LD and HTML extractors over
//! whatever the session hands back.
//!
//! Stealth configuration and proxy routing are the implementation's concern.

mod recorded;
mod remote;

pub use recorded::{RecordedBrowser, RecordedPage};
pub use remote::RemoteRenderSession;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Render service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("No page has been rendered yet")]
    NoPage,

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for BrowserError {
    fn from(err: reqwest::Error) -> Self {
        BrowserError::Network(err.to_string())
    }
}

/// Cookie extracted from a browser session
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
}

/// A fully rendered page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub final_url: String,
    pub html: String,
    /// Session cookies, reused by the lightweight HTTP client
    pub cookies: Vec<BrowserCookie>,
}

/// A same-origin JSON response intercepted while rendering
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    pub url: String,
    pub body: serde_json::Value,
}

/// Narrow capability interface over a rendering browser
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates to `url` and returns the rendered DOM and cookies
    async fn render(&mut self, url: &str) -> Result<RenderedPage, BrowserError>;

    /// Current DOM of the page, after any interaction
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// Clicks the "next page" control
    ///
    /// Returns false when no such control exists.
    async fn click_next(&mut self) -> Result<bool, BrowserError>;

    /// Drains JSON responses captured since the last call
    fn take_captured(&mut self) -> Vec<CapturedResponse>;
}
