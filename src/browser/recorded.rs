//! Replay of recorded browser pages
//!
//! Stands in for a real browser in tests and offline replays: each
//! [`RecordedPage`] is what the browser showed (DOM plus captured JSON) at one
//! step, and `click_next` advances to the next recorded step.

use crate::browser::{
    BrowserCookie, BrowserError, BrowserSession, CapturedResponse, RenderedPage,
};
use async_trait::async_trait;
use std::collections::VecDeque;

/// One recorded page state
#[derive(Debug, Clone, Default)]
pub struct RecordedPage {
    pub html: String,
    pub captured: Vec<CapturedResponse>,
}

impl RecordedPage {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            captured: Vec::new(),
        }
    }

    /// Adds a captured JSON payload to this page
    pub fn with_capture(mut self, url: impl Into<String>, body: serde_json::Value) -> Self {
        self.captured.push(CapturedResponse {
            url: url.into(),
            body,
        });
        self
    }
}

/// Deterministic [`BrowserSession`] over a fixed sequence of pages
#[derive(Debug, Default)]
pub struct RecordedBrowser {
    pending: VecDeque<RecordedPage>,
    current: Option<String>,
    captured: Vec<CapturedResponse>,
    cookies: Vec<BrowserCookie>,
    renders: usize,
    clicks: usize,
}

impl RecordedBrowser {
    /// Creates a session that shows `pages` in order: the first on `render`,
    /// the rest one per successful `click_next`
    pub fn new(pages: Vec<RecordedPage>) -> Self {
        Self {
            pending: pages.into(),
            ..Self::default()
        }
    }

    pub fn with_cookies(mut self, cookies: Vec<BrowserCookie>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Number of `render` calls made
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Number of successful `click_next` calls made
    pub fn click_count(&self) -> usize {
        self.clicks
    }

    fn show(&mut self, page: RecordedPage) -> String {
        self.captured.extend(page.captured);
        self.current = Some(page.html.clone());
        page.html
    }
}

#[async_trait]
impl BrowserSession for RecordedBrowser {
    async fn render(&mut self, url: &str) -> Result<RenderedPage, BrowserError> {
        self.renders += 1;
        let page = self.pending.pop_front().ok_or_else(|| BrowserError::Navigation {
            url: url.to_string(),
            message: "no recorded page".to_string(),
        })?;

        let html = self.show(page);
        Ok(RenderedPage {
            final_url: url.to_string(),
            html,
            cookies: self.cookies.clone(),
        })
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.current.clone().ok_or(BrowserError::NoPage)
    }

    async fn click_next(&mut self) -> Result<bool, BrowserError> {
        if self.current.is_none() {
            return Err(BrowserError::NoPage);
        }

        match self.pending.pop_front() {
            Some(page) => {
                self.clicks += 1;
                self.show(page);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn take_captured(&mut self) -> Vec<CapturedResponse> {
        std::mem::take(&mut self.captured)
    }
}
