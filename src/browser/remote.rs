//! Browser session backed by a remote rendering service
//!
//! Talks to a Browserless-style `/content` endpoint: POST `{"url": ...}` and
//! receive the rendered DOM. The service does not expose network capture or
//! interaction, so this session never captures JSON and cannot click "next".

use crate::browser::{BrowserError, BrowserSession, CapturedResponse, RenderedPage};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

pub struct RemoteRenderSession {
    client: reqwest::Client,
    endpoint: Url,
    current: Option<String>,
}

impl RemoteRenderSession {
    /// Creates a session against `base_url`, optionally routed through `proxy`
    ///
    /// The token is sent percent-encoded in the `token` query parameter.
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        proxy: Option<&str>,
    ) -> Result<Self, BrowserError> {
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(60));
        if let Some(proxy_url) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let mut endpoint = Url::parse(base_url).map_err(|e| BrowserError::Navigation {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        let path = format!("{}/content", endpoint.path().trim_end_matches('/'));
        endpoint.set_path(&path);
        endpoint.set_query(None);
        if let Some(token) = token {
            endpoint.query_pairs_mut().append_pair("token", token);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            current: None,
        })
    }
}

#[async_trait]
impl BrowserSession for RemoteRenderSession {
    async fn render(&mut self, url: &str) -> Result<RenderedPage, BrowserError> {
        let body = serde_json::json!({ "url": url });

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let html = resp.text().await?;
        self.current = Some(html.clone());

        Ok(RenderedPage {
            final_url: url.to_string(),
            html,
            cookies: Vec::new(),
        })
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.current.clone().ok_or(BrowserError::NoPage)
    }

    async fn click_next(&mut self) -> Result<bool, BrowserError> {
        Ok(false)
    }

    fn take_captured(&mut self) -> Vec<CapturedResponse> {
        Vec::new()
    }
}
