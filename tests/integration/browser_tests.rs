//! Browser fallback runs driven by recorded pages

use crate::common::{card, fetcher, listing_page, test_config, LISTING_PATH};
use job_cascade::browser::{BrowserCookie, BrowserSession, RecordedBrowser, RecordedPage};
use job_cascade::crawler::harvest;
use job_cascade::output::MemoryOutput;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Blocks every plain HTTP strategy with a 403
async fn block_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(server)
        .await;
}

fn boxed(browser: RecordedBrowser) -> Option<Box<dyn BrowserSession>> {
    Some(Box::new(browser))
}

#[tokio::test]
async fn test_browser_html_with_click_pagination() {
    let server = MockServer::start().await;
    block_listing(&server).await;

    let browser = RecordedBrowser::new(vec![
        RecordedPage::html(listing_page(
            &[card("Uno", "/ofertas/1", "A"), card("Dos", "/ofertas/2", "B")],
            None,
        )),
        RecordedPage::html(listing_page(&[card("Tres", "/ofertas/3", "C")], None)),
    ]);

    let config = test_config(&server.uri(), 20);
    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), boxed(browser), &mut output)
        .await
        .unwrap();

    assert_eq!(stats.extraction_method, "Browser-HTML");
    assert_eq!(stats.pages_processed, 2);
    let titles: Vec<_> = output.items.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Uno", "Dos", "Tres"]);
}

#[tokio::test]
async fn test_browser_prefers_captured_json() {
    let server = MockServer::start().await;
    block_listing(&server).await;

    let page = RecordedPage::html(listing_page(&[card("Desde HTML", "/ofertas/h", "H")], None))
        .with_capture(
            format!("{}/api/internal/offers", server.uri()),
            json!({ "payload": { "items": [
                { "title": "Desde JSON", "company": "Json SA", "link": "/ofertas/j" }
            ]}}),
        );

    let mut config = test_config(&server.uri(), 20);
    config.browser.max_pages = 1;

    let mut output = MemoryOutput::new();
    let stats = harvest(
        config.clone(),
        fetcher(&config),
        boxed(RecordedBrowser::new(vec![page])),
        &mut output,
    )
    .await
    .unwrap();

    assert_eq!(stats.extraction_method, "Browser-API");
    assert_eq!(output.items.len(), 1);
    assert_eq!(output.items[0].title, "Desde JSON");
    assert_eq!(output.items[0].company, "Json SA");
}

#[tokio::test]
async fn test_browser_without_clicks_continues_over_http_with_cookies() {
    let server = MockServer::start().await;
    block_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/empleos-de-ventas/page-2"))
        .and(header("cookie", "cf_clearance=ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[card("Tres", "/ofertas/3", "C")],
            Some("/empleos-de-ventas/page-3"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empleos-de-ventas/page-3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let browser = RecordedBrowser::new(vec![RecordedPage::html(listing_page(
        &[card("Uno", "/ofertas/1", "A"), card("Dos", "/ofertas/2", "B")],
        Some("/empleos-de-ventas/page-2"),
    ))])
    .with_cookies(vec![BrowserCookie {
        name: "cf_clearance".to_string(),
        value: "ok".to_string(),
        domain: String::new(),
        path: "/".to_string(),
        secure: false,
        http_only: true,
    }]);

    let config = test_config(&server.uri(), 20);
    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), boxed(browser), &mut output)
        .await
        .unwrap();

    assert_eq!(stats.extraction_method, "Browser-HTML");
    assert_eq!(stats.pages_processed, 2);
    assert_eq!(output.items.len(), 3);
    assert_eq!(output.items[2].title, "Tres");
}

#[tokio::test]
async fn test_browser_skipped_when_http_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[card("Uno", "/ofertas/1", "A")],
            None,
        )))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), 1);
    config.pagination.max_pages = 1;

    let browser = RecordedBrowser::new(vec![RecordedPage::html(listing_page(
        &[card("Browser", "/ofertas/b", "B")],
        None,
    ))]);

    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), boxed(browser), &mut output)
        .await
        .unwrap();

    assert_eq!(stats.extraction_method, "HTML");
    assert_eq!(output.items[0].title, "Uno");
}
