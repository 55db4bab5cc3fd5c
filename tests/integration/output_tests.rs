//! Runs writing to the SQLite output store, configured from TOML

use crate::common::{card, empty_page, listing_page, LISTING_PATH};
use job_cascade::config::load_config;
use job_cascade::crawler::{build_collaborators, harvest};
use job_cascade::output::{load_statistics, DatasetSink, SqliteOutput};
use job_cascade::proxy::ProxyRotation;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_run_from_toml_into_sqlite() {
    let server = MockServer::start().await;
    let cards: Vec<_> = (1..=5)
        .map(|i| card(&format!("Puesto {}", i), &format!("/ofertas/{}", i), "ACME"))
        .collect();
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &cards,
            Some("/empleos-de-ventas/page-2"),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empleos-de-ventas/page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_page()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("jobs.db");
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[search]
search-url = "{}{}"
max-jobs = 0

[http]
retries = 0
min-delay-ms = 0
max-delay-ms = 0

[output]
database-path = "{}"
batch-size = 2
"#,
            server.uri(),
            LISTING_PATH,
            db_path.display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    let proxies = ProxyRotation::new(config.proxy.urls.clone());
    let (fetcher, browser) = build_collaborators(&config, &proxies).unwrap();
    assert!(browser.is_none());

    let mut output = SqliteOutput::new(&db_path).unwrap();
    let stats = harvest(config, fetcher, browser, &mut output).await.unwrap();
    drop(output);

    assert_eq!(stats.total_jobs, 5);
    assert_eq!(stats.extraction_method, "HTML");

    let reopened = SqliteOutput::new(&db_path).unwrap();
    assert_eq!(reopened.item_count().unwrap(), 5);

    let items = reopened.load_items().unwrap();
    assert_eq!(items[0].title, "Puesto 1");
    assert_eq!(items[4].url, format!("{}/ofertas/5", server.uri()));

    let stored = load_statistics(&reopened).unwrap().unwrap();
    assert_eq!(stored.total_jobs, 5);
    assert_eq!(stored.extraction_method, "HTML");
    assert_eq!(stored.pages_processed, 1);
}
