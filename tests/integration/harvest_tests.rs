//! Full runs over HTTP strategies, pagination and enrichment

use crate::common::{card, empty_page, fetcher, listing_page, test_config, LISTING_PATH};
use job_cascade::crawler::harvest;
use job_cascade::extract::NOT_SPECIFIED;
use job_cascade::output::{load_statistics, MemoryOutput};
use job_cascade::{ConfigError, HarvestError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_duplicate_cards_keep_first_in_order() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        LISTING_PATH,
        listing_page(
            &[
                card("Vendedor", "/ofertas/1", "ACME"),
                card("Cajero", "/ofertas/2", "Super SA"),
                card("Vendedor (repetido)", "/ofertas/1#lc=ListOffers", "Otra"),
            ],
            Some("/empleos-de-ventas/page-2"),
        ),
    )
    .await;
    mount_html(&server, "/empleos-de-ventas/page-2", empty_page()).await;

    let config = test_config(&server.uri(), 10);
    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), None, &mut output)
        .await
        .unwrap();

    assert_eq!(output.items.len(), 2);
    assert_eq!(output.items[0].title, "Vendedor");
    assert_eq!(output.items[0].company, "ACME");
    assert_eq!(output.items[0].url, format!("{}/ofertas/1", server.uri()));
    assert_eq!(output.items[1].title, "Cajero");

    for job in &output.items {
        assert!(!job.title.is_empty());
        assert!(!job.url.is_empty());
        assert!(!job.description_html.is_empty());
        assert_eq!(job.salary, NOT_SPECIFIED);
    }

    assert_eq!(stats.extraction_method, "HTML");
    assert_eq!(stats.total_jobs, 2);
    assert_eq!(stats.pages_processed, 1);
    assert_eq!(load_statistics(&output).unwrap(), Some(stats));
}

#[tokio::test]
async fn test_api_success_skips_listing_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "ofertas": [
                { "titulo": "Analista", "empresa": "Banco", "url": "/ofertas/a" },
                { "titulo": "Contador", "empresa": "Estudio", "url": "/ofertas/b" }
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[card("Nunca", "/ofertas/x", "X")],
            None,
        )))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), 50);
    config.pagination.max_pages = 1;

    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), None, &mut output)
        .await
        .unwrap();

    assert_eq!(stats.extraction_method, "API");
    let titles: Vec<_> = output.items.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Analista", "Contador"]);
    assert_eq!(output.items[0].company, "Banco");
}

#[tokio::test]
async fn test_pagination_follows_next_until_empty_page() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        LISTING_PATH,
        listing_page(
            &[card("Uno", "/ofertas/1", "A"), card("Dos", "/ofertas/2", "B")],
            Some("/empleos-de-ventas/page-2"),
        ),
    )
    .await;
    mount_html(
        &server,
        "/empleos-de-ventas/page-2",
        listing_page(
            &[card("Tres", "/ofertas/3", "C"), card("Cuatro", "/ofertas/4", "D")],
            Some("/empleos-de-ventas/page-3"),
        ),
    )
    .await;
    mount_html(&server, "/empleos-de-ventas/page-3", empty_page()).await;
    Mock::given(method("GET"))
        .and(path("/empleos-de-ventas/page-4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_page()))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), 50);
    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), None, &mut output)
        .await
        .unwrap();

    assert_eq!(output.items.len(), 4);
    assert_eq!(output.items[3].title, "Cuatro");
    assert_eq!(stats.pages_processed, 2);
}

#[tokio::test]
async fn test_zero_card_page_stops_below_max() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        LISTING_PATH,
        listing_page(&[card("Uno", "/ofertas/1", "A")], Some("/empleos-de-ventas/page-2")),
    )
    .await;
    mount_html(
        &server,
        "/empleos-de-ventas/page-2",
        listing_page(&[], Some("/empleos-de-ventas/page-3")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/empleos-de-ventas/page-3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[card("Nunca", "/ofertas/9", "Z")],
            None,
        )))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), 100);
    let mut output = MemoryOutput::new();
    harvest(config.clone(), fetcher(&config), None, &mut output)
        .await
        .unwrap();

    assert_eq!(output.items.len(), 1);
}

#[tokio::test]
async fn test_output_truncated_to_max_jobs() {
    let server = MockServer::start().await;
    let cards: Vec<_> = (1..=5)
        .map(|i| card(&format!("Puesto {}", i), &format!("/ofertas/{}", i), "ACME"))
        .collect();
    mount_html(
        &server,
        LISTING_PATH,
        listing_page(&cards, Some("/empleos-de-ventas/page-2")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/empleos-de-ventas/page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_page()))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), 3);
    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), None, &mut output)
        .await
        .unwrap();

    assert_eq!(stats.total_jobs, 3);
    let titles: Vec<_> = output.items.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Puesto 1", "Puesto 2", "Puesto 3"]);
}

#[tokio::test]
async fn test_json_ld_listing() {
    let server = MockServer::start().await;
    let body = r#"<html><head><script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "ItemList", "itemListElement": [
          {"@type": "ListItem", "item": {
             "@type": "JobPosting", "title": "Recepcionista",
             "url": "/ofertas/r1",
             "baseSalary": {"@type": "MonetaryAmount", "currency": "ARS",
                            "value": {"minValue": 1000, "maxValue": 2000}},
             "jobLocation": {"address": {"addressLocality": "Rosario", "addressRegion": "Santa Fe"}}
          }}
        ]}
        </script></head><body></body></html>"#;
    mount_html(&server, LISTING_PATH, body.to_string()).await;

    let mut config = test_config(&server.uri(), 10);
    config.pagination.max_pages = 1;

    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), None, &mut output)
        .await
        .unwrap();

    assert_eq!(stats.extraction_method, "JSON-LD");
    assert_eq!(output.items.len(), 1);
    assert_eq!(output.items[0].salary, "1000 - 2000 ARS");
    assert_eq!(output.items[0].location, "Rosario, Santa Fe");
    assert_eq!(output.items[0].description_html, NOT_SPECIFIED);
}

#[tokio::test]
async fn test_enrichment_merges_detail_fields() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        LISTING_PATH,
        listing_page(
            &[card("Vendedor", "/ofertas/1", "ACME"), card("Cajero", "/ofertas/2", "Super SA")],
            Some("/empleos-de-ventas/page-2"),
        ),
    )
    .await;
    mount_html(&server, "/empleos-de-ventas/page-2", empty_page()).await;
    mount_html(
        &server,
        "/ofertas/1",
        r#"<html><body>
             <h1>Vendedor salon</h1>
             <span class="company"></span>
             <span class="salary">$ 700.000</span>
             <span itemprop="employmentType">Tiempo completo</span>
             <div div-link="oferta"><p>Atencion al publico</p></div>
           </body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/ofertas/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), 10);
    config.enrichment.enabled = true;
    config.enrichment.concurrency = 2;

    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), None, &mut output)
        .await
        .unwrap();

    assert_eq!(stats.detail_pages_fetched, 1);

    let enriched = &output.items[0];
    assert_eq!(enriched.title, "Vendedor salon");
    assert_eq!(enriched.company, "ACME");
    assert_eq!(enriched.salary, "$ 700.000");
    assert_eq!(enriched.job_type, "Tiempo completo");
    // Descriptions only merge with include-full-description
    assert_ne!(enriched.description_text, "Atencion al publico");

    let untouched = &output.items[1];
    assert_eq!(untouched.title, "Cajero");
    assert_eq!(untouched.company, "Super SA");
    assert_eq!(untouched.salary, NOT_SPECIFIED);
}

#[tokio::test]
async fn test_job_type_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "title": "Full", "type": "Tiempo completo", "url": "/o/1" },
                { "title": "Part", "type": "Medio tiempo", "url": "/o/2" },
                { "title": "Unknown", "url": "/o/3" }
            ]
        })))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), 10);
    config.pagination.max_pages = 1;
    config.search.job_type = Some("completo".to_string());

    let mut output = MemoryOutput::new();
    harvest(config.clone(), fetcher(&config), None, &mut output)
        .await
        .unwrap();

    let titles: Vec<_> = output.items.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Full", "Unknown"]);
}

#[tokio::test]
async fn test_every_strategy_empty_without_browser() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), 10);
    let mut output = MemoryOutput::new();
    let stats = harvest(config.clone(), fetcher(&config), None, &mut output)
        .await
        .unwrap();

    assert!(output.items.is_empty());
    assert_eq!(stats.extraction_method, "None");
    assert_eq!(stats.total_jobs, 0);
    assert!(load_statistics(&output).unwrap().is_some());
}

#[tokio::test]
async fn test_negative_max_jobs_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), -1);
    let mut output = MemoryOutput::new();
    let result = harvest(config.clone(), fetcher(&config), None, &mut output).await;

    assert!(matches!(
        result,
        Err(HarvestError::Config(ConfigError::Validation(_)))
    ));
    assert!(output.values.is_empty());
}
