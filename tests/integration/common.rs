//! Shared fixtures for the integration tests

use job_cascade::config::{Config, HttpConfig, SearchConfig};
use job_cascade::fetch::HttpFetcher;

/// Path of the listing page on the mock server
pub const LISTING_PATH: &str = "/empleos-de-ventas";

/// Creates a test configuration pointed at the mock server
pub fn test_config(server_uri: &str, max_jobs: i64) -> Config {
    Config {
        search: SearchConfig {
            search_url: Some(format!("{}{}", server_uri, LISTING_PATH)),
            max_jobs,
            ..SearchConfig::default()
        },
        http: HttpConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
            retries: 0,
            ..HttpConfig::default()
        },
        ..Config::default()
    }
}

pub fn fetcher(config: &Config) -> HttpFetcher {
    HttpFetcher::new(&config.http, None).expect("Failed to build fetcher")
}

/// One Computrabajo-style job card
pub fn card(title: &str, href: &str, company: &str) -> String {
    format!(
        r#"<article class="box_offer">
             <h2><a class="js-o-link" href="{}">{}</a></h2>
             <p class="fs16 fc_base mt5">{}</p>
             <p class="fs13 fc_base">Capital Federal</p>
             <p class="fs13 fc_aux">Hace 1 dia</p>
           </article>"#,
        href, title, company
    )
}

/// A listing page with the given cards and optional "next" link
pub fn listing_page(cards: &[String], next: Option<&str>) -> String {
    let next = next
        .map(|href| format!(r#"<a rel="next" href="{}">Siguiente</a>"#, href))
        .unwrap_or_default();
    format!(
        "<html><body><main>{}</main><nav>{}</nav></body></html>",
        cards.join("\n"),
        next
    )
}

pub fn empty_page() -> String {
    "<html><body><p>No encontramos ofertas</p></body></html>".to_string()
}
