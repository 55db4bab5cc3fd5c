use crate::config::SearchConfig;
use crate::{UrlError, UrlResult};
use url::Url;

/// Listing site host; the country code is prepended as a subdomain
const LISTING_HOST: &str = "computrabajo.com";

/// Builds the initial listing URL from search parameters
///
/// An explicit `search_url` wins. Otherwise the URL is
/// `https://<country>.computrabajo.com/empleos-de-<query>[-en-<location-slug>]`.
///
/// # Examples
///
/// ```
/// use job_cascade::config::SearchConfig;
/// use job_cascade::url::build_search_url;
///
/// let search = SearchConfig {
///     country: "ar".into(),
///     search_query: "ventas".into(),
///     location: Some("Buenos Aires".into()),
///     ..SearchConfig::default()
/// };
/// let url = build_search_url(&search).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://ar.computrabajo.com/empleos-de-ventas-en-buenos-aires"
/// );
/// ```
pub fn build_search_url(search: &SearchConfig) -> UrlResult<Url> {
    if let Some(explicit) = search
        .search_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let url = Url::parse(explicit).map_err(|e| UrlError::Parse(e.to_string()))?;
        return match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(UrlError::InvalidScheme(other.to_string())),
        };
    }

    let country = search.country.trim().to_lowercase();
    let query = search.search_query.trim();

    let mut raw = format!("https://{}.{}/empleos-de-{}", country, LISTING_HOST, query);

    if let Some(location) = search.location.as_deref() {
        let slug = location_slug(location);
        if !slug.is_empty() {
            raw.push_str("-en-");
            raw.push_str(&slug);
        }
    }

    Url::parse(&raw).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Turns a free-text location into a URL slug ("Buenos Aires" -> "buenos-aires")
pub fn location_slug(location: &str) -> String {
    location
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
