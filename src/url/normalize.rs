use crate::{UrlError, UrlResult};
use url::Url;

/// Tracking query parameters dropped from canonical job URLs
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Returns the origin of a URL as a root URL (`scheme://host[:port]/`)
pub fn origin_root(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

/// Resolves a link href against the origin of `base`
///
/// Partial paths such as `oferta-123` resolve to `<origin>/oferta-123`, the
/// same as `/oferta-123`. Returns None for links that cannot name a page:
/// - empty hrefs and fragment-only anchors
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - anything that does not resolve to http(s)
pub fn resolve_url(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let resolved = if href.starts_with("http://") || href.starts_with("https://") {
        Url::parse(href).ok()?
    } else if href.starts_with("//") {
        base.join(href).ok()?
    } else {
        origin_root(base).join(href).ok()?
    };

    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Canonicalizes a job URL for use as a dedup key and as the stored `url`
///
/// # Canonicalization Steps
///
/// 1. Resolve against the page origin; reject anything non-http(s)
/// 2. Lowercase the host (done by the parser)
/// 3. Normalize path: drop dot segments and duplicate slashes, trim trailing slash
/// 4. Remove fragment
/// 5. Remove tracking query parameters, sort the rest
/// 6. Remove empty query string
///
/// The scheme and any `www.` prefix are kept: the canonical URL is also the
/// address the detail page is fetched from.
///
/// # Examples
///
/// ```
/// use job_cascade::url::canonicalize_url;
/// use url::Url;
///
/// let base = Url::parse("https://ar.computrabajo.com/empleos-de-ventas").unwrap();
/// let url = canonicalize_url("/ofertas/123/?utm_source=x#top", &base).unwrap();
/// assert_eq!(url.as_str(), "https://ar.computrabajo.com/ofertas/123");
/// ```
pub fn canonicalize_url(raw: &str, base: &Url) -> UrlResult<Url> {
    let mut url = resolve_url(raw, base).ok_or_else(|| {
        if raw.trim().is_empty() {
            UrlError::Parse("empty URL".to_string())
        } else {
            UrlError::InvalidScheme(raw.trim().to_string())
        }
    })?;

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query().is_some() {
        let filtered_params = filter_and_sort_query_params(&url);

        if filtered_params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(filtered_params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
    }

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort();
    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
