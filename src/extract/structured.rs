//! JSON-LD job posting extraction
//!
//! Scans every `script[type="application/ld+json"]` block on a page. Blocks
//! are parsed independently; a malformed block is skipped without failing the
//! page. Supported containers:
//! - a single `JobPosting` object
//! - an array of objects
//! - a `@graph` wrapper
//! - an `ItemList` whose `itemListElement` entries may wrap the posting in `item`

use crate::extract::json_scan::value_to_text;
use crate::extract::text::strip_html;
use crate::extract::types::{JobPosting, NOT_SPECIFIED};
use scraper::{Html, Selector};
use serde_json::Value;

const JOB_POSTING_TYPE: &str = "JobPosting";

/// Extracts every JSON-LD `JobPosting` record from an HTML document
///
/// # Arguments
///
/// * `html` - Full page HTML
///
/// # Returns
///
/// The postings in document order. Records without a title are dropped.
pub fn extract_structured_jobs(html: &str) -> Vec<JobPosting> {
    let document = Html::parse_document(html);
    extract_from_document(&document)
}

/// Same as [`extract_structured_jobs`] over an already-parsed document
pub fn extract_from_document(document: &Html) -> Vec<JobPosting> {
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    for (index, script) in document.select(&selector).enumerate() {
        let raw = script.text().collect::<String>();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => {
                let mut records = Vec::new();
                collect_postings(&value, &mut records);
                jobs.extend(records.into_iter().filter_map(map_posting));
            }
            Err(e) => {
                tracing::debug!("Skipping unparsable JSON-LD block #{}: {}", index, e);
            }
        }
    }
    jobs
}

/// Flattens the supported container shapes into a list of posting objects
fn collect_postings<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_postings(item, out);
            }
        }
        Value::Object(map) => {
            if has_type(value, JOB_POSTING_TYPE) {
                out.push(value);
                return;
            }
            if let Some(graph) = map.get("@graph") {
                collect_postings(graph, out);
            }
            if let Some(elements) = map.get("itemListElement") {
                collect_postings(elements, out);
            }
            // ListItem entries wrap the posting
            if let Some(item) = map.get("item") {
                collect_postings(item, out);
            }
        }
        _ => {}
    }
}

/// True when `@type` equals `type_name` or is an array containing it
fn has_type(value: &Value, type_name: &str) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == type_name,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(type_name)),
        _ => false,
    }
}

/// Normalizes one JSON-LD `JobPosting` object
pub fn map_posting(record: &Value) -> Option<JobPosting> {
    let mut job = JobPosting::new(text_field(record, "title")?)?;

    job.company = record
        .get("hiringOrganization")
        .and_then(value_to_text)
        .unwrap_or_default();
    job.location = record
        .get("jobLocation")
        .map(normalize_location)
        .unwrap_or_default();
    job.salary = record
        .get("baseSalary")
        .map(normalize_salary)
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    job.job_type = record
        .get("employmentType")
        .map(normalize_employment_type)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    job.posted_date = text_field(record, "datePosted").unwrap_or_default();
    job.description_html = text_field(record, "description").unwrap_or_default();
    job.description_text = strip_html(&job.description_html);
    job.url = text_field(record, "url").unwrap_or_default();

    Some(job)
}

fn text_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(value_to_text)
        .filter(|s| !s.is_empty())
}

/// Renders a `baseSalary` value as display text
///
/// Scalars are rendered as-is. Objects are read as
/// `{currency, value: {minValue, maxValue}}` or with the range keys directly
/// on the object, and rendered as `"<min> - <max> <currency>"`, or
/// `"<min> <currency>"` without a max. Anything unusable yields the sentinel.
///
/// ```
/// use job_cascade::extract::normalize_salary;
/// use serde_json::json;
///
/// let salary = json!({"minValue": 1000, "maxValue": 2000, "currency": "ARS"});
/// assert_eq!(normalize_salary(&salary), "1000 - 2000 ARS");
/// assert_eq!(normalize_salary(&json!(1500)), "1500");
/// ```
pub fn normalize_salary(value: &Value) -> String {
    let rendered = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(_) => {
            let inner = value.get("value");
            let range = inner.filter(|v| v.is_object()).unwrap_or(value);

            let currency = value
                .get("currency")
                .or_else(|| range.get("currency"))
                .and_then(value_to_text)
                .unwrap_or_default();

            let min = range
                .get("minValue")
                .or_else(|| range.get("value"))
                .or(inner.filter(|v| !v.is_object()))
                .and_then(value_to_text)
                .unwrap_or_default();
            let max = range
                .get("maxValue")
                .and_then(value_to_text)
                .unwrap_or_default();

            let amount = match (min.is_empty(), max.is_empty()) {
                (false, false) => format!("{} - {}", min, max),
                (false, true) => min,
                (true, false) => max,
                (true, true) => String::new(),
            };

            if amount.is_empty() {
                String::new()
            } else if currency.is_empty() {
                amount
            } else {
                format!("{} {}", amount, currency)
            }
        }
        _ => String::new(),
    };

    if rendered.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        rendered
    }
}

/// Renders `jobLocation` as `"locality, region, country"`
///
/// Accepts a location object, an array of them (first entry wins), or a bare
/// string. The address itself may be a string or a `PostalAddress`.
pub fn normalize_location(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items.first().map(normalize_location).unwrap_or_default(),
        Value::Object(_) => match value.get("address") {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(address) if address.is_object() => join_address(address),
            _ => value
                .get("name")
                .and_then(value_to_text)
                .unwrap_or_default(),
        },
        _ => String::new(),
    }
}

fn join_address(address: &Value) -> String {
    ["addressLocality", "addressRegion", "addressCountry"]
        .iter()
        .filter_map(|key| address.get(*key).and_then(value_to_text))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn normalize_employment_type(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => value_to_text(other).unwrap_or_default(),
    }
}
