//! Depth-bounded scanning of untyped JSON payloads for job records
//!
//! Listing sites wrap their job arrays in arbitrary envelopes
//! (`{"data": {"results": [...]}}`, `{"ofertas": [...]}`, ...). Rather than
//! encode each shape, the scanner walks the value tree looking for arrays of
//! objects whose first element carries a job-like key.
//!
//! The walk first follows only the well-known envelope keys (`jobs`,
//! `ofertas`, `results`, `data`, `items`, `listings`). Only when that finds
//! nothing does it descend into every key, so facet and filter arrays in a
//! recognised envelope are never mistaken for jobs.

use crate::extract::text::strip_html;
use crate::extract::types::{JobPosting, NOT_SPECIFIED};
use serde_json::{Map, Value};

/// Maximum nesting depth visited by [`find_job_arrays`]
pub const MAX_SCAN_DEPTH: usize = 5;

/// Object keys that conventionally hold the job array
const ENVELOPE_KEYS: &[&str] = &["jobs", "ofertas", "results", "data", "items", "listings"];

/// Keys whose presence marks an object as a job record
const JOB_MARKER_KEYS: &[&str] = &["title", "titulo", "company", "empresa"];

const TITLE_KEYS: &[&str] = &["title", "titulo", "name"];
const COMPANY_KEYS: &[&str] = &["company", "empresa", "nombreEmpresa"];
const LOCATION_KEYS: &[&str] = &["location", "ubicacion", "city", "ciudad"];
const SALARY_KEYS: &[&str] = &["salary", "salario", "sueldo"];
const JOB_TYPE_KEYS: &[&str] = &["type", "tipo", "employmentType"];
const DATE_KEYS: &[&str] = &["date", "fecha", "postedDate", "fechaPublicacion"];
const DESCRIPTION_KEYS: &[&str] = &["descriptionHtml", "description", "descripcion"];
const URL_KEYS: &[&str] = &["url", "link", "enlace"];

/// Finds arrays of job-like records anywhere in the first levels of `value`
///
/// An array qualifies when its first element is an object with at least one
/// key (case-insensitive) from the job vocabulary. Non-qualifying arrays and
/// objects are descended into until [`MAX_SCAN_DEPTH`], through envelope keys
/// first and through every key if that pass finds nothing.
pub fn find_job_arrays(value: &Value) -> Vec<&Vec<Value>> {
    let mut found = Vec::new();
    visit(value, 0, true, &mut found);
    if found.is_empty() {
        visit(value, 0, false, &mut found);
    }
    found
}

fn visit<'a>(
    value: &'a Value,
    depth: usize,
    envelope_only: bool,
    found: &mut Vec<&'a Vec<Value>>,
) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }

    match value {
        Value::Array(items) => {
            if items.first().and_then(Value::as_object).is_some_and(looks_like_job) {
                found.push(items);
                return;
            }
            for item in items.iter().filter(|v| v.is_object() || v.is_array()) {
                visit(item, depth + 1, envelope_only, found);
            }
        }
        Value::Object(map) => {
            let children = map
                .iter()
                .filter(|(key, _)| !envelope_only || is_envelope_key(key))
                .map(|(_, child)| child)
                .filter(|v| v.is_object() || v.is_array());
            for child in children {
                visit(child, depth + 1, envelope_only, found);
            }
        }
        _ => {}
    }
}

fn is_envelope_key(key: &str) -> bool {
    ENVELOPE_KEYS.contains(&key.to_lowercase().as_str())
}

fn looks_like_job(record: &Map<String, Value>) -> bool {
    record
        .keys()
        .any(|k| JOB_MARKER_KEYS.contains(&k.to_lowercase().as_str()))
}

/// Scans a payload and maps every found record into a posting
///
/// Records without a usable title are dropped.
pub fn extract_jobs_from_json(value: &Value) -> Vec<JobPosting> {
    find_job_arrays(value)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .filter_map(map_record)
        .collect()
}

/// Maps one untyped record onto a posting using the synonym key lists
pub fn map_record(record: &Map<String, Value>) -> Option<JobPosting> {
    let mut job = JobPosting::new(first_value(record, TITLE_KEYS)?)?;

    job.company = first_value(record, COMPANY_KEYS).unwrap_or_default();
    job.location = first_value(record, LOCATION_KEYS).unwrap_or_default();
    job.salary = first_value(record, SALARY_KEYS).unwrap_or_else(|| NOT_SPECIFIED.to_string());
    job.job_type = first_value(record, JOB_TYPE_KEYS).unwrap_or_else(|| NOT_SPECIFIED.to_string());
    job.posted_date = first_value(record, DATE_KEYS).unwrap_or_default();
    job.description_html = first_value(record, DESCRIPTION_KEYS).unwrap_or_default();
    job.description_text = strip_html(&job.description_html);
    job.url = first_value(record, URL_KEYS).unwrap_or_default();

    Some(job)
}

/// First non-empty value among `keys`, coerced to text
fn first_value(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .filter_map(value_to_text)
        .find(|s| !s.is_empty())
}

/// Coerces a scalar (or an object's `name`) into trimmed text
///
/// Floats with no fractional part render without one (`1000.0` as `"1000"`).
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        }),
        Value::Object(map) => map.get("name").and_then(value_to_text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_array() {
        let payload = json!([{ "titulo": "Cajero", "empresa": "Super SA" }]);
        let jobs = extract_jobs_from_json(&payload);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Cajero");
        assert_eq!(jobs[0].company, "Super SA");
        assert_eq!(jobs[0].salary, NOT_SPECIFIED);
    }

    #[test]
    fn test_unknown_envelope() {
        let payload = json!({
            "meta": { "total": 2 },
            "payload": { "page": { "entries": [
                { "title": "Chofer", "city": "Rosario", "link": "/oferta-1" },
                { "title": "Peon", "ciudad": "Cordoba", "enlace": "/oferta-2" }
            ]}}
        });
        let jobs = extract_jobs_from_json(&payload);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].location, "Rosario");
        assert_eq!(jobs[1].url, "/oferta-2");
    }

    #[test]
    fn test_depth_cap() {
        let payload = json!({"a":{"b":{"c":{"d":{"e":{"f":[{"title":"Too deep"}]}}}}}});
        assert!(find_job_arrays(&payload).is_empty());

        let shallow = json!({"a":{"b":{"c":{"d":[{"title":"Ok"}]}}}});
        assert_eq!(find_job_arrays(&shallow).len(), 1);
    }

    #[test]
    fn test_envelope_keys_preferred_over_facets() {
        let payload = json!({
            "facets": [{ "title": "Remoto", "count": 12 }],
            "data": { "jobs": [{ "title": "Vendedor", "company": "Tienda" }] }
        });
        let jobs = extract_jobs_from_json(&payload);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Vendedor");
    }

    #[test]
    fn test_non_job_arrays_ignored() {
        let payload = json!({ "filters": [{ "id": 1, "label": "Full time" }], "tags": ["a", "b"] });
        assert!(extract_jobs_from_json(&payload).is_empty());
    }

    #[test]
    fn test_marker_keys_case_insensitive() {
        let payload = json!({ "items": [{ "Title": "x", "name": "Operario" }] });
        let jobs = extract_jobs_from_json(&payload);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Operario");
    }

    #[test]
    fn test_synonyms_and_coercion() {
        let payload = json!({ "results": [{
            "title": "  Analista  ",
            "company": { "name": "ACME" },
            "salario": 250000,
            "tipo": "Tiempo completo",
            "fechaPublicacion": "Hace 2 dias",
            "description": "<p>Buscamos<br>analista</p>",
            "url": "https://ar.example.com/oferta-9"
        }]});
        let job = &extract_jobs_from_json(&payload)[0];
        assert_eq!(job.title, "Analista");
        assert_eq!(job.company, "ACME");
        assert_eq!(job.salary, "250000");
        assert_eq!(job.job_type, "Tiempo completo");
        assert_eq!(job.posted_date, "Hace 2 dias");
        assert_eq!(job.description_text, "Buscamos analista");
    }

    #[test]
    fn test_number_text() {
        assert_eq!(value_to_text(&json!(1000.0)).as_deref(), Some("1000"));
        assert_eq!(value_to_text(&json!(1500.5)).as_deref(), Some("1500.5"));
        assert_eq!(value_to_text(&json!(250000)).as_deref(), Some("250000"));
    }

    #[test]
    fn test_records_without_title_dropped() {
        let payload = json!({ "jobs": [{ "company": "A" }, { "title": "B", "company": "C" }] });
        let jobs = extract_jobs_from_json(&payload);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "B");
    }

    #[test]
    fn test_empty_title_falls_through_synonyms() {
        let payload = json!({ "jobs": [{ "title": "", "titulo": "Mozo" }] });
        assert_eq!(extract_jobs_from_json(&payload)[0].title, "Mozo");
    }
}
