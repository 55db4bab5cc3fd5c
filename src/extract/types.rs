use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for fields whose true value could not be determined
pub const NOT_SPECIFIED: &str = "Not specified";

/// Returns true for empty values and the sentinel placeholder
pub fn is_blank(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == NOT_SPECIFIED
}

/// A single job posting
///
/// Serialized with camelCase keys (`jobType`, `descriptionHtml`, ...) so
/// stored records match the dataset layout consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub job_type: String,
    /// Site-formatted date text, kept as-is
    pub posted_date: String,
    pub description_html: String,
    pub description_text: String,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
}

impl JobPosting {
    /// Creates a posting with the given title and empty fields
    ///
    /// Returns None when the title is blank; a posting without a title is
    /// never constructed.
    pub fn new(title: impl AsRef<str>) -> Option<Self> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return None;
        }

        Some(Self {
            title: title.to_string(),
            company: String::new(),
            location: String::new(),
            salary: String::new(),
            job_type: String::new(),
            posted_date: String::new(),
            description_html: String::new(),
            description_text: String::new(),
            url: String::new(),
            scraped_at: Utc::now(),
        })
    }
}

/// The strategy that produced a set of jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractionMethod {
    #[serde(rename = "API")]
    Api,
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "JSON-LD")]
    JsonLd,
    #[serde(rename = "Browser-API")]
    BrowserApi,
    #[serde(rename = "Browser-JSON-LD")]
    BrowserJsonLd,
    #[serde(rename = "Browser-HTML")]
    BrowserHtml,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "API",
            Self::Html => "HTML",
            Self::JsonLd => "JSON-LD",
            Self::BrowserApi => "Browser-API",
            Self::BrowserJsonLd => "Browser-JSON-LD",
            Self::BrowserHtml => "Browser-HTML",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Jobs produced by one strategy attempt
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub jobs: Vec<JobPosting>,
    pub method: ExtractionMethod,
}

impl ExtractionResult {
    pub fn new(method: ExtractionMethod, jobs: Vec<JobPosting>) -> Self {
        Self { jobs, method }
    }

    pub fn empty(method: ExtractionMethod) -> Self {
        Self::new(method, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
