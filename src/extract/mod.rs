//! Extraction strategies and the shared job data model
//!
//! This module contains:
//! - The [`JobPosting`] record and [`ExtractionMethod`] tags
//! - Direct-API probing with an untyped JSON scanner
//! - JSON-LD structured data parsing
//! - Selector-chain HTML card parsing for listings and detail pages

pub mod api;
pub mod detail;
pub mod html;
pub mod json_scan;
pub mod structured;
pub mod text;
mod types;

pub use api::{api_candidates, extract_from_api};
pub use detail::{DetailFields, DetailParser};
pub use html::{HtmlExtractor, SelectorChain};
pub use json_scan::extract_jobs_from_json;
pub use structured::{extract_structured_jobs, normalize_location, normalize_salary};
pub use text::{collapse_whitespace, escape_html, strip_html};
pub use types::{is_blank, ExtractionMethod, ExtractionResult, JobPosting, NOT_SPECIFIED};
