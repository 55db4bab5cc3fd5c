//! Job detail page parsing
//!
//! Detail pages are read with the JSON-LD extractor first; a broader set of
//! selector chains then fills whatever JSON-LD left empty.

use crate::extract::html::SelectorChain;
use crate::extract::structured::extract_from_document;
use crate::extract::text::strip_html;
use crate::extract::types::{is_blank, JobPosting};
use scraper::Html;

const TITLE_SELECTORS: &[&str] = &["h1", "[itemprop=title]", ".job-title", ".box_detail h1", "header h2"];
const COMPANY_SELECTORS: &[&str] = &[
    "[itemprop=hiringOrganization]",
    ".company",
    ".empresa",
    "a.js-o-link[href*=empresa]",
    ".box_detail .fs16",
];
const LOCATION_SELECTORS: &[&str] = &[
    "[itemprop=jobLocation]",
    ".location",
    ".ubicacion",
    ".box_detail .fs13",
];
const SALARY_SELECTORS: &[&str] = &["[itemprop=baseSalary]", ".salary", ".salario", ".sueldo"];
const JOB_TYPE_SELECTORS: &[&str] = &[
    "[itemprop=employmentType]",
    ".job-type",
    ".tipo-contrato",
    ".contract-type",
];
const DATE_SELECTORS: &[&str] = &["[itemprop=datePosted]", ".date", ".fecha", "p.fc_aux.fs13"];
const DESCRIPTION_SELECTORS: &[&str] = &[
    "div[div-link='oferta']",
    "[itemprop=description]",
    ".description",
    "#description",
    ".box_detail .mb40",
    "article .box_section",
];

/// Fields read from a detail page; empty when not found
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub job_type: String,
    pub posted_date: String,
    pub description_html: String,
    pub description_text: String,
}

impl DetailFields {
    /// Copies non-blank detail values over the listing record
    ///
    /// A blank detail value (empty or the sentinel) never replaces a listing
    /// value. Description fields are only considered with
    /// `include_description`.
    pub fn merge_into(&self, job: &mut JobPosting, include_description: bool) {
        overwrite(&mut job.title, &self.title);
        overwrite(&mut job.company, &self.company);
        overwrite(&mut job.location, &self.location);
        overwrite(&mut job.salary, &self.salary);
        overwrite(&mut job.job_type, &self.job_type);
        overwrite(&mut job.posted_date, &self.posted_date);

        if include_description {
            overwrite(&mut job.description_html, &self.description_html);
            overwrite(&mut job.description_text, &self.description_text);
        }
    }

    fn from_posting(job: JobPosting) -> Self {
        Self {
            title: job.title,
            company: job.company,
            location: job.location,
            salary: job.salary,
            job_type: job.job_type,
            posted_date: job.posted_date,
            description_html: job.description_html,
            description_text: job.description_text,
        }
    }
}

fn overwrite(target: &mut String, value: &str) {
    if !is_blank(value) {
        *target = value.trim().to_string();
    }
}

fn fill(target: &mut String, value: Option<String>) {
    if is_blank(target) {
        if let Some(value) = value {
            *target = value;
        }
    }
}

/// Selector chains for detail pages
#[derive(Debug)]
pub struct DetailParser {
    title: SelectorChain,
    company: SelectorChain,
    location: SelectorChain,
    salary: SelectorChain,
    job_type: SelectorChain,
    date: SelectorChain,
    description: SelectorChain,
}

impl Default for DetailParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailParser {
    pub fn new() -> Self {
        Self {
            title: SelectorChain::new(TITLE_SELECTORS),
            company: SelectorChain::new(COMPANY_SELECTORS),
            location: SelectorChain::new(LOCATION_SELECTORS),
            salary: SelectorChain::new(SALARY_SELECTORS),
            job_type: SelectorChain::new(JOB_TYPE_SELECTORS),
            date: SelectorChain::new(DATE_SELECTORS),
            description: SelectorChain::new(DESCRIPTION_SELECTORS),
        }
    }

    /// Parses a detail page into [`DetailFields`]
    pub fn parse(&self, html: &str) -> DetailFields {
        let document = Html::parse_document(html);

        let mut fields = extract_from_document(&document)
            .into_iter()
            .next()
            .map(DetailFields::from_posting)
            .unwrap_or_default();

        let root = document.root_element();
        let any = |_: &str| true;

        fill(&mut fields.title, self.title.find_text(root, any));
        fill(&mut fields.company, self.company.find_text(root, any));
        fill(&mut fields.location, self.location.find_text(root, any));
        fill(&mut fields.salary, self.salary.find_text(root, any));
        fill(&mut fields.job_type, self.job_type.find_text(root, any));
        fill(&mut fields.posted_date, self.date.find_text(root, any));
        fill(&mut fields.description_html, self.description.find_inner_html(root));

        if fields.description_text.is_empty() {
            fields.description_text = strip_html(&fields.description_html);
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::types::NOT_SPECIFIED;

    #[test]
    fn test_selectors_fill_detail() {
        let html = r#"
            <html><body>
              <h1> Analista contable </h1>
              <p class="empresa">Estudio Perez</p>
              <span itemprop="employmentType">Tiempo completo</span>
              <div div-link="oferta"><p>Liquidacion de <b>sueldos</b></p></div>
            </body></html>"#;
        let fields = DetailParser::new().parse(html);
        assert_eq!(fields.title, "Analista contable");
        assert_eq!(fields.company, "Estudio Perez");
        assert_eq!(fields.job_type, "Tiempo completo");
        assert_eq!(fields.description_html, "<p>Liquidacion de <b>sueldos</b></p>");
        assert_eq!(fields.description_text, "Liquidacion de sueldos");
        assert!(fields.salary.is_empty());
    }

    #[test]
    fn test_json_ld_wins_over_selectors() {
        let html = r#"
            <html><head><script type="application/ld+json">
              {"@type": "JobPosting", "title": "Desde JSON-LD",
               "baseSalary": {"currency": "ARS", "value": {"minValue": 900}}}
            </script></head>
            <body><h1>Desde h1</h1><span class="location">Mendoza</span></body></html>"#;
        let fields = DetailParser::new().parse(html);
        assert_eq!(fields.title, "Desde JSON-LD");
        assert_eq!(fields.salary, "900 ARS");
        assert_eq!(fields.location, "Mendoza");
    }

    #[test]
    fn test_merge_never_blanks_listing_fields() {
        let mut job = JobPosting::new("Vendedor").unwrap();
        job.company = "ACME".into();
        job.salary = "$ 100".into();
        job.description_text = "corta".into();

        let detail = DetailFields {
            title: "Vendedor senior".into(),
            company: String::new(),
            salary: NOT_SPECIFIED.into(),
            location: "Cordoba".into(),
            description_text: "larga".into(),
            ..DetailFields::default()
        };
        detail.merge_into(&mut job, false);

        assert_eq!(job.title, "Vendedor senior");
        assert_eq!(job.company, "ACME");
        assert_eq!(job.salary, "$ 100");
        assert_eq!(job.location, "Cordoba");
        assert_eq!(job.description_text, "corta");

        detail.merge_into(&mut job, true);
        assert_eq!(job.description_text, "larga");
    }
}
