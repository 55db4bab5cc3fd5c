//! Job card extraction from listing HTML
//!
//! Listing markup changes often, so every level (the card container and each
//! field inside it) is resolved through an ordered [`SelectorChain`]: the first
//! selector whose match passes the chain's acceptance check wins.

use crate::extract::text::element_text;
use crate::extract::types::JobPosting;
use crate::url::resolve_url;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Container selectors, most specific first
const CARD_SELECTORS: &[&str] = &[
    "article.box_offer",
    "div.bRS.bClick",
    "article[data-id]",
    "article.offer",
    ".job-item",
];

const TITLE_SELECTORS: &[&str] = &["h2 a", "h3 a", ".js-o-link", "a[data-title]"];
const COMPANY_SELECTORS: &[&str] = &[".fs16.fc_base.mt5", ".company", "p.fs16.fc_base"];
const LOCATION_SELECTORS: &[&str] = &[".fs13.fc_base", ".location", "p.fs13"];
const SALARY_SELECTORS: &[&str] = &[".fs16.fc_base", ".salary", "p.fs16:not(.mt5)"];
const DESCRIPTION_SELECTORS: &[&str] = &[".fs13.fc_base.mt10", ".description", "p.fs13.fc_base"];
const DATE_SELECTORS: &[&str] = &[".fs13.fc_aux", ".date", "p.fs13.fc_aux"];

/// Ordered list of selectors tried until one yields acceptable text
#[derive(Debug)]
pub struct SelectorChain {
    selectors: Vec<(Selector, &'static str)>,
}

impl SelectorChain {
    /// Compiles the chain, skipping (and logging) selectors that fail to parse
    pub fn new(patterns: &[&'static str]) -> Self {
        let selectors = patterns
            .iter()
            .filter_map(|pattern| match Selector::parse(pattern) {
                Ok(selector) => Some((selector, *pattern)),
                Err(e) => {
                    tracing::warn!("Invalid selector '{}': {:?}", pattern, e);
                    None
                }
            })
            .collect();
        Self { selectors }
    }

    /// First element with non-empty text that passes `accept`
    pub fn find_element<'a>(
        &self,
        scope: ElementRef<'a>,
        accept: impl Fn(&str) -> bool,
    ) -> Option<(ElementRef<'a>, String)> {
        for (selector, _) in &self.selectors {
            for element in scope.select(selector) {
                let text = element_text(&element);
                if !text.is_empty() && accept(&text) {
                    return Some((element, text));
                }
            }
        }
        None
    }

    /// Text of the first element with non-empty text that passes `accept`
    pub fn find_text(&self, scope: ElementRef<'_>, accept: impl Fn(&str) -> bool) -> Option<String> {
        self.find_element(scope, accept).map(|(_, text)| text)
    }

    /// Inner HTML of the first element with non-empty text
    pub fn find_inner_html(&self, scope: ElementRef<'_>) -> Option<String> {
        self.find_element(scope, |_| true)
            .map(|(element, _)| element.inner_html().trim().to_string())
    }

    /// All elements matched by the first selector that matches anything
    pub fn select_all<'a>(&self, document: &'a Html) -> Option<(Vec<ElementRef<'a>>, &'static str)> {
        self.selectors.iter().find_map(|(selector, pattern)| {
            let matched: Vec<_> = document.select(selector).collect();
            (!matched.is_empty()).then_some((matched, *pattern))
        })
    }
}

/// Job card parser for listing pages
#[derive(Debug)]
pub struct HtmlExtractor {
    cards: SelectorChain,
    title: SelectorChain,
    company: SelectorChain,
    location: SelectorChain,
    salary: SelectorChain,
    description: SelectorChain,
    date: SelectorChain,
    any_link: Option<Selector>,
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlExtractor {
    pub fn new() -> Self {
        Self {
            cards: SelectorChain::new(CARD_SELECTORS),
            title: SelectorChain::new(TITLE_SELECTORS),
            company: SelectorChain::new(COMPANY_SELECTORS),
            location: SelectorChain::new(LOCATION_SELECTORS),
            salary: SelectorChain::new(SALARY_SELECTORS),
            description: SelectorChain::new(DESCRIPTION_SELECTORS),
            date: SelectorChain::new(DATE_SELECTORS),
            any_link: Selector::parse("a[href]").ok(),
        }
    }

    /// Extracts job cards from a listing page
    ///
    /// # Arguments
    ///
    /// * `html` - The listing page HTML
    /// * `page_url` - URL the page was fetched from; card links resolve against its origin
    ///
    /// # Returns
    ///
    /// One posting per card that yielded a title, in document order.
    pub fn extract(&self, html: &str, page_url: &Url) -> Vec<JobPosting> {
        let document = Html::parse_document(html);
        self.extract_from_document(&document, page_url)
    }

    pub fn extract_from_document(&self, document: &Html, page_url: &Url) -> Vec<JobPosting> {
        let Some((cards, pattern)) = self.cards.select_all(document) else {
            tracing::debug!("No job cards found on {}", page_url);
            return Vec::new();
        };

        tracing::debug!("Matched {} cards with '{}' on {}", cards.len(), pattern, page_url);

        cards
            .into_iter()
            .filter_map(|card| self.parse_card(card, page_url))
            .collect()
    }

    fn parse_card(&self, card: ElementRef<'_>, page_url: &Url) -> Option<JobPosting> {
        let (title, href) = self.title_and_href(card)?;
        let mut job = JobPosting::new(title)?;

        job.url = href
            .and_then(|h| resolve_url(&h, page_url))
            .map(|u| u.to_string())
            .unwrap_or_default();

        job.company = self.company.find_text(card, |_| true).unwrap_or_default();
        job.location = self.location.find_text(card, |_| true).unwrap_or_default();

        let (company, location) = (job.company.clone(), job.location.clone());
        job.salary = self
            .salary
            .find_text(card, |text| {
                text.chars().count() > 2 && text != company && text != location
            })
            .unwrap_or_default();

        job.description_text = self.description.find_text(card, |_| true).unwrap_or_default();
        job.posted_date = self.date.find_text(card, |_| true).unwrap_or_default();

        Some(job)
    }

    /// Title text and raw link, falling back to the card's `data-title`
    fn title_and_href(&self, card: ElementRef<'_>) -> Option<(String, Option<String>)> {
        if let Some((element, text)) = self.title.find_element(card, |_| true) {
            let href = element.value().attr("href").map(str::to_string);
            return Some((text, href));
        }

        let title = card.value().attr("data-title")?.trim();
        if title.is_empty() {
            return None;
        }

        let href = self
            .any_link
            .as_ref()
            .and_then(|s| card.select(s).next())
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);
        Some((title.to_string(), href))
    }
}
