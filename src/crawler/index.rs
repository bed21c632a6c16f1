//! Index page extraction
//!
//! The index lists proposals in tables whose rows start with a short
//! type/status code cell followed by the proposal number, which links to the
//! proposal's detail page:
//!
//! ```html
//! <tr><td><abbr title="Standards Track, Final">SF</abbr></td>
//!     <td class="num"><a href="pep-0008/">8</a></td>
//!     <td>Style Guide for Python Code</td></tr>
//! ```
//!
//! Cells are scanned in document order. A cell whose text matches the key
//! pattern qualifies when the very next table cell matches the number pattern.

use crate::config::SiteConfig;
use crate::model::IndexRecord;
use crate::{ConfigError, ConfigResult, IndexError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Turns an index page into an ordered list of `IndexRecord`s
#[derive(Debug)]
pub struct IndexExtractor {
    base_url: Url,
    container: Selector,
    container_css: String,
    cell: Selector,
    anchor: Selector,
    key_pattern: Regex,
    number_pattern: Regex,
    key_prefix_len: usize,
}

impl IndexExtractor {
    /// Compiles the selectors and patterns named in the site configuration
    pub fn from_config(config: &SiteConfig) -> ConfigResult<Self> {
        let base_url = Url::parse(&config.index_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid index-url: {}", e)))?;

        Ok(Self {
            base_url,
            container: parse_selector(&config.index_container)?,
            container_css: config.index_container.clone(),
            cell: parse_selector("td")?,
            anchor: parse_selector("a[href]")?,
            key_pattern: parse_pattern(&config.key_pattern)?,
            number_pattern: parse_pattern(&config.number_pattern)?,
            key_prefix_len: config.key_prefix_len,
        })
    }

    /// URL detail hrefs are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Extracts index records in document order
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<IndexRecord>)` - One record per qualifying key/number pair
    ///   that carries a resolvable link; pairs without a link are dropped
    /// * `Err(IndexError::MissingContainer)` - The page has no index container
    pub fn extract(&self, html: &str) -> Result<Vec<IndexRecord>, IndexError> {
        let document = Html::parse_document(html);

        let container = document.select(&self.container).next().ok_or_else(|| {
            IndexError::MissingContainer {
                selector: self.container_css.clone(),
            }
        })?;

        let cells: Vec<ElementRef> = container.select(&self.cell).collect();
        let mut records = Vec::new();

        for pair in cells.windows(2) {
            let (key_cell, number_cell) = (pair[0], pair[1]);

            let key_text = cell_text(key_cell);
            if !self.key_pattern.is_match(&key_text) {
                continue;
            }

            let number_text = cell_text(number_cell);
            if !self.number_pattern.is_match(&number_text) {
                continue;
            }

            let Ok(sequence_number) = number_text.parse::<u64>() else {
                tracing::debug!("Ignoring non-integer proposal number '{}'", number_text);
                continue;
            };

            let Some(detail_url) = self.detail_link(number_cell) else {
                tracing::debug!("No detail link for proposal {}, skipping", sequence_number);
                continue;
            };

            records.push(IndexRecord {
                category_key: key_text.chars().skip(self.key_prefix_len).collect(),
                detail_url,
                sequence_number,
            });
        }

        Ok(records)
    }

    /// Finds the detail link inside the number cell, or failing that in the
    /// cells that follow it in the same row
    fn detail_link(&self, number_cell: ElementRef) -> Option<String> {
        let anchor = number_cell.select(&self.anchor).next().or_else(|| {
            number_cell
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find_map(|sibling| sibling.select(&self.anchor).next())
        })?;

        resolve_link(anchor.value().attr("href")?, &self.base_url)
    }
}

/// Trimmed text content of a cell
fn cell_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None for empty hrefs, fragment-only links and anything that does
/// not resolve to http or https.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}

pub(crate) fn parse_selector(css: &str) -> ConfigResult<Selector> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", css, e)))
}

fn parse_pattern(pattern: &str) -> ConfigResult<Regex> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
}
