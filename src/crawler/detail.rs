//! Detail page classification
//!
//! A proposal's detail page carries a header field list:
//!
//! ```html
//! <dl class="rfc2822 field-list simple">
//!   <dt class="field-odd">Author<span class="colon">:</span></dt>
//!   <dd class="field-odd">Someone</dd>
//!   <dt class="field-even">Status<span class="colon">:</span></dt>
//!   <dd class="field-even"><abbr title="...">Active</abbr></dd>
//! </dl>
//! ```
//!
//! The page is flattened once into `(label, value)` fields: the first label
//! in the document, then its sibling labels in order, each paired with the
//! `dd` that follows it.

use crate::config::DetailConfig;
use crate::crawler::index::parse_selector;
use crate::ConfigResult;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// The detail page has no field with the status label
#[derive(Debug, Clone, Error)]
#[error("field '{label}' not found on detail page")]
pub struct FieldNotFound {
    pub label: String,
}

/// A labeled header field of a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,

    /// Text of the value element paired with the label, if any
    pub value: Option<String>,
}

/// Reads the declared status off a detail page
#[derive(Debug)]
pub struct DetailClassifier {
    label: Selector,
    status_label: String,
}

impl DetailClassifier {
    pub fn from_config(config: &DetailConfig) -> ConfigResult<Self> {
        Ok(Self {
            label: parse_selector(&config.label_selector)?,
            status_label: config.status_label.trim().to_string(),
        })
    }

    /// Extracts the declared status
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Trimmed text of the status value
    /// * `Err(FieldNotFound)` - No status label, or the label has no value
    pub fn classify(&self, html: &str) -> Result<String, FieldNotFound> {
        let document = Html::parse_document(html);

        let status = fields(&document, &self.label)
            .find(|field| field.label == self.status_label)
            .and_then(|field| field.value);

        status.ok_or_else(|| FieldNotFound {
            label: self.status_label.clone(),
        })
    }
}

/// Header fields of a page in document order
///
/// Starts at the first element matching `label` and walks its following
/// siblings, ignoring siblings that are not labels.
pub fn fields<'a>(document: &'a Html, label: &'a Selector) -> impl Iterator<Item = Field> + 'a {
    let first = document.select(label).next();

    first
        .into_iter()
        .chain(first.into_iter().flat_map(move |first| {
            first
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .filter(move |sibling| label.matches(sibling))
        }))
        .map(|label_element| Field {
            label: element_text(label_element),
            value: paired_value(label_element).map(element_text),
        })
}

/// The `dd` element that follows a label
fn paired_value(label: ElementRef) -> Option<ElementRef> {
    label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "dd")
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
