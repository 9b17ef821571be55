//! HTML attribute extraction
//!
//! Walks the whole parsed document in pre-order and collects the values of one
//! attribute on every element with a given tag name. No selector language is
//! involved; the tag and attribute names are matched literally (ASCII
//! case-insensitive, as HTML names are).

use scraper::{ElementRef, Html};

/// Something that can pull attribute values out of a page body
pub trait Extractor {
    /// Returns the values of `attribute` on every `element`, in document order
    ///
    /// The error string describes why the body could not be parsed.
    fn extract(&self, html: &[u8], element: &str, attribute: &str) -> Result<Vec<String>, String>;
}

impl<T: Extractor + ?Sized> Extractor for &T {
    fn extract(&self, html: &[u8], element: &str, attribute: &str) -> Result<Vec<String>, String> {
        (**self).extract(html, element, attribute)
    }
}

/// Extractor backed by the html5ever parser in `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, html: &[u8], element: &str, attribute: &str) -> Result<Vec<String>, String> {
        let text = String::from_utf8_lossy(html);
        Ok(extract_values(&text, element, attribute))
    }
}

/// Collects `attribute` values from every `element` in `html`
///
/// Malformed markup is repaired the way a browser would before matching.
///
/// # Example
///
/// ```
/// use getter::crawler::extract_values;
///
/// let html = r#"<a href="/one">1</a><p><a href="/two">2</a></p>"#;
/// assert_eq!(extract_values(html, "a", "href"), vec!["/one", "/two"]);
/// ```
pub fn extract_values(html: &str, element: &str, attribute: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        tracing::trace!("Tolerated {} HTML parse errors", document.errors.len());
    }

    let mut values = Vec::new();
    for node in document.tree.root().descendants() {
        let Some(element_ref) = ElementRef::wrap(node) else {
            continue;
        };
        let el = element_ref.value();
        if !el.name().eq_ignore_ascii_case(element) {
            continue;
        }
        for (name, value) in el.attrs() {
            if name.eq_ignore_ascii_case(attribute) {
                values.push(value.to_string());
            }
        }
    }

    tracing::debug!("Extracted {} <{} {}> values", values.len(), element, attribute);
    values
}
