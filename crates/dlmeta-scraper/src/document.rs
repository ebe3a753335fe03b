//! Narrow HTML query surface the field extractors are written against.
//!
//! Extractors only ever need "first/all elements matching a CSS selector",
//! an element's collapsed text, an attribute, and the next sibling element.
//! Keeping them on this surface means the HTML backend can change without
//! touching extraction logic.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    #[must_use]
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// First element matching `selector`. Invalid selectors match nothing.
    #[must_use]
    pub fn select_first(&self, selector: &str) -> Option<Element<'_>> {
        compile(selector).and_then(|selector| self.html.select(&selector).next().map(Element))
    }

    /// All elements matching `selector`, in document order.
    #[must_use]
    pub fn select_all(&self, selector: &str) -> Vec<Element<'_>> {
        compile(selector)
            .map(|selector| self.html.select(&selector).map(Element).collect())
            .unwrap_or_default()
    }

    /// Re-serialized HTML of the whole page.
    #[must_use]
    pub fn html(&self) -> String {
        self.html.html()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}

/// An element inside a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    /// Text content with whitespace runs collapsed to single spaces and trimmed.
    #[must_use]
    pub fn text(&self) -> String {
        collapse_whitespace(&self.0.text().collect::<String>())
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// First descendant matching `selector`.
    #[must_use]
    pub fn select_first(&self, selector: &str) -> Option<Element<'a>> {
        compile(selector).and_then(|selector| self.0.select(&selector).next().map(Element))
    }

    /// All descendants matching `selector`, in document order.
    #[must_use]
    pub fn select_all(&self, selector: &str) -> Vec<Element<'a>> {
        compile(selector)
            .map(|selector| self.0.select(&selector).map(Element).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn next_element_sibling(&self) -> Option<Element<'a>> {
        self.0.next_siblings().find_map(ElementRef::wrap).map(Element)
    }
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!(selector, error = ?e, "ignoring invalid CSS selector");
            None
        }
    }
}

/// Collapses every whitespace run (including ideographic spaces) to a single
/// ASCII space and trims the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
