//! Main-content extraction
//!
//! Picks the subtree of a page that holds the documentation itself and
//! wraps it in the normalized document shell.

use crate::extract::selector::{find_first, Selector};
use crate::extract::template::wrap_document;
use crate::HarvestError;
use scraper::node::Element;
use scraper::{Html, Selector as CssSelector};
use std::fmt;

/// Title used when a page declares none
pub const DEFAULT_TITLE: &str = "Documentación";

/// A conventional main-content container tried when no selector is given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    /// Shorthand used in logs, e.g. `div#content`
    pub label: &'static str,
    tag: &'static str,
    id: Option<&'static str>,
    class: Option<&'static str>,
}

impl Container {
    const fn tag(label: &'static str, tag: &'static str) -> Self {
        Self {
            label,
            tag,
            id: None,
            class: None,
        }
    }

    const fn with_id(label: &'static str, tag: &'static str, id: &'static str) -> Self {
        Self {
            label,
            tag,
            id: Some(id),
            class: None,
        }
    }

    const fn with_class(label: &'static str, tag: &'static str, class: &'static str) -> Self {
        Self {
            label,
            tag,
            id: None,
            class: Some(class),
        }
    }

    fn matches(&self, element: &Element) -> bool {
        element.name() == self.tag
            && self.id.map_or(true, |id| element.id() == Some(id))
            && self
                .class
                .map_or(true, |class| element.classes().any(|c| c == class))
    }
}

/// Containers tried in priority order when no content selector is given
pub const FALLBACK_CONTAINERS: [Container; 6] = [
    Container::tag("main", "main"),
    Container::tag("article", "article"),
    Container::with_class("div.content", "div", "content"),
    Container::with_id("div#content", "div", "content"),
    Container::with_class("div.main-content", "div", "main-content"),
    Container::with_id("div#main", "div", "main"),
];

/// Which rule produced the body of an extracted document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// The caller's content selector resolved
    Selector(Selector),

    /// One of the fallback containers matched
    Container(&'static str),

    /// Nothing matched; the `<body>` element was used
    Body,

    /// The content selector did not resolve; the raw page is used unchanged
    RawMarkup,
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(selector) => write!(f, "selector {}", selector),
            Self::Container(label) => write!(f, "container {}", label),
            Self::Body => write!(f, "body"),
            Self::RawMarkup => write!(f, "raw markup"),
        }
    }
}

/// The content of one page, ready to be rendered
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Page title, or [`DEFAULT_TITLE`]
    pub title: String,

    /// Outer HTML of the selected subtree
    pub body_markup: String,

    /// Complete document handed to the renderer
    pub normalized_markup: String,

    pub source: ContentSource,
}

impl ExtractedDocument {
    /// Returns true if the content selector failed and the raw page was kept
    pub fn is_fallback(&self) -> bool {
        self.source == ContentSource::RawMarkup
    }
}

/// Extracts the main content of a page
///
/// With a content selector, its first match becomes the body. If it matches
/// nothing, a "content not found" warning is logged and the raw page is used
/// as-is. Without a selector, [`FALLBACK_CONTAINERS`] are tried in order,
/// then the `<body>` element.
///
/// # Example
///
/// ```
/// use doc_harvest::extract::extract;
///
/// let page = "<html><head><title>Intro</title></head><body><main>Hello</main></body></html>";
/// let doc = extract(page, None);
/// assert_eq!(doc.title, "Intro");
/// assert_eq!(doc.body_markup, "<main>Hello</main>");
/// ```
pub fn extract(markup: &str, selector: Option<&str>) -> ExtractedDocument {
    let document = Html::parse_document(markup);
    let title = extract_title(&document);

    let selector = selector.filter(|s| !s.trim().is_empty());

    let found = match selector {
        Some(raw) => match Selector::parse(raw) {
            Some(parsed) => parsed
                .resolve(&document)
                .map(|element| (element.html(), ContentSource::Selector(parsed))),
            None => None,
        },
        None => FALLBACK_CONTAINERS
            .iter()
            .find_map(|container| {
                find_first(&document, |element| container.matches(element))
                    .map(|element| (element.html(), ContentSource::Container(container.label)))
            })
            .or_else(|| body_element(&document).map(|html| (html, ContentSource::Body))),
    };

    match found {
        Some((body_markup, source)) => {
            tracing::debug!("Extracted content of '{}' using {}", title, source);
            let normalized_markup = wrap_document(&title, &body_markup);
            ExtractedDocument {
                title,
                body_markup,
                normalized_markup,
                source,
            }
        }
        None => {
            let not_found = HarvestError::ContentNotFound {
                selector: selector.unwrap_or("body").to_string(),
            };
            tracing::warn!("{}, keeping the full page", not_found);
            ExtractedDocument {
                title,
                body_markup: markup.to_string(),
                normalized_markup: markup.to_string(),
                source: ContentSource::RawMarkup,
            }
        }
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    CssSelector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| element.text().collect::<String>().trim().to_string())
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

fn body_element(document: &Html) -> Option<String> {
    find_first(document, |element| element.name() == "body").map(|element| element.html())
}
