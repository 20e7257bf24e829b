//! Shorthand selector parsing and resolution
//!
//! Selectors are written as `#id`, `.class` or a bare tag name. They are
//! parsed once into a [`Selector`] and resolved to the first matching
//! element in document order.

use scraper::node::Element;
use scraper::{ElementRef, Html};
use std::fmt;

/// A parsed shorthand selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// `#name`: element whose `id` attribute equals the name
    ById(String),

    /// `.name`: element whose class list contains the name
    ByClass(String),

    /// `name`: element with this tag name (ASCII case-insensitive)
    ByTag(String),
}

impl Selector {
    /// Parses a shorthand selector string
    ///
    /// Returns None for empty input and for a bare `#` or `.` prefix, which
    /// callers treat the same as "no selector given".
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_harvest::extract::Selector;
    ///
    /// assert_eq!(Selector::parse("#nav"), Some(Selector::ById("nav".into())));
    /// assert_eq!(Selector::parse(".toc"), Some(Selector::ByClass("toc".into())));
    /// assert_eq!(Selector::parse("main"), Some(Selector::ByTag("main".into())));
    /// assert_eq!(Selector::parse(""), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        let selector = if let Some(id) = input.strip_prefix('#') {
            Self::ById(id.to_string())
        } else if let Some(class) = input.strip_prefix('.') {
            Self::ByClass(class.to_string())
        } else {
            Self::ByTag(input.to_ascii_lowercase())
        };

        if selector.name().is_empty() {
            None
        } else {
            Some(selector)
        }
    }

    /// The id, class or tag name this selector looks for
    pub fn name(&self) -> &str {
        match self {
            Self::ById(name) | Self::ByClass(name) | Self::ByTag(name) => name,
        }
    }

    /// Returns true if the element satisfies this selector
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::ById(id) => element.id() == Some(id.as_str()),
            Self::ByClass(class) => element.classes().any(|c| c == class),
            Self::ByTag(tag) => element.name().eq_ignore_ascii_case(tag),
        }
    }

    /// Finds the first element in document order matching this selector
    pub fn resolve<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        find_first(document, |element| self.matches(element))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "#{}", id),
            Self::ByClass(class) => write!(f, ".{}", class),
            Self::ByTag(tag) => write!(f, "{}", tag),
        }
    }
}

/// Parses and resolves a shorthand selector string in one step
///
/// Returns None when the string is empty or nothing matches.
pub fn resolve<'a>(selector: &str, document: &'a Html) -> Option<ElementRef<'a>> {
    Selector::parse(selector)?.resolve(document)
}

/// Walks the tree in document order and returns the first element accepted
/// by the predicate
pub(crate) fn find_first<'a, F>(document: &'a Html, predicate: F) -> Option<ElementRef<'a>>
where
    F: Fn(&Element) -> bool,
{
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| predicate(element.value()))
}
