//! Link discovery
//!
//! This module collects the pages of a documentation site from its index
//! page:
//! - Anchor search, optionally restricted to a navigation menu subtree
//! - Resolution of relative hrefs against the base URL
//! - Scope filtering by regex pattern or same-origin policy
//! - First-seen-order deduplication

use crate::crawler::fetcher::HttpSession;
use crate::extract::Selector;
use crate::url::{resolve_href, LinkFilter};
use scraper::{ElementRef, Html, Selector as CssSelector};
use std::collections::HashSet;
use url::Url;

/// An ordered sequence of absolute URLs
///
/// Discovery keeps duplicates; [`LinkSet::deduplicated`] removes them,
/// keeping the first occurrence of each URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<Url>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, url: Url) {
        self.links.push(url);
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Url> {
        self.links.iter()
    }

    /// Returns the links without repeats, in first-seen order
    ///
    /// URLs are compared by their string form.
    ///
    /// # Example
    ///
    /// ```
    /// use doc_harvest::crawler::LinkSet;
    /// use url::Url;
    ///
    /// let set: LinkSet = ["https://a.com/x", "https://a.com/y", "https://a.com/x"]
    ///     .iter()
    ///     .map(|s| Url::parse(s).unwrap())
    ///     .collect();
    /// let unique = set.deduplicated();
    /// assert_eq!(unique.len(), 2);
    /// assert_eq!(unique.as_slice()[0].as_str(), "https://a.com/x");
    /// ```
    pub fn deduplicated(&self) -> LinkSet {
        let mut seen = HashSet::new();
        self.links
            .iter()
            .filter(|url| seen.insert(url.as_str().to_string()))
            .cloned()
            .collect()
    }

    pub fn as_slice(&self) -> &[Url] {
        &self.links
    }
}

impl FromIterator<Url> for LinkSet {
    fn from_iter<I: IntoIterator<Item = Url>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LinkSet {
    type Item = Url;
    type IntoIter = std::vec::IntoIter<Url>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

/// Collects the in-scope links of a page
///
/// # Rules
///
/// - If `menu_selector` resolves, only anchors inside that element are
///   considered; otherwise the whole page is searched
/// - Anchors without an `href`, or with an empty one, are skipped
/// - Every href is resolved against `base_url`
/// - The `filter` decides which absolute URLs are kept
/// - Document order is preserved and duplicates are kept
///
/// # Example
///
/// ```
/// use doc_harvest::crawler::discover_links;
/// use doc_harvest::url::LinkFilter;
/// use url::Url;
///
/// let base = Url::parse("https://docs.example.com/").unwrap();
/// let html = r#"<a href="/a">A</a><a href="https://other.com/b">B</a>"#;
/// let filter = LinkFilter::new(&base, None).unwrap();
/// let links = discover_links(&base, html, None, &filter);
/// assert_eq!(links.len(), 1);
/// ```
pub fn discover_links(
    base_url: &Url,
    html: &str,
    menu_selector: Option<&str>,
    filter: &LinkFilter,
) -> LinkSet {
    let document = Html::parse_document(html);

    let menu = menu_selector.filter(|s| !s.trim().is_empty()).and_then(|raw| {
        let menu = Selector::parse(raw).and_then(|selector| selector.resolve(&document));
        if menu.is_none() {
            tracing::warn!("Menu '{}' not found, searching the whole page", raw);
        }
        menu
    });

    let scope = menu.unwrap_or_else(|| document.root_element());
    collect_anchors(scope, base_url, filter)
}

fn collect_anchors(scope: ElementRef<'_>, base_url: &Url, filter: &LinkFilter) -> LinkSet {
    let mut links = LinkSet::new();

    let anchor_selector = match CssSelector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return links,
    };

    for anchor in scope.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        match resolve_href(base_url, href) {
            Some(absolute) if filter.accepts(&absolute) => links.push(absolute),
            Some(absolute) => tracing::trace!("Out of scope: {}", absolute),
            None => tracing::debug!("Skipping unresolvable href '{}'", href),
        }
    }

    links
}

/// Fetches the base page and discovers its links
///
/// A failed fetch is logged and yields an empty set; it never aborts the
/// caller.
pub async fn discover(
    session: &HttpSession,
    base_url: &Url,
    menu_selector: Option<&str>,
    filter: &LinkFilter,
) -> LinkSet {
    match session.fetch_page(base_url).await {
        Ok(page) => {
            let links = discover_links(base_url, &page.raw_markup, menu_selector, filter);
            tracing::info!("Found {} documentation pages", links.len());
            links
        }
        Err(e) => {
            tracing::error!("Could not load the index page: {}", e);
            LinkSet::new()
        }
    }
}
