use crate::url::same_origin;
use crate::HarvestError;
use regex::Regex;
use url::Url;

/// Inclusion policy for discovered links
///
/// With an explicit pattern, only the regex decides (origin is ignored).
/// Without one, a link is kept iff it shares the base URL's origin.
#[derive(Debug, Clone)]
pub enum LinkFilter {
    /// Keep links whose absolute form contains a match of the regex
    Pattern(Regex),

    /// Keep links with the same scheme, host and port as this URL
    SameOrigin(Url),
}

impl LinkFilter {
    /// Builds the filter for a crawl from an optional regex pattern
    ///
    /// An empty pattern counts as no pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use doc_harvest::url::LinkFilter;
    ///
    /// let base = Url::parse("https://docs.example.com/").unwrap();
    /// let filter = LinkFilter::new(&base, Some("/api/")).unwrap();
    /// assert!(filter.accepts(&Url::parse("https://mirror.net/api/v1").unwrap()));
    /// ```
    pub fn new(base_url: &Url, pattern: Option<&str>) -> Result<Self, HarvestError> {
        match pattern.filter(|p| !p.is_empty()) {
            Some(pattern) => Regex::new(pattern).map(Self::Pattern).map_err(|e| {
                HarvestError::InvalidInput(format!("invalid URL pattern '{}': {}", pattern, e))
            }),
            None => Ok(Self::SameOrigin(base_url.clone())),
        }
    }

    /// Returns true if the link should be part of the crawl
    pub fn accepts(&self, link: &Url) -> bool {
        match self {
            // Search semantics: a match anywhere in the URL is enough
            Self::Pattern(regex) => regex.is_match(link.as_str()),
            Self::SameOrigin(base) => same_origin(base, link),
        }
    }
}
