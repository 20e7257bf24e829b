use url::Url;

/// Returns true if both URLs share the same origin (scheme, host and port)
///
/// Default ports are taken into account, so `https://a.com` and
/// `https://a.com:443` share an origin. URLs with opaque origins (`mailto:`,
/// `data:` ...) never match anything.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_harvest::url::same_origin;
///
/// let base = Url::parse("https://docs.example.com/").unwrap();
/// assert!(same_origin(&base, &Url::parse("https://docs.example.com/a").unwrap()));
/// assert!(!same_origin(&base, &Url::parse("http://docs.example.com/a").unwrap()));
/// ```
pub fn same_origin(a: &Url, b: &Url) -> bool {
    let origin = a.origin();
    origin.is_tuple() && origin == b.origin()
}

/// Resolves an href against a base URL
///
/// Returns None for empty hrefs and hrefs that cannot be joined.
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    base.join(href).ok()
}
