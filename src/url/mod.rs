//! URL handling module for Doc-Harvest
//!
//! This module provides base URL validation, href resolution, origin
//! comparison and the inclusion policy applied to discovered links.

mod filter;
mod origin;

pub use filter::LinkFilter;
pub use origin::{resolve_href, same_origin};

use crate::HarvestError;
use url::Url;

/// Parses and validates the base URL of a crawl
///
/// The URL must parse and carry both a scheme and a host. This is the only
/// fatal input check of a run and happens before any network activity.
///
/// # Examples
///
/// ```
/// use doc_harvest::url::parse_base_url;
///
/// assert!(parse_base_url("https://docs.example.com/").is_ok());
/// assert!(parse_base_url("docs.example.com").is_err());
/// assert!(parse_base_url("mailto:someone@example.com").is_err());
/// ```
pub fn parse_base_url(input: &str) -> Result<Url, HarvestError> {
    let url = Url::parse(input.trim())
        .map_err(|e| HarvestError::InvalidInput(format!("'{}' is not a valid URL: {}", input, e)))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(HarvestError::InvalidInput(format!(
            "'{}' has no host",
            input
        ))),
    }
}
