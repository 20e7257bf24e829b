//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - The shared crawl session (anonymous or carrying login cookies)
//! - GET requests to fetch page content
//! - Error classification

use crate::config::CrawlConfig;
use crate::HarvestError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A fetched page
///
/// Created by a successful fetch and dropped once the page has been
/// extracted and rendered.
#[derive(Debug, Clone)]
pub struct Page {
    /// URL that was requested
    pub url: Url,

    /// Response body as text
    pub raw_markup: String,

    pub fetched_at: DateTime<Utc>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawl configuration (user agent, timeout)
/// * `cookies` - Keep cookies between requests (needed for login sessions)
///
/// # Example
///
/// ```no_run
/// use doc_harvest::config::CrawlConfig;
/// use doc_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlConfig::default(), false).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig, cookies: bool) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        .cookie_store(cookies)
        .gzip(true)
        .brotli(true)
        .build()
}

/// The transport handle shared by every fetch of a run
///
/// Either anonymous or produced by [`login`](crate::crawler::login), in which
/// case the client carries the session cookies. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    authenticated: bool,
}

impl HttpSession {
    /// Creates an anonymous session
    pub fn anonymous(config: &CrawlConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            client: build_http_client(config, false)?,
            authenticated: false,
        })
    }

    /// Wraps a client that has completed a login
    pub(crate) fn authenticated(client: Client) -> Self {
        Self {
            client,
            authenticated: true,
        }
    }

    /// Returns true if this session went through a (best-effort) login
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Fetches a page
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `Ok(Page)` |
    /// | Other status | `HarvestError::HttpStatus` |
    /// | Timeout, connection refused, body read error | `HarvestError::Http` |
    pub async fn fetch_page(&self, url: &Url) -> Result<Page, HarvestError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::debug!("Request timeout for {}", url);
            } else if e.is_connect() {
                tracing::debug!("Connection refused for {}", url);
            }
            HarvestError::Http {
                url: url.to_string(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let raw_markup = response.text().await.map_err(|e| HarvestError::Http {
            url: url.to_string(),
            source: e,
        })?;

        Ok(Page {
            url: url.clone(),
            raw_markup,
            fetched_at: Utc::now(),
        })
    }
}
