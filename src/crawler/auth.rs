//! Form login
//!
//! A single token-based login request: fetch the login page, echo back the
//! `csrf_token` hidden field if the form has one, post the credentials and
//! look for failure words in the response. The token detection only knows
//! that one field name; sites using another name get no token.

use crate::config::{AuthConfig, CrawlConfig};
use crate::crawler::fetcher::{build_http_client, HttpSession};
use crate::HarvestError;
use reqwest::Client;
use scraper::{Html, Selector};

/// Name of the anti-forgery field looked up in the login form
pub const CSRF_FIELD: &str = "csrf_token";

/// Form field carrying the username
pub const USERNAME_FIELD: &str = "Username";

/// Form field carrying the password
pub const PASSWORD_FIELD: &str = "Password";

/// Words whose presence in the login response means the login failed
const FAILURE_MARKERS: [&str; 2] = ["incorrect", "invalid"];

/// Logs in and returns an authenticated session
///
/// Returns None (and logs why) when the login page cannot be fetched, the
/// submission fails, or the response contains "incorrect" or "invalid"
/// (case-insensitive). The caller then continues anonymously.
///
/// A returned session is best-effort: the failure check is a text heuristic.
pub async fn login(crawl: &CrawlConfig, auth: &AuthConfig) -> Option<HttpSession> {
    tracing::info!("Logging in as {}", auth.username);

    match try_login(crawl, auth).await {
        Ok(session) => {
            tracing::info!("Login submitted for {}", auth.username);
            Some(session)
        }
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

async fn try_login(crawl: &CrawlConfig, auth: &AuthConfig) -> Result<HttpSession, HarvestError> {
    let client = build_http_client(crawl, true)?;

    let login_page = fetch_text(&client, &auth.login_url).await?;
    let csrf_token = find_csrf_token(&login_page);
    if csrf_token.is_some() {
        tracing::debug!("Found {} field in login form", CSRF_FIELD);
    }

    let mut form = vec![
        (USERNAME_FIELD, auth.username.as_str()),
        (PASSWORD_FIELD, auth.password.as_str()),
    ];
    if let Some(token) = csrf_token.as_deref() {
        form.push((CSRF_FIELD, token));
    }

    let response = client
        .post(&auth.login_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| HarvestError::Auth(format!("login request failed: {}", e)))?;
    let body = response
        .text()
        .await
        .map_err(|e| HarvestError::Auth(format!("login response unreadable: {}", e)))?;

    if looks_like_failure(&body) {
        return Err(HarvestError::Auth(
            "server rejected the credentials".to_string(),
        ));
    }

    Ok(HttpSession::authenticated(client))
}

async fn fetch_text(client: &Client, url: &str) -> Result<String, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| HarvestError::Auth(format!("could not load login page {}: {}", url, e)))?;

    response
        .text()
        .await
        .map_err(|e| HarvestError::Auth(format!("could not read login page {}: {}", url, e)))
}

/// Extracts the value of the `csrf_token` input, if the page has one
pub fn find_csrf_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!("input[name=\"{}\"]", CSRF_FIELD)).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Returns true if a login response reads like a rejection
pub fn looks_like_failure(body: &str) -> bool {
    let body = body.to_lowercase();
    FAILURE_MARKERS.iter().any(|marker| body.contains(marker))
}
