//! Crawler module for page discovery, fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through a shared (optionally logged-in) session
//! - Form login
//! - Link discovery from the documentation menu
//! - Throttled scheduling of the pages to fetch
//! - Overall crawl coordination

mod auth;
mod coordinator;
mod discovery;
mod fetcher;
mod scheduler;

pub use auth::{
    find_csrf_token, login, looks_like_failure, CSRF_FIELD, PASSWORD_FIELD, USERNAME_FIELD,
};
pub use coordinator::{open_session, run_crawl, Coordinator, NORMALIZED_SUFFIX};
pub use discovery::{discover, discover_links, LinkSet};
pub use fetcher::{build_http_client, HttpSession, Page};
pub use scheduler::{artifact_stem, QueuedUrl, Scheduler};
