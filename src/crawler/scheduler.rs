//! Throttled scheduler for the crawl queue
//!
//! This module handles:
//! - Assigning each page its stable 1-based index before any fetch happens
//! - Handing out pages in crawl order
//! - Enforcing the courtesy delay between consecutive pages
//!
//! Indices fix the artifact names, so a different scheduling strategy (e.g. a
//! bounded worker pool) could replace this one without changing merge order.

use std::collections::VecDeque;
use std::time::Duration;
use url::Url;

/// A URL queued for fetching with its position in the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// 1-based position in the deduplicated link list
    pub index: usize,

    /// The URL to fetch
    pub url: Url,
}

impl QueuedUrl {
    /// File stem shared by every file produced for this page, e.g. `doc_007`
    pub fn artifact_stem(&self) -> String {
        artifact_stem(self.index)
    }
}

/// Zero-padded (3 digits minimum) file stem for a page index
///
/// # Examples
///
/// ```
/// use doc_harvest::crawler::artifact_stem;
///
/// assert_eq!(artifact_stem(1), "doc_001");
/// assert_eq!(artifact_stem(42), "doc_042");
/// assert_eq!(artifact_stem(1234), "doc_1234");
/// ```
pub fn artifact_stem(index: usize) -> String {
    format!("doc_{:03}", index)
}

/// Hands out queued URLs one at a time with a fixed pause between them
///
/// The first URL is returned immediately. Every later call waits for the
/// configured delay first, so no pause follows the last page.
pub struct Scheduler {
    /// Pages not yet handed out, in crawl order
    queue: VecDeque<QueuedUrl>,

    /// Pause between two consecutive pages
    delay: Duration,

    /// Total number of pages scheduled
    total: usize,

    /// Whether a URL has already been handed out
    started: bool,
}

impl Scheduler {
    /// Creates a scheduler over URLs that are already deduplicated
    pub fn new(urls: impl IntoIterator<Item = Url>, delay: Duration) -> Self {
        let queue: VecDeque<QueuedUrl> = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| QueuedUrl { index: i + 1, url })
            .collect();

        Self {
            total: queue.len(),
            queue,
            delay,
            started: false,
        }
    }

    /// Gets the next URL to fetch
    ///
    /// # Returns
    ///
    /// * `Some(QueuedUrl)` - The next page, after the courtesy delay if needed
    /// * `None` - Every page has been handed out
    pub async fn next_url(&mut self) -> Option<QueuedUrl> {
        if self.queue.is_empty() {
            return None;
        }

        if self.started && !self.delay.is_zero() {
            tracing::trace!("Waiting {:?} before next request", self.delay);
            tokio::time::sleep(self.delay).await;
        }
        self.started = true;

        self.queue.pop_front()
    }

    /// Returns the total number of pages scheduled
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns whether every page has been handed out
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
