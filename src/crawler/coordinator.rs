//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Creating the output directory
//! - Discovering and deduplicating the pages to harvest
//! - Fetching, extracting and rendering each page in order
//! - Merging the rendered artifacts into the final document

use crate::config::Config;
use crate::crawler::discovery::{discover, LinkSet};
use crate::crawler::fetcher::HttpSession;
use crate::crawler::login;
use crate::crawler::scheduler::{QueuedUrl, Scheduler};
use crate::extract::extract;
use crate::output::{
    log_summary, merge_directory, ArtifactMerger, CrawlReport, PageOutcome, PdfMerger,
};
use crate::render::{Renderer, WkhtmltopdfRenderer};
use crate::state::PageState;
use crate::url::LinkFilter;
use crate::HarvestError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Suffix of the normalized HTML written for each page
pub const NORMALIZED_SUFFIX: &str = "_limpio";

/// Main crawler coordinator structure
///
/// Owns everything a run needs. The run state itself (report, indices) lives
/// on the stack of [`Coordinator::run`].
pub struct Coordinator<R, M> {
    config: Config,
    base_url: Url,
    session: HttpSession,
    renderer: R,
    merger: M,
}

impl<R: Renderer, M: ArtifactMerger> Coordinator<R, M> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `base_url` - Page holding the documentation menu
    /// * `session` - Anonymous or logged-in session used for every fetch
    /// * `renderer` - Turns normalized pages into PDFs
    /// * `merger` - Concatenates the PDFs at the end of the run
    pub fn new(
        config: Config,
        base_url: Url,
        session: HttpSession,
        renderer: R,
        merger: M,
    ) -> Self {
        Self {
            config,
            base_url,
            session,
            renderer,
            merger,
        }
    }

    /// Directory receiving every file of the run
    pub fn output_dir(&self) -> &Path {
        Path::new(&self.config.output.directory)
    }

    /// Fetches the base page and returns its links, deduplicated
    ///
    /// The second value is the number of links found before deduplication.
    pub async fn discover_pages(&self) -> Result<(LinkSet, usize), HarvestError> {
        let filter = LinkFilter::new(&self.base_url, self.config.crawl.url_pattern.as_deref())?;

        let links = discover(
            &self.session,
            &self.base_url,
            self.config.crawl.menu_selector.as_deref(),
            &filter,
        )
        .await;

        let discovered = links.len();
        let unique = links.deduplicated();
        if unique.len() < discovered {
            tracing::debug!("Dropped {} duplicate links", discovered - unique.len());
        }

        Ok((unique, discovered))
    }

    /// Runs the whole harvest
    ///
    /// Per-page failures are recorded in the report and never stop the run.
    /// Only an output directory that cannot be created or an invalid URL
    /// pattern abort it. `report.success()` is the outcome of the merge.
    pub async fn run(&self) -> Result<CrawlReport, HarvestError> {
        let output_dir = self.output_dir();
        fs::create_dir_all(output_dir)?;

        let mut report = CrawlReport::new(self.base_url.as_str(), output_dir);

        let (pages, discovered) = self.discover_pages().await?;
        report.links_discovered = discovered;

        let delay = Duration::from_secs(self.config.crawl.delay_seconds);
        let mut scheduler = Scheduler::new(pages, delay);
        let total = scheduler.total();

        while let Some(queued) = scheduler.next_url().await {
            tracing::info!("Processing page {}/{}: {}", queued.index, total, queued.url);
            let outcome = self.process_page(&queued).await;
            report.record(outcome);
        }

        let merged = merge_directory(output_dir, &self.merger);
        report.finish(merged);
        log_summary(&report);

        Ok(report)
    }

    /// Fetches, extracts and renders a single page
    async fn process_page(&self, queued: &QueuedUrl) -> PageOutcome {
        let mut outcome = PageOutcome {
            index: queued.index,
            url: queued.url.to_string(),
            state: PageState::FetchFailed,
            title: None,
            content_source: None,
            artifact: None,
            error: None,
        };

        let page = match self.session.fetch_page(&queued.url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Error downloading {}: {}", queued.url, e);
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };

        let stem = queued.artifact_stem();
        let raw_path = self.artifact_path(&stem, ".html");
        if let Err(e) = fs::write(&raw_path, &page.raw_markup) {
            return self.write_failed(outcome, &raw_path, e);
        }

        let document = extract(&page.raw_markup, self.config.crawl.content_selector.as_deref());
        outcome.title = Some(document.title.clone());
        outcome.content_source = Some(document.source.to_string());

        let normalized_path =
            self.artifact_path(&format!("{}{}", stem, NORMALIZED_SUFFIX), ".html");
        if let Err(e) = fs::write(&normalized_path, &document.normalized_markup) {
            return self.write_failed(outcome, &normalized_path, e);
        }

        let pdf_path = self.artifact_path(&stem, ".pdf");
        match self
            .renderer
            .render(&document.normalized_markup, &document.title, &pdf_path)
            .await
        {
            Ok(()) => {
                outcome.state = PageState::Rendered;
                outcome.artifact = Some(pdf_path);
            }
            Err(e) => {
                tracing::warn!("Error creating PDF for {}: {}", queued.url, e);
                discard_artifact(&pdf_path);
                outcome.state = PageState::RenderFailed;
                outcome.error = Some(e.to_string());
            }
        }

        outcome
    }

    fn artifact_path(&self, stem: &str, extension: &str) -> PathBuf {
        self.output_dir().join(format!("{}{}", stem, extension))
    }

    fn write_failed(
        &self,
        mut outcome: PageOutcome,
        path: &Path,
        e: std::io::Error,
    ) -> PageOutcome {
        tracing::warn!("Could not write {}: {}", path.display(), e);
        outcome.state = PageState::WriteFailed;
        outcome.error = Some(format!("{}: {}", path.display(), e));
        outcome
    }
}

/// Removes whatever a failed render left at `path`
///
/// A failed page must not reach the merge stage, complete or truncated.
fn discard_artifact(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!("Removed partial artifact {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Could not remove {}: {}", path.display(), e),
    }
}

/// Builds the session for a run
///
/// Logs in when the configuration has an `[auth]` section. A failed login is
/// logged and the run continues anonymously.
pub async fn open_session(config: &Config) -> Result<HttpSession, HarvestError> {
    if let Some(auth) = &config.auth {
        if let Some(session) = login(&config.crawl, auth).await {
            return Ok(session);
        }
        tracing::warn!("Login failed, continuing without authentication");
    }

    HttpSession::anonymous(&config.crawl)
}

/// Runs a complete harvest with the default renderer and merger
///
/// # Example
///
/// ```no_run
/// use doc_harvest::config::Config;
/// use doc_harvest::crawler::run_crawl;
/// use doc_harvest::url::parse_base_url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let base_url = parse_base_url("https://docs.example.com/")?;
/// let report = run_crawl(Config::default(), base_url).await?;
/// println!("merged: {}", report.success());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, base_url: Url) -> Result<CrawlReport, HarvestError> {
    let session = open_session(&config).await?;
    let renderer = WkhtmltopdfRenderer::new(config.render.clone());
    let coordinator = Coordinator::new(config, base_url, session, renderer, PdfMerger::new());
    coordinator.run().await
}
