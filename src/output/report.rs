//! Crawl report
//!
//! Collects the outcome of every page of a run and renders it as a log
//! summary or a Markdown file.

use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome of one page
#[derive(Debug, Clone)]
pub struct PageOutcome {
    /// 1-based crawl index (the `NNN` of `doc_NNN`)
    pub index: usize,

    pub url: String,

    pub state: PageState,

    /// Title of the extracted document, when extraction ran
    pub title: Option<String>,

    /// Rule that produced the content, when extraction ran
    pub content_source: Option<String>,

    /// Rendered PDF, when rendering succeeded
    pub artifact: Option<PathBuf>,

    /// Error description for failed pages
    pub error: Option<String>,
}

/// Summary of a whole run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub base_url: String,

    pub output_dir: PathBuf,

    pub started_at: DateTime<Utc>,

    pub finished_at: Option<DateTime<Utc>>,

    /// Links found before deduplication
    pub links_discovered: usize,

    pub pages: Vec<PageOutcome>,

    /// Whether the final merge produced the combined PDF
    pub merged: bool,
}

impl CrawlReport {
    pub fn new(base_url: &str, output_dir: &Path) -> Self {
        Self {
            base_url: base_url.to_string(),
            output_dir: output_dir.to_path_buf(),
            started_at: Utc::now(),
            finished_at: None,
            links_discovered: 0,
            pages: Vec::new(),
            merged: false,
        }
    }

    pub fn record(&mut self, outcome: PageOutcome) {
        self.pages.push(outcome);
    }

    /// Marks the run as finished with the merge outcome
    pub fn finish(&mut self, merged: bool) {
        self.merged = merged;
        self.finished_at = Some(Utc::now());
    }

    /// The run's success signal: the outcome of the merge stage alone
    pub fn success(&self) -> bool {
        self.merged
    }

    /// Number of pages per final state
    pub fn counts(&self) -> HashMap<PageState, usize> {
        let mut counts = HashMap::new();
        for page in &self.pages {
            *counts.entry(page.state).or_insert(0) += 1;
        }
        counts
    }

    pub fn rendered(&self) -> usize {
        self.pages.iter().filter(|p| p.state.is_success()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &PageOutcome> {
        self.pages.iter().filter(|p| p.state.is_error())
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Logs the summary of a run
pub fn log_summary(report: &CrawlReport) {
    tracing::info!(
        "Run finished: {} of {} pages rendered, merge {}",
        report.rendered(),
        report.pages.len(),
        if report.merged { "succeeded" } else { "failed" }
    );

    for page in report.failed() {
        tracing::warn!(
            "  {} {} [{}]: {}",
            page.index,
            page.url,
            page.state,
            page.error.as_deref().unwrap_or("unknown error")
        );
    }
}

/// Writes the report as Markdown
pub fn write_markdown_report(report: &CrawlReport, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(format_markdown_report(report).as_bytes())
}

/// Formats a crawl report as Markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Doc-Harvest Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Base URL**: {}\n", report.base_url));
    md.push_str(&format!(
        "- **Output Directory**: {}\n",
        report.output_dir.display()
    ));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    md.push_str(&format!(
        "- **Links Discovered**: {} ({} unique)\n",
        report.links_discovered,
        report.pages.len()
    ));
    md.push_str(&format!(
        "- **Merged PDF**: {}\n\n",
        if report.merged { "yes" } else { "no" }
    ));

    md.push_str("## Page State Breakdown\n\n");
    md.push_str("| State | Count |\n");
    md.push_str("|-------|-------|\n");
    let counts = report.counts();
    for state in PageState::all() {
        md.push_str(&format!(
            "| {} | {} |\n",
            state,
            counts.get(&state).copied().unwrap_or(0)
        ));
    }
    md.push('\n');

    if !report.pages.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| # | URL | Title | Content | State |\n");
        md.push_str("|---|-----|-------|---------|-------|\n");
        for page in &report.pages {
            md.push_str(&format!(
                "| {:03} | {} | {} | {} | {} |\n",
                page.index,
                page.url,
                escape_cell(page.title.as_deref().unwrap_or("-")),
                page.content_source.as_deref().unwrap_or("-"),
                page.state
            ));
        }
        md.push('\n');
    }

    let failed: Vec<&PageOutcome> = report.failed().collect();
    if !failed.is_empty() {
        md.push_str("## Errors\n\n");
        for page in failed {
            md.push_str(&format!(
                "- **{:03}** {}: {}\n",
                page.index,
                page.url,
                page.error.as_deref().unwrap_or("unknown error")
            ));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
