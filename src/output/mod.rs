//! Output module for the merged document and run reports
//!
//! This module handles:
//! - Merging the per-page PDFs into the final document
//! - Recording the outcome of every page
//! - Writing a Markdown summary of a run

mod merge;
mod report;

pub use merge::{
    collect_artifacts, merge_directory, ArtifactMerger, PdfMerger, ARTIFACT_EXTENSION,
    MERGED_FILE_NAME,
};
pub use report::{
    format_markdown_report, log_summary, write_markdown_report, CrawlReport, PageOutcome,
};
