//! Doc-Harvest: documentation site to single PDF
//!
//! This crate crawls a documentation website, extracts the main content of
//! every page it links to, renders each page to PDF and merges the results
//! into one document.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod render;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Doc-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Content not found for selector '{selector}'")]
    ContentNotFound { selector: String },

    #[error("Render failed for {output}: {message}")]
    Render { output: String, message: String },

    #[error("Merge failed: {0}")]
    Merge(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Login failed: {0}")]
    Auth(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Doc-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, HttpSession, LinkSet, Page};
pub use extract::{extract, ExtractedDocument, Selector};
pub use output::{merge_directory, CrawlReport, PdfMerger};
pub use state::PageState;
pub use crate::url::{parse_base_url, LinkFilter};
