//! Configuration module for Doc-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line options are layered on top in `main`.
//!
//! # Example
//!
//! ```no_run
//! use doc_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Writing to: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AuthConfig, Config, CrawlConfig, OutputConfig, RenderConfig, DEFAULT_OUTPUT_DIR,
    DEFAULT_USER_AGENT,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
