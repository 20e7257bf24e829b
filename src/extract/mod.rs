//! Content extraction module
//!
//! This module turns a raw page into the document that gets rendered:
//! - Shorthand selector parsing and resolution (`#id`, `.class`, `tag`)
//! - Main-content detection with a fixed fallback order
//! - Wrapping the content in a normalized, styled HTML shell

mod content;
mod selector;
mod template;

pub use content::{
    extract, Container, ContentSource, ExtractedDocument, DEFAULT_TITLE, FALLBACK_CONTAINERS,
};
pub use selector::{resolve, Selector};
pub use template::{wrap_document, STYLESHEET};
