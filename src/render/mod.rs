//! Rendering of normalized pages to PDF
//!
//! The crawler only depends on the [`Renderer`] trait; the default
//! implementation drives the `wkhtmltopdf` executable.

mod wkhtmltopdf;

pub use wkhtmltopdf::WkhtmltopdfRenderer;

use crate::HarvestError;
use std::future::Future;
use std::path::Path;

/// Turns an HTML document into a PDF file
pub trait Renderer {
    /// Renders `markup` to a PDF written at `output`
    ///
    /// `title` is the document title recorded in the PDF metadata.
    fn render(
        &self,
        markup: &str,
        title: &str,
        output: &Path,
    ) -> impl Future<Output = Result<(), HarvestError>> + Send;
}
