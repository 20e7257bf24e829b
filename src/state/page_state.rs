/// Page state definitions for tracking crawl progress
///
/// Every page of a run ends in exactly one of these states.
use std::fmt;

/// Final state of a page in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Terminal Success States =====
    /// Page was fetched, extracted and rendered to its PDF artifact
    Rendered,

    // ===== Terminal Error States =====
    /// Fetch failed (network error or non-2xx status)
    FetchFailed,

    /// Raw or normalized HTML could not be written to the output directory
    WriteFailed,

    /// The renderer failed to produce the PDF
    RenderFailed,
}

impl PageState {
    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Rendered)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// All states, in report order
    pub fn all() -> [PageState; 4] {
        [
            Self::Rendered,
            Self::FetchFailed,
            Self::WriteFailed,
            Self::RenderFailed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rendered => "Rendered",
            Self::FetchFailed => "Fetch Failed",
            Self::WriteFailed => "Write Failed",
            Self::RenderFailed => "Render Failed",
        };
        write!(f, "{}", s)
    }
}
