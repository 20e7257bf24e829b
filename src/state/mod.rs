//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Final outcome of an individual page (rendered or the step that failed)

mod page_state;

pub use page_state::PageState;
