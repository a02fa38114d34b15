//! Turning git's text output into the review model.

mod builder;
mod summary;

pub use builder::{LineCounts, build_model, count_lines_from_chunks, infer_summaries};
pub use summary::{FileSummary, parse_numstat};
