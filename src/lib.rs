//! Core of a local diff review tool: builds a line-numbered model from git's
//! unified diff output, indexes line comments, and drives keyboard navigation
//! over the result.

pub mod comment_index;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod nav;

pub use comment_index::CommentIndex;
pub use diff::{FileSummary, build_model};
pub use error::{DiffwalkError, Result};
pub use model::{Comment, DiffChunk, DiffFile, DiffLine, DiffModel, FileStatus, LineOrigin};
pub use nav::{CursorPosition, Direction, NavContext, NavResult, NavTarget, Navigator, Side, ViewMode};
