//! Navigation targets.
//!
//! A target is anything implementing [`PositionPredicate`]. The traversal in
//! [`Navigator`](super::Navigator) never looks at what kind of target it is
//! walking towards; adding a new target means writing a new predicate.

use crate::comment_index::CommentIndex;
use crate::model::{DiffFile, DiffLine, LineOrigin, ReviewedFiles};

use super::cursor::{CursorPosition, ViewMode, has_content_on_side};

/// Everything a predicate may inspect besides the position itself.
#[derive(Debug, Clone, Copy)]
pub struct NavContext<'a> {
    pub files: &'a [DiffFile],
    pub comments: &'a CommentIndex,
    pub reviewed: &'a ReviewedFiles,
    pub view_mode: ViewMode,
}

impl<'a> NavContext<'a> {
    pub fn new(
        files: &'a [DiffFile],
        comments: &'a CommentIndex,
        reviewed: &'a ReviewedFiles,
        view_mode: ViewMode,
    ) -> Self {
        Self {
            files,
            comments,
            reviewed,
            view_mode,
        }
    }

    pub fn file(&self, position: &CursorPosition) -> Option<&'a DiffFile> {
        position.file(self.files)
    }

    pub fn line(&self, position: &CursorPosition) -> Option<&'a DiffLine> {
        position.line(self.files)
    }

    /// Reviewed files are collapsed and hidden from navigation
    pub fn is_collapsed(&self, position: &CursorPosition) -> bool {
        self.file(position)
            .is_some_and(|file| self.reviewed.is_reviewed(&file.path))
    }
}

pub trait PositionPredicate {
    fn matches(&self, position: &CursorPosition, ctx: &NavContext<'_>) -> bool;
}

impl<F> PositionPredicate for F
where
    F: Fn(&CursorPosition, &NavContext<'_>) -> bool,
{
    fn matches(&self, position: &CursorPosition, ctx: &NavContext<'_>) -> bool {
        self(position, ctx)
    }
}

/// The built-in navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    /// Any line with a visible cell on the cursor's side
    Line,
    /// First line of each run of added/removed lines
    Chunk,
    /// New-side lines that have comments anchored on them
    Comment,
    /// First line of each file
    File,
}

impl PositionPredicate for NavTarget {
    fn matches(&self, position: &CursorPosition, ctx: &NavContext<'_>) -> bool {
        if ctx.is_collapsed(position) {
            return false;
        }
        let Some(file) = ctx.file(position) else {
            return false;
        };
        let Some(chunk) = file.chunks.get(position.chunk_idx) else {
            return false;
        };
        let Some(line) = chunk.lines.get(position.line_idx) else {
            return false;
        };

        match self {
            NavTarget::Line => {
                ctx.view_mode == ViewMode::Inline || has_content_on_side(line, position.side)
            }
            NavTarget::Chunk => {
                line.is_change()
                    && (position.line_idx == 0
                        || chunk.lines[position.line_idx - 1].origin == LineOrigin::Context)
            }
            NavTarget::Comment => {
                line.origin != LineOrigin::Deletion
                    && line
                        .new_lineno
                        .is_some_and(|lineno| ctx.comments.contains(&file.path, lineno))
            }
            NavTarget::File => position.chunk_idx == 0 && position.line_idx == 0,
        }
    }
}
