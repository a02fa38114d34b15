//! Cursor navigation over the diff model.
//!
//! The cursor is a plain index triple plus a pane; every command walks the
//! flattened file → chunk → line sequence looking for the next position a
//! predicate accepts, wrapping around the ends.

mod cursor;
mod navigator;
mod predicate;

pub use cursor::{
    CursorPosition, Side, ViewMode, fix_side, has_content_on_side, scroll_target,
};
pub use navigator::{Direction, NavResult, Navigator, VisiblePosition, find_center_position};
pub use predicate::{NavContext, NavTarget, PositionPredicate};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{DiffChunk, DiffFile, DiffLine, FileStatus, LineOrigin};

    /// Build a file from compact chunk layouts: `.` context, `+` addition,
    /// `-` deletion. Line numbers run on across chunks starting at 1.
    pub fn make_file(path: &str, chunks: &[&str]) -> DiffFile {
        let mut old_lineno = 1;
        let mut new_lineno = 1;
        let mut additions = 0;
        let mut deletions = 0;

        let chunks = chunks
            .iter()
            .map(|layout| {
                let (old_start, new_start) = (old_lineno, new_lineno);
                let lines: Vec<DiffLine> = layout
                    .chars()
                    .map(|c| {
                        let origin = match c {
                            '+' => LineOrigin::Addition,
                            '-' => LineOrigin::Deletion,
                            _ => LineOrigin::Context,
                        };
                        let old = (origin != LineOrigin::Addition).then_some(old_lineno);
                        let new = (origin != LineOrigin::Deletion).then_some(new_lineno);
                        match origin {
                            LineOrigin::Addition => {
                                additions += 1;
                                new_lineno += 1;
                            }
                            LineOrigin::Deletion => {
                                deletions += 1;
                                old_lineno += 1;
                            }
                            LineOrigin::Context => {
                                old_lineno += 1;
                                new_lineno += 1;
                            }
                        }
                        DiffLine {
                            origin,
                            content: format!("{c}"),
                            old_lineno: old,
                            new_lineno: new,
                        }
                    })
                    .collect();
                DiffChunk {
                    header: format!("@@ -{old_start} +{new_start} @@"),
                    old_start,
                    old_lines: old_lineno - old_start,
                    new_start,
                    new_lines: new_lineno - new_start,
                    lines,
                }
            })
            .collect();

        DiffFile {
            path: path.to_string(),
            old_path: None,
            status: FileStatus::Modified,
            additions,
            deletions,
            chunks,
            is_binary: false,
        }
    }
}
