//! Per-file change summaries that accompany the raw diff text.
//!
//! The summary array is positional: entry `i` describes the `i`-th
//! `diff --git` block. Git produces it with `git diff --numstat` over the same
//! revisions as the patch itself.

use serde::{Deserialize, Serialize};

use crate::error::{DiffwalkError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub insertions: u32,
    pub deletions: u32,
    pub binary: bool,
}

impl FileSummary {
    pub fn new(insertions: u32, deletions: u32) -> Self {
        Self {
            insertions,
            deletions,
            binary: false,
        }
    }

    pub fn binary() -> Self {
        Self {
            insertions: 0,
            deletions: 0,
            binary: true,
        }
    }
}

/// Parse `git diff --numstat` output.
///
/// Each line is `<insertions>\t<deletions>\t<path>`; binary files report `-`
/// for both counts. Blank lines are skipped.
pub fn parse_numstat(text: &str) -> Result<Vec<FileSummary>> {
    let mut summaries = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.splitn(3, '\t');
        let (Some(ins), Some(del), Some(_path)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(DiffwalkError::InvalidSummary {
                line: idx + 1,
                reason: "expected three tab-separated fields".to_string(),
            });
        };

        if ins == "-" && del == "-" {
            summaries.push(FileSummary::binary());
            continue;
        }

        let parse_count = |field: &str, name: &str| {
            field.parse::<u32>().map_err(|_| DiffwalkError::InvalidSummary {
                line: idx + 1,
                reason: format!("{name} count '{field}' is not a number"),
            })
        };

        summaries.push(FileSummary::new(
            parse_count(ins, "insertion")?,
            parse_count(del, "deletion")?,
        ));
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_text_and_binary_entries() {
        let numstat = "3\t1\tsrc/main.rs\n-\t-\tassets/logo.png\n0\t0\told.gif => new.gif\n";
        let summaries = parse_numstat(numstat).unwrap();
        assert_eq!(
            summaries,
            vec![
                FileSummary::new(3, 1),
                FileSummary::binary(),
                FileSummary::new(0, 0),
            ]
        );
    }

    #[test]
    fn should_skip_blank_lines() {
        let summaries = parse_numstat("\n1\t2\ta.rs\n\n").unwrap();
        assert_eq!(summaries, vec![FileSummary::new(1, 2)]);
    }

    #[test]
    fn should_keep_tabs_inside_paths() {
        let summaries = parse_numstat("1\t0\tweird\tname.txt").unwrap();
        assert_eq!(summaries, vec![FileSummary::new(1, 0)]);
    }

    #[test]
    fn should_reject_missing_fields() {
        let err = parse_numstat("1\t2").unwrap_err();
        assert!(matches!(err, DiffwalkError::InvalidSummary { line: 1, .. }));
    }

    #[test]
    fn should_reject_non_numeric_counts() {
        let err = parse_numstat("1\t2\ta.rs\nx\t2\tb.rs").unwrap_err();
        assert!(matches!(err, DiffwalkError::InvalidSummary { line: 2, .. }));
    }
}
