//! Builds the line-numbered diff model from git's unified diff output.
//!
//! The raw text is split into `diff --git` blocks which are paired, in order,
//! with the per-file summaries. Summary counts are authoritative for the
//! file totals; the hunk lines are only scanned for structure.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{DiffChunk, DiffFile, DiffLine, DiffModel, FileStatus, LineOrigin};

use super::summary::FileSummary;

const BLOCK_DELIMITER: &str = "diff --git ";
const NULL_PATH: &str = "/dev/null";

static FILE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z]/)?(.+?) (?:[a-z]/)?(.+)$").expect("file header regex should be valid")
});

static HUNK_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@")
        .expect("hunk header regex should be valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub additions: u32,
    pub deletions: u32,
}

/// Build the diff model from raw `git diff` text and its per-file summaries.
///
/// Blocks whose header cannot be parsed, or that have no matching summary,
/// are dropped; nothing here fails on malformed content.
pub fn build_model(raw_diff: &str, summaries: &[FileSummary]) -> DiffModel {
    if raw_diff.trim().is_empty() {
        return DiffModel::empty();
    }

    let blocks = split_blocks(raw_diff);
    if blocks.len() != summaries.len() {
        log::warn!(
            "diff has {} file blocks but {} summaries",
            blocks.len(),
            summaries.len()
        );
    }

    let files: Vec<DiffFile> = blocks
        .iter()
        .enumerate()
        .filter_map(|(idx, block)| {
            let Some(summary) = summaries.get(idx) else {
                log::debug!("skipping diff block {idx}: no summary entry");
                return None;
            };
            build_file(block, summary)
        })
        .collect();

    DiffModel {
        is_empty: files.is_empty(),
        files,
    }
}

/// Count add and delete lines across `chunks`.
pub fn count_lines_from_chunks(chunks: &[DiffChunk]) -> LineCounts {
    chunks
        .iter()
        .flat_map(|chunk| &chunk.lines)
        .fold(LineCounts::default(), |mut counts, line| {
            match line.origin {
                LineOrigin::Addition => counts.additions += 1,
                LineOrigin::Deletion => counts.deletions += 1,
                LineOrigin::Context => {}
            }
            counts
        })
}

/// Derive per-file summaries from the patch itself, for input that arrives
/// without `--numstat` output.
pub fn infer_summaries(raw_diff: &str) -> Vec<FileSummary> {
    split_blocks(raw_diff)
        .iter()
        .map(|block| {
            let body = block.get(1..).unwrap_or_default();
            let is_binary = body
                .iter()
                .any(|line| line.starts_with("Binary files ") || *line == "GIT binary patch");
            if is_binary {
                return FileSummary::binary();
            }
            let counts = count_lines_from_chunks(&parse_chunks(body));
            FileSummary::new(counts.additions, counts.deletions)
        })
        .collect()
}

/// Split on delimiter lines. Text before the first delimiter is discarded.
fn split_blocks(raw_diff: &str) -> Vec<Vec<&str>> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in raw_diff.lines() {
        if line.starts_with(BLOCK_DELIMITER) {
            blocks.extend(current.take());
            current = Some(vec![line]);
        } else if let Some(block) = current.as_mut() {
            block.push(line);
        }
    }
    blocks.extend(current);

    blocks
}

fn build_file(block: &[&str], summary: &FileSummary) -> Option<DiffFile> {
    let (header, body) = block.split_first()?;
    let header = header.strip_prefix(BLOCK_DELIMITER)?;

    let Some((mut old_path, mut new_path)) = parse_file_header(header) else {
        log::warn!("dropping diff block with unparsable header: {header:?}");
        return None;
    };

    let markers = FileMarkers::scan(body);
    if let Some(from) = &markers.rename_from {
        old_path = from.clone();
    }
    if let Some(to) = &markers.rename_to {
        new_path = to.clone();
    }

    let status = determine_status(&markers, &old_path, &new_path, summary);

    let chunks = if summary.binary {
        Vec::new()
    } else {
        parse_chunks(body)
    };

    if !summary.binary {
        let counted = count_lines_from_chunks(&chunks);
        if counted.additions != summary.insertions || counted.deletions != summary.deletions {
            log::debug!(
                "{new_path}: summary reports +{}/-{} but hunks contain +{}/-{}",
                summary.insertions,
                summary.deletions,
                counted.additions,
                counted.deletions
            );
        }
    }

    Some(DiffFile {
        old_path: (old_path != new_path).then_some(old_path),
        path: new_path,
        status,
        additions: summary.insertions,
        deletions: summary.deletions,
        chunks,
        is_binary: summary.binary,
    })
}

fn parse_file_header(header: &str) -> Option<(String, String)> {
    if let Some(path) = unchanged_header_path(header) {
        return Some((path.to_string(), path.to_string()));
    }
    let caps = FILE_HEADER_RE.captures(header)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// An unchanged path shows up twice in the header with equal-length prefixes,
/// so the separating space sits exactly in the middle. This is the only split
/// that works when the path itself contains spaces.
fn unchanged_header_path(header: &str) -> Option<&str> {
    let mid = header.len() / 2;
    if header.len() % 2 == 0 || header.as_bytes().get(mid) != Some(&b' ') {
        return None;
    }
    let old = strip_side_prefix(header.get(..mid)?);
    let new = strip_side_prefix(header.get(mid + 1..)?);
    (old == new && !old.is_empty()).then_some(new)
}

/// Drop a single-letter `x/` prefix such as `a/`, `b/`, `i/` or `w/`
fn strip_side_prefix(path: &str) -> &str {
    match path.as_bytes() {
        [letter, b'/', _, ..] if letter.is_ascii_lowercase() => &path[2..],
        _ => path,
    }
}

/// File-mode and path markers found between the block header and the first hunk.
#[derive(Debug, Default)]
struct FileMarkers {
    new_file: bool,
    deleted_file: bool,
    old_side_null: bool,
    new_side_null: bool,
    /// A `--- <path>` line naming a real file
    old_side_live: bool,
    /// A `+++ <path>` line naming a real file
    new_side_live: bool,
    rename_from: Option<String>,
    rename_to: Option<String>,
}

impl FileMarkers {
    fn scan(body: &[&str]) -> Self {
        let mut markers = Self::default();

        for line in body {
            if line.starts_with("@@") {
                break;
            }

            if line.starts_with("new file mode") {
                markers.new_file = true;
            } else if line.starts_with("deleted file mode") {
                markers.deleted_file = true;
            } else if let Some(path) = line.strip_prefix("--- ") {
                if side_path(path) == NULL_PATH {
                    markers.old_side_null = true;
                } else {
                    markers.old_side_live = true;
                }
            } else if let Some(path) = line.strip_prefix("+++ ") {
                if side_path(path) == NULL_PATH {
                    markers.new_side_null = true;
                } else {
                    markers.new_side_live = true;
                }
            } else if let Some(path) = line.strip_prefix("rename from ") {
                markers.rename_from = Some(path.to_string());
            } else if let Some(path) = line.strip_prefix("rename to ") {
                markers.rename_to = Some(path.to_string());
            }
        }

        markers
    }
}

/// Strip a trailing tab-separated timestamp from a `---`/`+++` path
fn side_path(path: &str) -> &str {
    path.split('\t').next().unwrap_or(path).trim_end()
}

/// Markers beat paths, and paths beat counts. The count fallbacks only apply
/// when the block does not show a live file on the side they would remove.
fn determine_status(
    markers: &FileMarkers,
    old_path: &str,
    new_path: &str,
    summary: &FileSummary,
) -> FileStatus {
    if markers.new_file || markers.old_side_null {
        FileStatus::Added
    } else if markers.deleted_file || markers.new_side_null {
        FileStatus::Deleted
    } else if old_path != new_path {
        FileStatus::Renamed
    } else if summary.insertions > 0 && summary.deletions == 0 && !markers.old_side_live {
        FileStatus::Added
    } else if summary.deletions > 0 && summary.insertions == 0 && !markers.new_side_live {
        FileStatus::Deleted
    } else {
        FileStatus::Modified
    }
}

fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32)> {
    let caps = HUNK_HEADER_RE.captures(line)?;
    let num = |idx: usize| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };
    Some((num(1)?, num(2)?, num(3)?, num(4)?))
}

/// Running state for the chunk currently being filled
struct OpenChunk {
    chunk: DiffChunk,
    old_lineno: u32,
    new_lineno: u32,
}

impl OpenChunk {
    fn new(header: &str, (old_start, old_lines, new_start, new_lines): (u32, u32, u32, u32)) -> Self {
        Self {
            chunk: DiffChunk {
                header: header.to_string(),
                old_start,
                old_lines,
                new_start,
                new_lines,
                lines: Vec::new(),
            },
            old_lineno: old_start,
            new_lineno: new_start,
        }
    }

    /// Whether the header's line counts still expect more lines
    fn expects_more(&self) -> bool {
        self.old_lineno < self.chunk.old_start.saturating_add(self.chunk.old_lines)
            || self.new_lineno < self.chunk.new_start.saturating_add(self.chunk.new_lines)
    }

    fn push(&mut self, origin: LineOrigin, content: &str) {
        let old_lineno = (origin != LineOrigin::Addition).then_some(self.old_lineno);
        let new_lineno = (origin != LineOrigin::Deletion).then_some(self.new_lineno);

        if origin != LineOrigin::Addition {
            self.old_lineno += 1;
        }
        if origin != LineOrigin::Deletion {
            self.new_lineno += 1;
        }

        self.chunk.lines.push(DiffLine {
            origin,
            content: content.to_string(),
            old_lineno,
            new_lineno,
        });
    }
}

fn parse_chunks(body: &[&str]) -> Vec<DiffChunk> {
    let mut chunks = Vec::new();
    let mut open: Option<OpenChunk> = None;

    for line in body {
        if line.starts_with("@@") {
            chunks.extend(open.take().map(|o| o.chunk));
            match parse_hunk_header(line) {
                Some(range) => open = Some(OpenChunk::new(line, range)),
                None => log::debug!("ignoring malformed hunk header: {line:?}"),
            }
            continue;
        }

        let Some(current) = open.as_mut() else {
            continue;
        };

        if let Some(content) = line.strip_prefix('+') {
            current.push(LineOrigin::Addition, content);
        } else if let Some(content) = line.strip_prefix('-') {
            current.push(LineOrigin::Deletion, content);
        } else if let Some(content) = line.strip_prefix(' ') {
            current.push(LineOrigin::Context, content);
        } else if line.is_empty() && current.expects_more() {
            // Blank context line whose leading space was stripped in transit
            current.push(LineOrigin::Context, "");
        }
    }
    chunks.extend(open.map(|o| o.chunk));

    chunks
}
