use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl FileStatus {
    pub fn as_char(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineOrigin {
    #[serde(rename = "normal")]
    Context,
    #[serde(rename = "add")]
    Addition,
    #[serde(rename = "delete")]
    Deletion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub origin: LineOrigin,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_lineno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_lineno: Option<u32>,
}

impl DiffLine {
    pub fn is_change(&self) -> bool {
        self.origin != LineOrigin::Context
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffChunk {
    /// The raw `@@ ... @@` line, including any trailing section heading
    pub header: String,
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub lines: Vec<DiffLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffFile {
    pub path: String,
    /// Set only when the old side lives at a different path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    pub status: FileStatus,
    pub additions: u32,
    pub deletions: u32,
    pub chunks: Vec<DiffChunk>,
    #[serde(default)]
    pub is_binary: bool,
}

impl DiffFile {
    /// Path shown to the user, `old -> new` for renames
    pub fn display_path(&self) -> String {
        match &self.old_path {
            Some(old) if self.status == FileStatus::Renamed => format!("{old} -> {}", self.path),
            _ => self.path.clone(),
        }
    }

    pub fn line(&self, chunk_idx: usize, line_idx: usize) -> Option<&DiffLine> {
        self.chunks.get(chunk_idx)?.lines.get(line_idx)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffModel {
    pub files: Vec<DiffFile>,
    pub is_empty: bool,
}

impl DiffModel {
    pub fn empty() -> Self {
        Self {
            files: Vec::new(),
            is_empty: true,
        }
    }

    /// Summed additions and deletions across every file
    pub fn total_counts(&self) -> (u32, u32) {
        self.files.iter().fold((0, 0), |(adds, dels), file| {
            (adds + file.additions, dels + file.deletions)
        })
    }
}
