use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A range of lines for a comment (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Create a new line range
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }
}

impl From<(u32, u32)> for LineRange {
    fn from((start, end): (u32, u32)) -> Self {
        Self::new(start, end)
    }
}

impl From<LineRange> for (u32, u32) {
    fn from(range: LineRange) -> Self {
        (range.start, range.end)
    }
}

/// Where a comment is attached: one line or a `[start, end]` range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentLine {
    Single(u32),
    Range(LineRange),
}

impl CommentLine {
    /// The line a comment is anchored to; a range anchors at its start
    pub fn anchor(&self) -> u32 {
        match self {
            CommentLine::Single(line) => *line,
            CommentLine::Range(range) => range.start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub file: String,
    pub line: CommentLine,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(file: impl Into<String>, line: u32, content: impl Into<String>) -> Self {
        Self::with_line(file, CommentLine::Single(line), content)
    }

    /// Create a new comment spanning a line range
    pub fn new_with_range(
        file: impl Into<String>,
        range: LineRange,
        content: impl Into<String>,
    ) -> Self {
        Self::with_line(file, CommentLine::Range(range), content)
    }

    fn with_line(file: impl Into<String>, line: CommentLine, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file: file.into(),
            line,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn anchor_line(&self) -> u32 {
        self.line.anchor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod line_range_tests {
        use super::*;

        #[test]
        fn new_normalizes_reversed_bounds() {
            let range = LineRange::new(20, 10);
            assert_eq!(range.start, 10);
            assert_eq!(range.end, 20);
        }

        #[test]
        fn line_range_serializes_as_pair() {
            let json = serde_json::to_string(&LineRange::new(10, 20)).unwrap();
            assert_eq!(json, "[10,20]");
        }
    }

    mod comment_tests {
        use super::*;

        #[test]
        fn single_line_comment_anchors_at_its_line() {
            let comment = Comment::new("src/main.rs", 42, "why?");
            assert_eq!(comment.anchor_line(), 42);
            assert_eq!(comment.file, "src/main.rs");
        }

        #[test]
        fn range_comment_anchors_at_range_start() {
            let comment = Comment::new_with_range("src/lib.rs", LineRange::new(30, 12), "split");
            assert_eq!(comment.anchor_line(), 12);
        }

        #[test]
        fn comments_get_distinct_ids() {
            let a = Comment::new("a.rs", 1, "x");
            let b = Comment::new("a.rs", 1, "x");
            assert_ne!(a.id, b.id);
        }

        #[test]
        fn deserializes_scalar_line() {
            let json = r#"{
                "id": "c1",
                "file": "src/app.rs",
                "line": 7,
                "content": "nit",
                "created_at": "2024-01-01T00:00:00Z"
            }"#;
            let comment: Comment = serde_json::from_str(json).unwrap();
            assert_eq!(comment.line, CommentLine::Single(7));
            assert_eq!(comment.anchor_line(), 7);
        }

        #[test]
        fn deserializes_range_line() {
            let json = r#"{
                "id": "c2",
                "file": "src/app.rs",
                "line": [15, 18],
                "content": "extract this",
                "created_at": "2024-01-01T00:00:00Z"
            }"#;
            let comment: Comment = serde_json::from_str(json).unwrap();
            assert_eq!(comment.line, CommentLine::Range(LineRange::new(15, 18)));
            assert_eq!(comment.anchor_line(), 15);
        }
    }
}
