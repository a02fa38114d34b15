use std::collections::HashMap;

use crate::model::Comment;

/// Lookup of comments by `"<path>:<anchor line>"`.
///
/// This is a derived view over the comment list: rebuild it whenever the list
/// changes instead of patching it.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    by_anchor: HashMap<String, Vec<Comment>>,
}

pub fn index_key(path: &str, line: u32) -> String {
    format!("{path}:{line}")
}

impl CommentIndex {
    pub fn build(comments: &[Comment]) -> Self {
        let mut by_anchor: HashMap<String, Vec<Comment>> = HashMap::with_capacity(comments.len());
        for comment in comments {
            by_anchor
                .entry(index_key(&comment.file, comment.anchor_line()))
                .or_default()
                .push(comment.clone());
        }
        Self { by_anchor }
    }

    pub fn get(&self, path: &str, line: u32) -> &[Comment] {
        self.by_anchor
            .get(&index_key(path, line))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, path: &str, line: u32) -> bool {
        self.by_anchor.contains_key(&index_key(path, line))
    }

    /// Number of distinct anchors
    pub fn len(&self) -> usize {
        self.by_anchor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_anchor.is_empty()
    }

    pub fn comment_count(&self) -> usize {
        self.by_anchor.values().map(Vec::len).sum()
    }
}
