use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Files the reviewer has marked as done. Reviewed files render collapsed and
/// are skipped by every navigation target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewedFiles {
    paths: BTreeSet<String>,
}

impl ReviewedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reviewed(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Flip the reviewed flag for `path`, returning the new state
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.paths.remove(path) {
            false
        } else {
            self.paths.insert(path.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ReviewedFiles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_toggle_reviewed_state() {
        let mut reviewed = ReviewedFiles::new();
        assert!(reviewed.toggle("src/main.rs"));
        assert!(reviewed.is_reviewed("src/main.rs"));
        assert!(!reviewed.toggle("src/main.rs"));
        assert!(!reviewed.is_reviewed("src/main.rs"));
        assert!(reviewed.is_empty());
    }

    #[test]
    fn should_collect_from_paths() {
        let reviewed: ReviewedFiles = ["b.rs", "a.rs", "a.rs"].into_iter().collect();
        assert_eq!(reviewed.len(), 2);
        assert!(reviewed.is_reviewed("a.rs"));
        assert!(reviewed.is_reviewed("b.rs"));
    }

    #[test]
    fn should_serialize_as_plain_list() {
        let reviewed: ReviewedFiles = ["x.rs"].into_iter().collect();
        assert_eq!(serde_json::to_string(&reviewed).unwrap(), r#"["x.rs"]"#);
    }
}
