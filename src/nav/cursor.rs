use serde::{Deserialize, Serialize};

use crate::model::{DiffFile, DiffLine, LineOrigin};

/// Pane of a side-by-side view. Left shows the old file, right the new one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Inline,
    SideBySide,
}

impl ViewMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inline" | "unified" => Some(ViewMode::Inline),
            "side-by-side" | "split" => Some(ViewMode::SideBySide),
            _ => None,
        }
    }
}

/// Index triple into `files[file_idx].chunks[chunk_idx].lines[line_idx]`,
/// plus the pane the cursor sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorPosition {
    pub file_idx: usize,
    pub chunk_idx: usize,
    pub line_idx: usize,
    pub side: Side,
}

impl CursorPosition {
    pub fn new(file_idx: usize, chunk_idx: usize, line_idx: usize, side: Side) -> Self {
        Self {
            file_idx,
            chunk_idx,
            line_idx,
            side,
        }
    }

    pub fn with_side(self, side: Side) -> Self {
        Self { side, ..self }
    }

    pub fn with_line(self, line_idx: usize) -> Self {
        Self { line_idx, ..self }
    }

    pub fn file<'a>(&self, files: &'a [DiffFile]) -> Option<&'a DiffFile> {
        files.get(self.file_idx)
    }

    pub fn line<'a>(&self, files: &'a [DiffFile]) -> Option<&'a DiffLine> {
        self.file(files)?.line(self.chunk_idx, self.line_idx)
    }
}

/// Whether `line` renders a cell in the `side` pane.
pub fn has_content_on_side(line: &DiffLine, side: Side) -> bool {
    match line.origin {
        LineOrigin::Context => true,
        LineOrigin::Deletion => side == Side::Left,
        LineOrigin::Addition => side == Side::Right,
    }
}

/// Move the cursor to the other pane if its line has nothing on the current one.
pub fn fix_side(position: CursorPosition, files: &[DiffFile]) -> CursorPosition {
    match position.line(files) {
        Some(line) if !has_content_on_side(line, position.side) => {
            position.with_side(position.side.opposite())
        }
        _ => position,
    }
}

/// Element id the renderer scrolls to for `position`.
pub fn scroll_target(position: &CursorPosition, view_mode: ViewMode) -> String {
    let CursorPosition {
        file_idx,
        chunk_idx,
        line_idx,
        side,
    } = position;
    match view_mode {
        ViewMode::Inline => format!("diff-{file_idx}-{chunk_idx}-{line_idx}"),
        ViewMode::SideBySide => {
            format!("diff-{file_idx}-{chunk_idx}-{line_idx}-{}", side.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::fixtures::make_file;

    #[test]
    fn should_report_content_per_side() {
        let file = make_file("a.rs", &[".-+"]);
        let lines = &file.chunks[0].lines;
        assert!(has_content_on_side(&lines[0], Side::Left));
        assert!(has_content_on_side(&lines[0], Side::Right));
        assert!(has_content_on_side(&lines[1], Side::Left));
        assert!(!has_content_on_side(&lines[1], Side::Right));
        assert!(!has_content_on_side(&lines[2], Side::Left));
        assert!(has_content_on_side(&lines[2], Side::Right));
    }

    #[test]
    fn should_fix_side_of_deletion_parked_on_right() {
        let files = vec![make_file("a.rs", &["-+"])];
        let fixed = fix_side(CursorPosition::new(0, 0, 0, Side::Right), &files);
        assert_eq!(fixed.side, Side::Left);
    }

    #[test]
    fn should_fix_side_of_addition_parked_on_left() {
        let files = vec![make_file("a.rs", &["-+"])];
        let fixed = fix_side(CursorPosition::new(0, 0, 1, Side::Left), &files);
        assert_eq!(fixed.side, Side::Right);
    }

    #[test]
    fn should_leave_context_lines_on_either_side() {
        let files = vec![make_file("a.rs", &["."])];
        for side in [Side::Left, Side::Right] {
            let pos = CursorPosition::new(0, 0, 0, side);
            assert_eq!(fix_side(pos, &files), pos);
        }
    }

    #[test]
    fn should_leave_out_of_range_positions_untouched() {
        let files = vec![make_file("a.rs", &["-"])];
        let pos = CursorPosition::new(3, 0, 0, Side::Right);
        assert_eq!(fix_side(pos, &files), pos);
    }

    #[test]
    fn should_build_deterministic_scroll_targets() {
        let pos = CursorPosition::new(2, 1, 7, Side::Left);
        assert_eq!(scroll_target(&pos, ViewMode::Inline), "diff-2-1-7");
        assert_eq!(scroll_target(&pos, ViewMode::SideBySide), "diff-2-1-7-left");
        let same = CursorPosition::new(2, 1, 7, Side::Left);
        assert_eq!(
            scroll_target(&pos, ViewMode::SideBySide),
            scroll_target(&same, ViewMode::SideBySide)
        );
    }

    #[test]
    fn should_parse_view_mode_names() {
        assert_eq!(ViewMode::parse("inline"), Some(ViewMode::Inline));
        assert_eq!(ViewMode::parse("side-by-side"), Some(ViewMode::SideBySide));
        assert_eq!(ViewMode::parse("split"), Some(ViewMode::SideBySide));
        assert_eq!(ViewMode::parse("sideways"), None);
    }
}
