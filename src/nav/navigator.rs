use serde::{Deserialize, Serialize};

use crate::error::{DiffwalkError, Result};
use crate::model::{DiffFile, LineOrigin};

use super::cursor::{
    CursorPosition, Side, ViewMode, fix_side, has_content_on_side, scroll_target,
};
use super::predicate::{NavContext, PositionPredicate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Outcome of a navigation command. Both fields are `None` when nothing
/// matched, in which case the cursor did not move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavResult {
    pub position: Option<CursorPosition>,
    pub scroll_target: Option<String>,
}

impl NavResult {
    pub fn none() -> Self {
        Self::default()
    }

    fn at(position: CursorPosition, view_mode: ViewMode) -> Self {
        Self {
            position: Some(position),
            scroll_target: Some(scroll_target(&position, view_mode)),
        }
    }

    pub fn is_none(&self) -> bool {
        self.position.is_none()
    }
}

/// A rendered, side-valid position and the measured vertical center of its row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisiblePosition {
    pub position: CursorPosition,
    pub vertical_center: f64,
}

/// Pick the candidate whose center is closest to `viewport_center`.
/// Earlier candidates win ties.
pub fn find_center_position(
    candidates: &[VisiblePosition],
    viewport_center: f64,
) -> Option<CursorPosition> {
    let mut best: Option<(f64, CursorPosition)> = None;
    for candidate in candidates {
        let distance = (candidate.vertical_center - viewport_center).abs();
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, candidate.position));
        }
    }
    best.map(|(_, position)| position)
}

/// Flattened walk order over every non-empty chunk of the model.
struct Traversal<'a> {
    files: &'a [DiffFile],
    /// `(file_idx, chunk_idx)` of chunks with at least one line, in order
    slots: Vec<(usize, usize)>,
}

impl<'a> Traversal<'a> {
    fn new(files: &'a [DiffFile]) -> Self {
        let slots = files
            .iter()
            .enumerate()
            .flat_map(|(file_idx, file)| {
                file.chunks
                    .iter()
                    .enumerate()
                    .filter(|(_, chunk)| !chunk.lines.is_empty())
                    .map(move |(chunk_idx, _)| (file_idx, chunk_idx))
            })
            .collect();
        Self { files, slots }
    }

    fn chunk_len(&self, (file_idx, chunk_idx): (usize, usize)) -> usize {
        self.files[file_idx].chunks[chunk_idx].lines.len()
    }

    fn slot_of(&self, position: &CursorPosition) -> Option<usize> {
        let slot = self
            .slots
            .binary_search(&(position.file_idx, position.chunk_idx))
            .ok()?;
        (position.line_idx < self.chunk_len(self.slots[slot])).then_some(slot)
    }

    fn contains(&self, position: &CursorPosition) -> bool {
        self.slot_of(position).is_some()
    }

    /// One line forward or back, rolling over chunk and file boundaries and
    /// wrapping at either end. `None` as the origin means "before the first
    /// line" going forward and "after the last line" going back.
    fn step(
        &self,
        from: Option<CursorPosition>,
        direction: Direction,
        side: Side,
    ) -> Option<CursorPosition> {
        let count = self.slots.len();
        if count == 0 {
            return None;
        }

        let at_slot = |slot: usize, line_idx: usize| {
            let (file_idx, chunk_idx) = self.slots[slot];
            CursorPosition::new(file_idx, chunk_idx, line_idx, side)
        };

        let Some(from) = from else {
            return Some(match direction {
                Direction::Next => at_slot(0, 0),
                Direction::Prev => at_slot(count - 1, self.chunk_len(self.slots[count - 1]) - 1),
            });
        };
        let slot = self.slot_of(&from)?;

        Some(match direction {
            Direction::Next if from.line_idx + 1 < self.chunk_len(self.slots[slot]) => {
                at_slot(slot, from.line_idx + 1)
            }
            Direction::Next => at_slot((slot + 1) % count, 0),
            Direction::Prev if from.line_idx > 0 => at_slot(slot, from.line_idx - 1),
            Direction::Prev => {
                let prev = (slot + count - 1) % count;
                at_slot(prev, self.chunk_len(self.slots[prev]) - 1)
            }
        })
    }
}

/// Keyboard navigation state: at most one cursor over the diff model.
///
/// The model itself is passed in on every call through [`NavContext`], so a
/// reload only needs a new context; a cursor that no longer addresses a line
/// is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    cursor: Option<CursorPosition>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<CursorPosition> {
        self.cursor
    }

    /// Drop the cursor, returning to the initial state
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Walk from the cursor in `direction` to the next position accepted by
    /// `predicate`, wrapping around the model at most once.
    pub fn navigate<P>(
        &mut self,
        ctx: &NavContext<'_>,
        direction: Direction,
        predicate: &P,
    ) -> NavResult
    where
        P: PositionPredicate + ?Sized,
    {
        let traversal = Traversal::new(ctx.files);
        let start = self.cursor.filter(|cursor| traversal.contains(cursor));
        if self.cursor.is_some() && start.is_none() {
            log::debug!("cursor {:?} no longer addresses a line; restarting", self.cursor);
        }

        let side = start.map(|cursor| cursor.side).unwrap_or_default();
        let mut current = start;
        let mut first_visited: Option<CursorPosition> = None;

        loop {
            let Some(next) = traversal.step(current, direction, side) else {
                return NavResult::none();
            };
            if Some(next) == start || Some(next) == first_visited {
                log::trace!("no {direction:?} match after a full cycle");
                return NavResult::none();
            }
            first_visited.get_or_insert(next);

            if predicate.matches(&next, ctx) {
                let fixed = fix_side(next, ctx.files);
                self.cursor = Some(fixed);
                return NavResult::at(fixed, ctx.view_mode);
            }
            current = Some(next);
        }
    }

    /// Move the cursor to the `target` pane of a side-by-side view, staying
    /// inside the current file.
    pub fn switch_side(&mut self, ctx: &NavContext<'_>, target: Side) -> NavResult {
        if ctx.view_mode != ViewMode::SideBySide {
            return NavResult::none();
        }
        let Some(cursor) = self.cursor else {
            return NavResult::none();
        };
        let Some(file) = ctx.file(&cursor) else {
            return NavResult::none();
        };
        let Some(landing) = side_switch_target(file, &cursor, target) else {
            log::trace!("no line with {target:?} content in file {}", file.path);
            return NavResult::none();
        };

        let position = landing.with_side(target);
        self.cursor = Some(position);
        NavResult::at(position, ctx.view_mode)
    }

    /// Place the cursor directly, e.g. from a mouse click.
    pub fn select(&mut self, ctx: &NavContext<'_>, position: CursorPosition) -> Result<NavResult> {
        if ctx.line(&position).is_none() {
            return Err(DiffwalkError::InvalidCursor(format!(
                "file {} chunk {} line {}",
                position.file_idx, position.chunk_idx, position.line_idx
            )));
        }
        let fixed = fix_side(position, ctx.files);
        self.cursor = Some(fixed);
        Ok(NavResult::at(fixed, ctx.view_mode))
    }

    /// Move the cursor to the visible row nearest the middle of the viewport,
    /// as after scrolling with the mouse.
    pub fn center_on(
        &mut self,
        ctx: &NavContext<'_>,
        candidates: &[VisiblePosition],
        viewport_center: f64,
    ) -> NavResult {
        match find_center_position(candidates, viewport_center) {
            Some(position) if ctx.line(&position).is_some() => {
                let fixed = fix_side(position, ctx.files);
                self.cursor = Some(fixed);
                NavResult::at(fixed, ctx.view_mode)
            }
            _ => NavResult::none(),
        }
    }
}

fn side_switch_target(
    file: &DiffFile,
    cursor: &CursorPosition,
    target: Side,
) -> Option<CursorPosition> {
    let lines = &file.chunks.get(cursor.chunk_idx)?.lines;
    let line = lines.get(cursor.line_idx)?;
    let has_target = |line_idx: usize| has_content_on_side(&lines[line_idx], target);

    if has_content_on_side(line, target) {
        return Some(*cursor);
    }

    // A deletion and the addition right after it share a row when paired
    let partner = match target {
        Side::Left => cursor
            .line_idx
            .checked_sub(1)
            .filter(|idx| lines[*idx].origin == LineOrigin::Deletion),
        Side::Right => Some(cursor.line_idx + 1)
            .filter(|idx| lines.get(*idx).is_some_and(|l| l.origin == LineOrigin::Addition)),
    };
    if let Some(idx) = partner {
        return Some(cursor.with_line(idx));
    }

    let in_chunk = (cursor.line_idx + 1..lines.len())
        .find(|idx| has_target(*idx))
        .or_else(|| (0..cursor.line_idx).rev().find(|idx| has_target(*idx)));
    if let Some(idx) = in_chunk {
        return Some(cursor.with_line(idx));
    }

    let first_in = |chunk_idx: usize| {
        file.chunks[chunk_idx]
            .lines
            .iter()
            .position(|line| has_content_on_side(line, target))
            .map(|line_idx| CursorPosition::new(cursor.file_idx, chunk_idx, line_idx, target))
    };
    let last_in = |chunk_idx: usize| {
        file.chunks[chunk_idx]
            .lines
            .iter()
            .rposition(|line| has_content_on_side(line, target))
            .map(|line_idx| CursorPosition::new(cursor.file_idx, chunk_idx, line_idx, target))
    };

    (cursor.chunk_idx + 1..file.chunks.len())
        .find_map(first_in)
        .or_else(|| (0..cursor.chunk_idx).rev().find_map(last_in))
}
