//! Text-editing widget abstraction
//!
//! The highlight pipeline never touches a concrete editor. It talks to a
//! [`TextWidget`], which owns the buffer, reports edits as [`ChangeRecord`]
//! batches, converts positions to byte indices, exposes the visible row
//! range and stores styled text marks.
//!
//! [`Editor`] is the headless rope-backed implementation used by the
//! terminal front end, the tests and the benchmarks.

mod buffer;
mod marks;

pub use buffer::Editor;
pub(crate) use buffer::rope_index_from_pos;
pub use marks::{MarkId, MarkOptions, TextMark};

/// A position in the buffer.
///
/// Both fields are 0-based. `ch` is a byte column within the line, which is
/// the column unit tree-sitter uses for its points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub line: usize,
    pub ch: usize,
}

impl Pos {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// Inclusive range of buffer rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check whether `row` lies inside the range (both bounds inclusive)
    pub fn contains(&self, row: usize) -> bool {
        row >= self.start && row <= self.end
    }
}

/// One widget-reported delta.
///
/// `text` holds the inserted lines and `removed` the replaced lines, both
/// split on `'\n'`: inserting `"a\nb"` gives `["a", "b"]`, a pure deletion
/// gives `[""]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub from: Pos,
    pub to: Pos,
    pub text: Vec<String>,
    pub removed: Vec<String>,
}

impl ChangeRecord {
    pub fn new(from: Pos, to: Pos, inserted: &str, removed: &str) -> Self {
        Self {
            from,
            to,
            text: split_lines(inserted),
            removed: split_lines(removed),
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_owned).collect()
}

/// Events emitted by a widget, drained by the change pump
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// All changes applied by one operation, in the order they happened
    Changes(Vec<ChangeRecord>),
    /// The visible row range moved or resized
    ViewportChange(RowRange),
}

/// Conversion from a [`Pos`] to an absolute byte index in the buffer
pub trait PositionIndex {
    fn index_from_pos(&self, pos: Pos) -> usize;
}

/// Capabilities the pipeline needs from a text-editing widget
pub trait TextWidget: PositionIndex {
    /// Full current buffer text
    fn value(&self) -> String;

    /// Currently visible rows
    fn viewport(&self) -> RowRange;

    /// Mark a span with styling, returning a handle for later removal
    fn mark_text(&mut self, from: Pos, to: Pos, options: MarkOptions) -> MarkId;

    /// Handles of every live mark
    fn all_marks(&self) -> Vec<MarkId>;

    /// Remove a mark; unknown handles are ignored
    fn clear_mark(&mut self, id: MarkId);

    /// Run `f` as one batched update.
    ///
    /// Edits made inside are reported as a single change batch once the
    /// outermost operation ends.
    fn operation<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized;

    /// Take every event emitted since the last call
    fn drain_events(&mut self) -> Vec<WidgetEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_record_splits_lines() {
        let change = ChangeRecord::new(Pos::new(0, 0), Pos::new(0, 0), "a\nbc", "");
        assert_eq!(change.text, vec!["a".to_string(), "bc".to_string()]);
        assert_eq!(change.removed, vec![String::new()]);
    }

    #[test]
    fn test_row_range_contains_is_inclusive() {
        let range = RowRange::new(2, 4);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
    }
}
