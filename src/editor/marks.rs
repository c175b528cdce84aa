//! Styled text marks
//!
//! Marks are stored as byte offsets so they can follow edits made between
//! two highlight runs, keeping the previous colours aligned with the text
//! while the debounced reconciler catches up.

/// Handle to a mark owned by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkId(pub u64);

/// Styling and edge behavior of a mark
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkOptions {
    /// Text inserted exactly at the start of the mark becomes part of it
    pub inclusive_left: bool,
    /// Text inserted exactly at the end of the mark becomes part of it
    pub inclusive_right: bool,
    /// CSS-like declaration, e.g. `color: blue`
    pub css: String,
}

/// A live mark, in byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMark {
    pub id: MarkId,
    pub start: usize,
    pub end: usize,
    pub options: MarkOptions,
}

impl TextMark {
    /// Move the mark through a replacement of `start..old_end` with text
    /// ending at `new_end`. Returns false when the mark collapsed and should
    /// be dropped.
    pub(super) fn apply_edit(&mut self, start: usize, old_end: usize, new_end: usize) -> bool {
        self.start = map_offset(self.start, start, old_end, new_end, !self.options.inclusive_left);
        self.end = map_offset(self.end, start, old_end, new_end, self.options.inclusive_right);
        self.start < self.end
    }
}

/// Map a byte offset through an edit. `assoc_after` decides which side of
/// the new text an offset lands on when it sat at the insertion point or
/// inside the replaced span.
fn map_offset(offset: usize, start: usize, old_end: usize, new_end: usize, assoc_after: bool) -> usize {
    if offset < start {
        offset
    } else if offset > old_end {
        offset - old_end + new_end
    } else if offset == start && offset == old_end {
        if assoc_after {
            new_end
        } else {
            start
        }
    } else if offset == start {
        start
    } else if offset == old_end {
        new_end
    } else if assoc_after {
        new_end
    } else {
        start
    }
}
