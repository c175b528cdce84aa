//! Rope-backed headless editor implementing [`TextWidget`]

use ropey::Rope;

use super::marks::{MarkId, MarkOptions, TextMark};
use super::{ChangeRecord, Pos, PositionIndex, RowRange, TextWidget, WidgetEvent};

/// Default number of visible rows for a fresh editor
pub const DEFAULT_VIEWPORT_ROWS: usize = 40;

/// Headless text editor.
///
/// Every edit runs inside an operation; edits made within one outer
/// [`TextWidget::operation`] are reported together as one
/// [`WidgetEvent::Changes`] batch, in the order they were applied.
#[derive(Debug, Clone)]
pub struct Editor {
    rope: Rope,
    /// First visible row
    top_row: usize,
    /// Number of visible rows (always >= 1)
    visible_rows: usize,
    marks: Vec<TextMark>,
    next_mark_id: u64,
    op_depth: usize,
    pending_changes: Vec<ChangeRecord>,
    events: Vec<WidgetEvent>,
    operations_completed: u64,
}

impl Editor {
    /// Create an editor holding `text`
    pub fn new(text: &str) -> Self {
        Self::with_viewport(text, DEFAULT_VIEWPORT_ROWS)
    }

    /// Create an editor showing `visible_rows` rows from the top
    pub fn with_viewport(text: &str, visible_rows: usize) -> Self {
        Self {
            rope: Rope::from_str(text),
            top_row: 0,
            visible_rows: visible_rows.max(1),
            marks: Vec::new(),
            next_mark_id: 1,
            op_depth: 0,
            pending_changes: Vec::new(),
            events: Vec::new(),
            operations_completed: 0,
        }
    }

    /// Number of lines (always >= 1)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total length in bytes
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Line content without its trailing newline
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.line_count() {
            return None;
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Convert a byte index back to a position
    pub fn pos_from_index(&self, index: usize) -> Pos {
        let index = index.min(self.rope.len_bytes());
        let line = self.rope.byte_to_line(index);
        Pos {
            line,
            ch: index - self.rope.line_to_byte(line),
        }
    }

    /// Replace the text between `from` and `to` with `text`
    pub fn replace_range(&mut self, from: Pos, to: Pos, text: &str) {
        self.operation(|editor| editor.apply_replace(from, to, text));
    }

    /// Insert `text` at `pos`
    pub fn insert(&mut self, pos: Pos, text: &str) {
        self.replace_range(pos, pos, text);
    }

    /// Delete the text between `from` and `to`
    pub fn delete(&mut self, from: Pos, to: Pos) {
        self.replace_range(from, to, "");
    }

    /// Append `text` at the end of the buffer
    pub fn append(&mut self, text: &str) {
        let end = self.pos_from_index(self.rope.len_bytes());
        self.insert(end, text);
    }

    /// Replace the whole buffer
    pub fn set_value(&mut self, text: &str) {
        let end = self.pos_from_index(self.rope.len_bytes());
        self.replace_range(Pos::default(), end, text);
    }

    /// Scroll so that `top_row` is the first visible row
    pub fn scroll_to(&mut self, top_row: usize) {
        let top_row = top_row.min(self.line_count().saturating_sub(1));
        if top_row != self.top_row {
            self.top_row = top_row;
            self.events.push(WidgetEvent::ViewportChange(self.viewport()));
        }
    }

    /// Change the number of visible rows
    pub fn resize(&mut self, visible_rows: usize) {
        let visible_rows = visible_rows.max(1);
        if visible_rows != self.visible_rows {
            self.visible_rows = visible_rows;
            self.events.push(WidgetEvent::ViewportChange(self.viewport()));
        }
    }

    /// Live marks in creation order
    pub fn marks(&self) -> &[TextMark] {
        &self.marks
    }

    /// Position range currently covered by a mark
    pub fn mark_range(&self, id: MarkId) -> Option<(Pos, Pos)> {
        self.marks
            .iter()
            .find(|m| m.id == id)
            .map(|m| (self.pos_from_index(m.start), self.pos_from_index(m.end)))
    }

    /// Number of outermost operations finished so far
    pub fn operations_completed(&self) -> u64 {
        self.operations_completed
    }

    fn apply_replace(&mut self, from: Pos, to: Pos, text: &str) {
        let (from, to) = if to < from { (to, from) } else { (from, to) };
        let start = self.index_from_pos(from);
        let old_end = self.index_from_pos(to);
        if start == old_end && text.is_empty() {
            return;
        }

        let start_char = self.rope.byte_to_char(start);
        let end_char = self.rope.byte_to_char(old_end);
        let removed = self.rope.slice(start_char..end_char).to_string();
        // Report the clamped positions, which is what was actually replaced
        let from = self.pos_from_index(start);
        let to = self.pos_from_index(old_end);

        self.rope.remove(start_char..end_char);
        self.rope.insert(start_char, text);

        let new_end = start + text.len();
        self.marks.retain_mut(|mark| mark.apply_edit(start, old_end, new_end));

        tracing::trace!(
            "Editor replace {}..{} with {} bytes ({} marks kept)",
            start,
            old_end,
            text.len(),
            self.marks.len()
        );

        self.pending_changes
            .push(ChangeRecord::new(from, to, text, &removed));
    }
}

/// Byte index of `pos` in `rope`.
///
/// Past-the-end lines clamp to the end of the text and past-the-end columns
/// to the end of their line.
pub(crate) fn rope_index_from_pos(rope: &Rope, pos: Pos) -> usize {
    if pos.line >= rope.len_lines() {
        return rope.len_bytes();
    }
    let line = rope.line(pos.line);
    let mut line_len = line.len_bytes();
    if line_len > 0 && line.char(line.len_chars() - 1) == '\n' {
        line_len -= 1;
    }
    let index = rope.line_to_byte(pos.line) + pos.ch.min(line_len);
    // Never split a multi-byte character
    rope.char_to_byte(rope.byte_to_char(index))
}

impl PositionIndex for Editor {
    fn index_from_pos(&self, pos: Pos) -> usize {
        rope_index_from_pos(&self.rope, pos)
    }
}

impl TextWidget for Editor {
    fn value(&self) -> String {
        self.rope.to_string()
    }

    fn viewport(&self) -> RowRange {
        let last_line = self.line_count() - 1;
        let start = self.top_row.min(last_line);
        let end = (start + self.visible_rows - 1).min(last_line);
        RowRange { start, end }
    }

    fn mark_text(&mut self, from: Pos, to: Pos, options: MarkOptions) -> MarkId {
        let id = MarkId(self.next_mark_id);
        self.next_mark_id += 1;
        let start = self.index_from_pos(from);
        let end = self.index_from_pos(to);
        self.marks.push(TextMark {
            id,
            start: start.min(end),
            end: start.max(end),
            options,
        });
        id
    }

    fn all_marks(&self) -> Vec<MarkId> {
        self.marks.iter().map(|m| m.id).collect()
    }

    fn clear_mark(&mut self, id: MarkId) {
        self.marks.retain(|m| m.id != id);
    }

    fn operation<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.op_depth += 1;
        let result = f(self);
        self.op_depth -= 1;

        if self.op_depth == 0 {
            self.operations_completed += 1;
            if !self.pending_changes.is_empty() {
                let batch = std::mem::take(&mut self.pending_changes);
                self.events.push(WidgetEvent::Changes(batch));
            }
        }
        result
    }

    fn drain_events(&mut self) -> Vec<WidgetEvent> {
        std::mem::take(&mut self.events)
    }
}
