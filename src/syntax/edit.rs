//! Edit translation from widget change records to tree-sitter edits
//!
//! Tree-sitter needs every edit both as byte offsets and as row/column
//! points. Widgets report changes as line lists anchored at a position, so
//! the offsets are rebuilt from the line lengths.
//!
//! Records of a batch are relative to the text the earlier records left
//! behind, so [`translate_batch`] replays them one by one on a
//! [`ReplayText`] instead of resolving positions against the final buffer.

use ropey::Rope;
use tree_sitter::{InputEdit, Point};

use crate::editor::{rope_index_from_pos, ChangeRecord, Pos, PositionIndex};

/// A single text mutation in parser-native coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditDescriptor {
    pub start_index: usize,
    pub old_end_index: usize,
    pub new_end_index: usize,
    pub start_position: Point,
    pub old_end_position: Point,
    pub new_end_position: Point,
}

impl EditDescriptor {
    /// Convert to the struct `Tree::edit` consumes
    pub fn to_input_edit(&self) -> InputEdit {
        InputEdit {
            start_byte: self.start_index,
            old_end_byte: self.old_end_index,
            new_end_byte: self.new_end_index,
            start_position: self.start_position,
            old_end_position: self.old_end_position,
            new_end_position: self.new_end_position,
        }
    }
}

impl From<EditDescriptor> for InputEdit {
    fn from(edit: EditDescriptor) -> Self {
        edit.to_input_edit()
    }
}

/// Translate one change record into an edit descriptor.
///
/// `index` must describe the buffer the record's `from` position refers to.
/// An empty line list is read as a single empty line.
pub fn translate_change(change: &ChangeRecord, index: &impl PositionIndex) -> EditDescriptor {
    let old_line_count = change.removed.len().max(1);
    let new_line_count = change.text.len().max(1);
    let last_line_len = change.text.last().map_or(0, String::len);

    let start_position = Point {
        row: change.from.line,
        column: change.from.ch,
    };
    let old_end_position = Point {
        row: change.to.line,
        column: change.to.ch,
    };
    // A multi-line insertion ends on its own last line, not the start line
    let new_end_position = Point {
        row: start_position.row + new_line_count - 1,
        column: if new_line_count == 1 {
            start_position.column + last_line_len
        } else {
            last_line_len
        },
    };

    let start_index = index.index_from_pos(change.from);
    // One separator per line boundary
    let new_end_index = start_index
        + (new_line_count - 1)
        + change.text.iter().map(String::len).sum::<usize>();
    let old_end_index = start_index
        + (old_line_count - 1)
        + change.removed.iter().map(String::len).sum::<usize>();

    let edit = EditDescriptor {
        start_index,
        old_end_index,
        new_end_index,
        start_position,
        old_end_position,
        new_end_position,
    };
    tracing::trace!(
        "Translated change at {:?}: bytes {}..{} -> {}..{}",
        change.from,
        edit.start_index,
        edit.old_end_index,
        edit.start_index,
        edit.new_end_index
    );
    edit
}

/// Shadow copy of the buffer that change records are replayed onto
#[derive(Debug, Clone, Default)]
pub struct ReplayText {
    rope: Rope,
}

impl ReplayText {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Whether the replayed text equals `text`
    pub fn matches(&self, text: &str) -> bool {
        self.rope == text
    }

    /// Apply `change`, already translated to `edit`, to the text
    fn apply(&mut self, change: &ChangeRecord, edit: &EditDescriptor) {
        let len = self.rope.len_bytes();
        let start = self.rope.byte_to_char(edit.start_index.min(len));
        let old_end = self.rope.byte_to_char(edit.old_end_index.min(len));
        self.rope.remove(start..old_end);
        self.rope.insert(start, &change.text.join("\n"));
    }
}

impl PositionIndex for ReplayText {
    fn index_from_pos(&self, pos: Pos) -> usize {
        rope_index_from_pos(&self.rope, pos)
    }
}

impl std::fmt::Display for ReplayText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

/// Translate a batch in emission order.
///
/// `text` must hold the buffer as it was before the batch; it holds the
/// buffer after the batch on return.
pub fn translate_batch(changes: &[ChangeRecord], text: &mut ReplayText) -> Vec<EditDescriptor> {
    changes
        .iter()
        .map(|change| {
            let edit = translate_change(change, &*text);
            text.apply(change, &edit);
            edit
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Editor, Pos, TextWidget, WidgetEvent};

    fn point(row: usize, column: usize) -> Point {
        Point { row, column }
    }

    /// Apply `f` to a fresh editor and translate the single change it made
    fn edit_of(text: &str, f: impl FnOnce(&mut Editor)) -> EditDescriptor {
        let mut editor = Editor::new(text);
        f(&mut editor);
        let events = editor.drain_events();
        let WidgetEvent::Changes(batch) = &events[0] else {
            panic!("expected a change batch, got {:?}", events);
        };
        assert_eq!(batch.len(), 1);
        translate_change(&batch[0], &editor)
    }

    #[test]
    fn test_typing_at_end_of_document() {
        let source = "fn main() {}";
        let len = source.len();
        let edit = edit_of(source, |ed| ed.insert(Pos::new(0, len), "x"));

        assert_eq!(edit.start_index, len);
        assert_eq!(edit.old_end_index, len);
        assert_eq!(edit.new_end_index, len + 1);
        assert_eq!(edit.start_position, point(0, len));
        assert_eq!(edit.old_end_position, point(0, len));
        assert_eq!(edit.new_end_position, point(0, len + 1));
    }

    #[test]
    fn test_insert_newline_mid_line() {
        let edit = edit_of("abcd\nef", |ed| ed.insert(Pos::new(0, 2), "\n"));

        assert_eq!(edit.start_index, 2);
        assert_eq!(edit.old_end_index, 2);
        assert_eq!(edit.new_end_index, 3);
        assert_eq!(edit.new_end_position, point(1, 0));
    }

    #[test]
    fn test_multiline_insert_end_column_is_relative_to_last_line() {
        let edit = edit_of("xy", |ed| ed.insert(Pos::new(0, 1), "ab\ncde"));

        assert_eq!(edit.start_index, 1);
        assert_eq!(edit.new_end_index, 1 + 2 + 1 + 3);
        assert_eq!(edit.new_end_position, point(1, 3));
    }

    #[test]
    fn test_delete_across_lines() {
        let edit = edit_of("one\ntwo\nthree", |ed| ed.delete(Pos::new(0, 1), Pos::new(2, 2)));

        // removed "ne", "two", "th" plus two separators
        assert_eq!(edit.start_index, 1);
        assert_eq!(edit.old_end_index, 1 + 2 + 3 + 2 + 2);
        assert_eq!(edit.new_end_index, 1);
        assert_eq!(edit.old_end_position, point(2, 2));
        assert_eq!(edit.new_end_position, point(0, 1));
    }

    #[test]
    fn test_replace_single_line() {
        let edit = edit_of("let x = 10;", |ed| ed.replace_range(Pos::new(0, 8), Pos::new(0, 10), "7"));

        assert_eq!(edit.start_index, 8);
        assert_eq!(edit.old_end_index, 10);
        assert_eq!(edit.new_end_index, 9);
        assert_eq!(edit.new_end_position, point(0, 9));
    }

    #[test]
    fn test_empty_line_lists_are_tolerated() {
        let editor = Editor::new("abc");
        let change = ChangeRecord {
            from: Pos::new(0, 1),
            to: Pos::new(0, 1),
            text: Vec::new(),
            removed: Vec::new(),
        };
        let edit = translate_change(&change, &editor);
        assert_eq!(edit.start_index, 1);
        assert_eq!(edit.old_end_index, 1);
        assert_eq!(edit.new_end_index, 1);
    }

    #[test]
    fn test_batch_preserves_order() {
        let mut editor = Editor::new("ab");
        editor.operation(|ed| {
            ed.insert(Pos::new(0, 0), "1");
            ed.insert(Pos::new(0, 3), "2");
        });
        let Some(WidgetEvent::Changes(batch)) = editor.drain_events().pop() else {
            panic!("expected a change batch");
        };
        let mut text = ReplayText::new("ab");
        let edits = translate_batch(&batch, &mut text);
        assert_eq!(edits[0].start_index, 0);
        assert_eq!(edits[1].start_index, 3);
        assert_eq!(edits[1].to_input_edit().new_end_byte, 4);
        assert_eq!(text.to_string(), "1ab2");
    }

    #[test]
    fn test_batch_resolves_each_record_against_intermediate_text() {
        let mut editor = Editor::new("aaa\nbbb\nccc");
        editor.operation(|ed| {
            ed.insert(Pos::new(2, 1), "X");
            ed.insert(Pos::new(0, 0), "new\nlines\n");
            ed.delete(Pos::new(4, 0), Pos::new(4, 1));
        });
        let Some(WidgetEvent::Changes(batch)) = editor.drain_events().pop() else {
            panic!("expected a change batch");
        };

        let mut text = ReplayText::new("aaa\nbbb\nccc");
        let edits = translate_batch(&batch, &mut text);

        // The first insert lands before the paste moved line 2 down
        assert_eq!(edits[0].start_index, 9);
        assert_eq!(edits[1].start_index, 0);
        assert_eq!(edits[1].new_end_index, 10);
        assert_eq!(edits[2].start_index, 18);
        assert_eq!(edits[2].old_end_index, 19);
        assert!(text.matches(&editor.value()));
        assert_eq!(text.to_string(), "new\nlines\naaa\nbbb\nXcc");
    }
}
