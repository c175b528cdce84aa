//! Highlight reconciliation
//!
//! Each run replaces the whole overlay: every existing mark is cleared, the
//! query is run over the requested rows, duplicate nodes are dropped and one
//! coloured mark is installed per remaining capture. All of it happens
//! inside a single widget operation.

use std::collections::HashSet;

use tree_sitter::Tree;

use super::query::{Capture, HighlightQuery};
use crate::editor::{MarkOptions, Pos, RowRange, TextWidget};

/// Colour names indexed by capture index (modulo length)
pub const DEFAULT_PALETTE: &[&str] = &[
    "blue",
    "chocolate",
    "darkblue",
    "darkcyan",
    "darkgreen",
    "darkred",
    "darkslategray",
    "dimgray",
    "green",
    "indigo",
    "navy",
    "red",
    "sienna",
];

/// Fixed colour palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Palette {
    /// Build a palette from colour names; an empty list gives the default
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            Self::default()
        } else {
            Self { colors }
        }
    }

    /// Colour for the capture at `capture_index` in the query's name list
    pub fn color_for_index(&self, capture_index: usize) -> &str {
        &self.colors[capture_index % self.colors.len()]
    }

    /// CSS declaration installed on marks
    pub fn css_for_index(&self, capture_index: usize) -> String {
        format!("color: {}", self.color_for_index(capture_index))
    }
}

/// Keep only the first capture of every node.
///
/// Uses a seen-set rather than comparing with the previous capture, so
/// engines that interleave captures of different nodes are handled too.
pub fn dedup_captures(captures: Vec<Capture<'_>>) -> Vec<Capture<'_>> {
    let mut seen = HashSet::with_capacity(captures.len());
    captures
        .into_iter()
        .filter(|capture| seen.insert(capture.node))
        .collect()
}

/// Replace the widget's marks with fresh highlights.
///
/// `source` is the text the tree was parsed from. `rows` defaults to the
/// widget's viewport. Returns the number of marks installed.
pub fn reconcile<W: TextWidget>(
    widget: &mut W,
    tree: Option<&Tree>,
    source: &str,
    query: Option<&HighlightQuery>,
    palette: &Palette,
    rows: Option<RowRange>,
) -> usize {
    widget.operation(|widget| {
        let marks = widget.all_marks();
        let cleared = marks.len();
        for mark in marks {
            widget.clear_mark(mark);
        }

        let (Some(tree), Some(query)) = (tree, query) else {
            tracing::debug!("Highlight skipped: no tree or query ({} marks cleared)", cleared);
            return 0;
        };

        let rows = rows.unwrap_or_else(|| widget.viewport());
        let captures = dedup_captures(query.captures(tree, source, rows));
        for capture in &captures {
            widget.mark_text(
                Pos::new(capture.start.row, capture.start.column),
                Pos::new(capture.end.row, capture.end.column),
                MarkOptions {
                    inclusive_left: true,
                    inclusive_right: true,
                    css: palette.css_for_index(capture.index),
                },
            );
        }

        tracing::debug!(
            "Highlighted rows {}..={}: {} marks ({} cleared)",
            rows.start,
            rows.end,
            captures.len(),
            cleared
        );
        captures.len()
    })
}
