//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::time::Duration;

use highlight_playground::editor::{Editor, Pos, RowRange, TextWidget};
use highlight_playground::syntax::{HighlightQuery, Palette, SyntaxEngine};
use highlight_playground::ChangePump;
use tree_sitter::Tree;

pub const HIGHLIGHT_DELAY: Duration = Duration::from_millis(50);
pub const PERSIST_DELAY: Duration = Duration::from_millis(2000);

/// A highlighted span as seen by the reader: range and css
pub type Span = (Pos, Pos, String);

/// Pump for the bundled Rust grammar with default delays
pub fn rust_pump() -> ChangePump {
    ChangePump::new(
        SyntaxEngine::rust().unwrap(),
        HighlightQuery::rust().unwrap(),
        Palette::default(),
        HIGHLIGHT_DELAY,
        PERSIST_DELAY,
    )
}

pub fn json_engine() -> SyntaxEngine {
    SyntaxEngine::new(tree_sitter_json::LANGUAGE.into()).unwrap()
}

pub fn json_query(source: &str) -> HighlightQuery {
    HighlightQuery::new(&tree_sitter_json::LANGUAGE.into(), source).unwrap()
}

/// Pump for the JSON grammar with a custom query
pub fn json_pump(query: &str) -> ChangePump {
    ChangePump::new(
        json_engine(),
        json_query(query),
        Palette::default(),
        HIGHLIGHT_DELAY,
        PERSIST_DELAY,
    )
}

/// Every row of the editor
pub fn all_rows(editor: &Editor) -> RowRange {
    RowRange::new(0, editor.line_count() - 1)
}

/// Current marks as spans, in creation order
pub fn spans(editor: &Editor) -> Vec<Span> {
    editor
        .all_marks()
        .into_iter()
        .filter_map(|id| {
            let (from, to) = editor.mark_range(id)?;
            let css = editor.marks().iter().find(|m| m.id == id)?.options.css.clone();
            Some((from, to, css))
        })
        .collect()
}

/// Captures of `tree` over every row as (name, start, end), node identity left out
pub fn capture_spans(
    query: &HighlightQuery,
    tree: &Tree,
    source: &str,
) -> Vec<(String, tree_sitter::Point, tree_sitter::Point)> {
    let last_row = source.lines().count().max(1);
    query
        .captures(tree, source, RowRange::new(0, last_row))
        .into_iter()
        .map(|c| (c.name.to_string(), c.start, c.end))
        .collect()
}

/// Rust source spanning `lines` lines
pub fn rust_source(lines: usize) -> String {
    let mut out = String::new();
    for i in 0..lines {
        out.push_str(&format!("fn item_{i}(x: u32) -> u32 {{ x + {i} }} // line {i}\n"));
    }
    out
}
