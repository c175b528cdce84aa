//! Capture query over a row range
//!
//! The query is compiled once at startup and only read afterwards. Captures
//! come back in tree order (left to right, depth first), so their start
//! positions never decrease.

use std::fmt;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Point, Query, QueryCursor, QueryError, Tree};

use crate::editor::RowRange;

/// Highlight query bundled with the Rust grammar
pub const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;

/// Stable identity of a syntax node within one tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(pub usize);

/// One capture produced by a query run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture<'q> {
    /// Capture name as declared in the query source
    pub name: &'q str,
    /// Position of `name` in the query's capture-name list
    pub index: usize,
    pub node: NodeKey,
    pub start: Point,
    pub end: Point,
}

/// A compiled highlight query
pub struct HighlightQuery {
    query: Query,
}

impl HighlightQuery {
    /// Compile `source` against `language`
    pub fn new(language: &Language, source: &str) -> Result<Self, QueryError> {
        let query = Query::new(language, source)?;
        tracing::debug!(
            "Compiled highlight query: {} patterns, {} capture names",
            query.pattern_count(),
            query.capture_names().len()
        );
        Ok(Self { query })
    }

    /// The bundled Rust highlight query
    pub fn rust() -> Result<Self, QueryError> {
        Self::new(&tree_sitter_rust::LANGUAGE.into(), RUST_HIGHLIGHTS)
    }

    /// Declared capture names, in declaration order
    pub fn capture_names(&self) -> &[&str] {
        self.query.capture_names()
    }

    /// Run the query over the rows of `range` (inclusive).
    ///
    /// Only captures whose node starts inside the range are returned.
    /// `source` must be the text `tree` was parsed from; predicates such as
    /// `#match?` read node text from it.
    pub fn captures(&self, tree: &Tree, source: &str, range: RowRange) -> Vec<Capture<'_>> {
        let mut cursor = QueryCursor::new();
        let end = Point::new(range.end.saturating_add(1), 0);
        cursor.set_point_range(Point::new(range.start, 0)..end);

        let names = self.query.capture_names();
        let mut result = Vec::new();
        let mut captures = cursor.captures(&self.query, tree.root_node(), source.as_bytes());
        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let node = capture.node;
            let start = node.start_position();
            if !range.contains(start.row) {
                continue;
            }
            let index = capture.index as usize;
            result.push(Capture {
                name: names[index],
                index,
                node: NodeKey(node.id()),
                start,
                end: node.end_position(),
            });
        }
        result
    }
}

impl fmt::Debug for HighlightQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightQuery")
            .field("patterns", &self.query.pattern_count())
            .field("capture_names", &self.query.capture_names())
            .finish()
    }
}

/// Render a query compile error with the offending line, for startup logs
pub fn describe_query_error(source: &str, error: &QueryError) -> String {
    let line = source.lines().nth(error.row).unwrap_or("<line not found>");
    format!(
        "query compilation failed at row {}, column {}: {:?}\n  {}\n  {}^",
        error.row + 1,
        error.column,
        error.kind,
        line,
        " ".repeat(error.column.min(line.len()))
    )
}
