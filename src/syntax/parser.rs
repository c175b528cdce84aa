//! Tree-sitter parser and live tree ownership
//!
//! Exactly one tree is live at a time. A copy of it is edited with the
//! descriptors of a change batch and used as the base of the next
//! incremental parse; the live tree is released once the result is
//! installed.

use anyhow::{anyhow, Context, Result};
use tree_sitter::{Language, Parser, Tree};

use super::edit::EditDescriptor;

/// Incremental parse engine for a single grammar
pub struct SyntaxEngine {
    parser: Parser,
    language: Language,
}

impl SyntaxEngine {
    /// Create an engine for `language`
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .context("Failed to set parser language")?;
        Ok(Self { parser, language })
    }

    /// Engine for the bundled Rust grammar
    pub fn rust() -> Result<Self> {
        Self::new(tree_sitter_rust::LANGUAGE.into())
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Parse `text`, reusing unchanged subtrees of `prior` when given.
    ///
    /// Malformed input still yields a tree (with error nodes); an error is
    /// only returned when tree-sitter gives up entirely.
    pub fn parse(&mut self, text: &str, prior: Option<&Tree>) -> Result<Tree> {
        self.parser
            .parse(text, prior)
            .ok_or_else(|| anyhow!("Parser returned no tree ({} bytes)", text.len()))
    }
}

impl std::fmt::Debug for SyntaxEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxEngine")
            .field("node_kinds", &self.language.node_kind_count())
            .finish_non_exhaustive()
    }
}

/// Owning handle for the single live tree.
///
/// Readers only ever borrow the tree for the duration of a call, so
/// replacing it is atomic from their point of view.
#[derive(Debug, Default)]
pub struct LiveTree {
    tree: Option<Tree>,
    /// Number of trees installed so far
    generation: u64,
}

impl LiveTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Copy of the live tree with `edits` applied in order, ready to be the
    /// base of the next parse. The live tree itself is left untouched, so a
    /// failed parse keeps it consistent with the text it was parsed from.
    pub fn apply_edits(&self, edits: &[EditDescriptor]) -> Option<Tree> {
        let mut tree = self.tree.clone()?;
        for edit in edits {
            tree.edit(&edit.to_input_edit());
        }
        Some(tree)
    }

    /// Install `tree` and release the previous one
    pub fn replace(&mut self, tree: Tree) {
        let previous = self.tree.replace(tree);
        self.generation += 1;
        if previous.is_some() {
            tracing::trace!("Released tree of generation {}", self.generation - 1);
        }
        drop(previous);
    }
}
