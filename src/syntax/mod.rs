//! Incremental parse and highlight pipeline
//!
//! ## Architecture
//!
//! ```text
//! Editor change batch → translate_batch (ReplayText) → LiveTree::apply_edits
//!                     → SyntaxEngine::parse (incremental) → LiveTree::replace
//!                     → (50ms debounce) → reconcile → marks
//! ```
//!
//! The grammar is Rust (`tree-sitter-rust`) with its bundled highlight query.

pub mod edit;
mod highlights;
mod parser;
mod query;

pub use edit::{translate_batch, translate_change, EditDescriptor, ReplayText};
pub use highlights::{dedup_captures, reconcile, Palette, DEFAULT_PALETTE};
pub use parser::{LiveTree, SyntaxEngine};
pub use query::{describe_query_error, Capture, HighlightQuery, NodeKey, RUST_HIGHLIGHTS};
