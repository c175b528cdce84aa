//! Highlight Playground - incremental tree-sitter highlighting
//!
//! A text buffer is kept in sync with an incrementally parsed syntax tree,
//! and a capture query re-derives colour marks over the visible rows after
//! every edit.
//!
//! The pieces, leaf first: [`syntax::edit`] turns widget change records into
//! tree edits, [`syntax::SyntaxEngine`] and [`syntax::LiveTree`] own parsing,
//! [`syntax::reconcile`] replaces the widget's marks, and [`pump::ChangePump`]
//! sequences all of it behind two [`debounce::Debouncer`]s.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod debounce;
pub mod editor;
pub mod pump;
pub mod render;
pub mod store;
pub mod syntax;
pub mod tracing;

// Re-export commonly used types
pub use config::PlaygroundConfig;
pub use editor::{Editor, TextWidget};
pub use pump::ChangePump;
