//! REPL (Read-Eval-Print Loop) for solrsh
//!
//! This module provides an interactive shell interface with features:
//! - Line editing with reedline and emacs keybindings
//! - Persistent statement history
//! - Grammar-aware completion in a columnar menu on Tab
//! - Syntax highlighting of keywords, aggregates and operators

pub mod completion;

mod completer;
mod engine;
mod highlighter;
mod prompt;

pub use completer::SqlCompleter;
pub use engine::ReplEngine;
pub use highlighter::SqlHighlighter;
pub use prompt::SqlPrompt;
