//! Solr SQL Shell Library
//!
//! This library provides the core functionality of solrsh, an interactive
//! shell for the SQL dialect of Apache Solr. Its heart is a grammar-aware
//! completion engine that suggests keywords, aggregate functions and schema
//! names while a statement is being typed.
//!
//! # Modules
//!
//! - `catalog`: Read-only source of collection and field names
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `repl`: Interactive REPL engine and the completion system
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use solrsh::{CompletionEngine, StaticCatalog};
//!
//! let catalog = StaticCatalog::empty().with_collection("books", ["id", "title"]);
//! let mut engine = CompletionEngine::new(Arc::new(catalog));
//!
//! let set = engine.complete("SELECT ").unwrap();
//! assert_eq!(&set.candidates[..2], ["id", "title"]);
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod repl;

// Re-export commonly used types
pub use catalog::{SchemaCatalog, StaticCatalog};
pub use config::Config;
pub use error::{Result, SolrshError};
pub use repl::ReplEngine;
pub use repl::completion::{CompletionEngine, CompletionSet, GrammarState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
