//! Completion system for the solrsh REPL
//!
//! This module provides grammar-aware completion for the SQL dialect of Solr.
//! It is built on a finite state machine (FSM) that is error-tolerant and works
//! with incomplete input: unknown tokens simply leave the machine where it is.
//!
//! # Architecture
//!
//! The completion system consists of several components:
//!
//! - **TokenStream**: Splits the typed text into logical tokens and decides
//!   which token, if any, the FSM should see
//! - **FSM**: Tracks the position in the grammar and the advisory next states
//! - **Provider**: Resolves grammar states to keywords and schema names
//! - **Engine**: Replays typed text into the FSM and filters the candidates
//!
//! # Examples
//!
//! ```
//! use solrsh::catalog::StaticCatalog;
//! use solrsh::repl::completion::CompletionEngine;
//! use std::sync::Arc;
//!
//! let catalog = StaticCatalog::empty().with_collection("books", ["id", "title"]);
//! let mut engine = CompletionEngine::new(Arc::new(catalog));
//!
//! let set = engine.complete("SELECT * FROM ").unwrap();
//! assert_eq!(set.candidates, ["books"]);
//! ```

mod engine;
mod fsm;
mod provider;
mod token_stream;

pub use engine::{CompletionEngine, CompletionGenerator, CompletionSet};
pub use fsm::{GrammarState, GrammarStateMachine};
pub use provider::{
    AGGREGATE_FUNCTIONS, CatalogSnapshot, DIRECTIONS, LOGICAL_OPERATORS, surface_forms,
};
pub use token_stream::{BOUNDARY_CHARS, TokenStream};
