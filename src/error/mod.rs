//! Error handling module for solrsh.
//!
//! The completion core itself almost never fails: unrecognized input simply
//! leaves the grammar state unchanged. The errors defined here cover the
//! surrounding shell (configuration, schema files, I/O) and the small set of
//! contract violations between the tokenizer, the state machine and the
//! completion generator.
//!
//! # Example
//!
//! ```rust
//! use solrsh::error::{ConfigError, Result, SolrshError};
//!
//! fn check_columns(columns: u16) -> Result<()> {
//!     if columns == 0 {
//!         return Err(ConfigError::InvalidValue {
//!             field: "completion.columns".to_string(),
//!             value: columns.to_string(),
//!         }
//!         .into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(check_columns(0), Err(SolrshError::Config(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{CompletionError, ConfigError, Result, SchemaError, SolrshError};
