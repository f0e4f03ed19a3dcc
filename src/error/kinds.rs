use std::{fmt, io};

use crate::repl::completion::GrammarState;

/// Crate-wide `Result` type using [`SolrshError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, SolrshError>;

/// Top-level error type for solrsh operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum SolrshError {
    /// Configuration errors.
    Config(ConfigError),

    /// Schema catalog errors.
    Schema(SchemaError),

    /// Wiring errors between the tokenizer, state machine and generator.
    Completion(CompletionError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Anything else, such as an unsupported shell name.
    Generic(String),
}

/// Schema file errors.
#[derive(Debug)]
pub enum SchemaError {
    /// Schema file not found.
    FileNotFound(String),

    /// Schema file could not be parsed.
    InvalidFormat(String),

    /// Schema file extension is neither `.toml` nor `.json`.
    UnsupportedFormat(String),

    /// The same collection is declared twice.
    DuplicateCollection(String),
}

/// Contract violations inside the completion core.
///
/// These signal a defect in how the components are wired together, never a
/// problem with what the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// A state that has no textual form was asked for its literals.
    NoSurfaceForm(GrammarState),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for SolrshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolrshError::Config(e) => write!(f, "Configuration error: {e}"),
            SolrshError::Schema(e) => write!(f, "Schema error: {e}"),
            SolrshError::Completion(e) => write!(f, "Completion error: {e}"),
            SolrshError::Io(e) => write!(f, "I/O error: {e}"),
            SolrshError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::FileNotFound(path) => write!(f, "Schema file not found: {path}"),
            SchemaError::InvalidFormat(msg) => write!(f, "Invalid schema file: {msg}"),
            SchemaError::UnsupportedFormat(path) => {
                write!(f, "Unsupported schema file '{path}' (expected .toml or .json)")
            }
            SchemaError::DuplicateCollection(name) => {
                write!(f, "Collection '{name}' is declared more than once")
            }
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::NoSurfaceForm(state) => {
                write!(f, "grammar state {state} has no textual form")
            }
        }
    }
}

impl std::error::Error for SolrshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolrshError::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for ConfigError {}
impl std::error::Error for SchemaError {}
impl std::error::Error for CompletionError {}

/* ========================= Conversions to SolrshError ========================= */

impl From<io::Error> for SolrshError {
    fn from(err: io::Error) -> Self {
        SolrshError::Io(err)
    }
}

impl From<ConfigError> for SolrshError {
    fn from(err: ConfigError) -> Self {
        SolrshError::Config(err)
    }
}

impl From<SchemaError> for SolrshError {
    fn from(err: SchemaError) -> Self {
        SolrshError::Schema(err)
    }
}

impl From<CompletionError> for SolrshError {
    fn from(err: CompletionError) -> Self {
        SolrshError::Completion(err)
    }
}

impl From<String> for SolrshError {
    fn from(msg: String) -> Self {
        SolrshError::Generic(msg)
    }
}

impl From<&str> for SolrshError {
    fn from(msg: &str) -> Self {
        SolrshError::Generic(msg.to_owned())
    }
}

impl From<reedline::ReedlineError> for SolrshError {
    fn from(err: reedline::ReedlineError) -> Self {
        SolrshError::Generic(format!("Line editor error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_kind() {
        let err: SolrshError = ConfigError::FileNotFound("/tmp/x.toml".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Config file not found: /tmp/x.toml"
        );

        let err: SolrshError = SchemaError::DuplicateCollection("books".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Schema error: Collection 'books' is declared more than once"
        );
    }

    #[test]
    fn test_completion_error_names_state() {
        let err: SolrshError = CompletionError::NoSurfaceForm(GrammarState::Initial).into();
        assert_eq!(
            err.to_string(),
            "Completion error: grammar state INITIAL has no textual form"
        );
    }

    #[test]
    fn test_generic_from_str() {
        let err: SolrshError = "boom".into();
        assert!(matches!(err, SolrshError::Generic(ref m) if m == "boom"));
    }
}
