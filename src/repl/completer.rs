//! Completer for reedline - provides completion suggestions

use std::sync::{Arc, Mutex};

use reedline::{Completer, Span, Suggestion};

use super::completion::CompletionEngine;

/// SQL completer for reedline
pub struct SqlCompleter {
    /// Session completion engine, shared with the REPL
    engine: Arc<Mutex<CompletionEngine>>,
}

impl SqlCompleter {
    /// Create a new SQL completer
    ///
    /// # Arguments
    /// * `engine` - Completion engine shared with the REPL
    ///
    /// # Returns
    /// * `Self` - New completer
    pub fn new(engine: Arc<Mutex<CompletionEngine>>) -> Self {
        Self { engine }
    }
}

impl Completer for SqlCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - List of completion suggestions
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let pos = pos.min(line.len());
        let Some(before_cursor) = line.get(..pos) else {
            return Vec::new();
        };

        let result = match self.engine.lock() {
            Ok(mut engine) => engine.complete(before_cursor),
            Err(_) => {
                tracing::error!("completion engine lock poisoned");
                return Vec::new();
            }
        };

        let set = match result {
            Ok(set) => set,
            Err(e) => {
                tracing::error!(error = %e, "completion failed");
                return Vec::new();
            }
        };

        let start = replacement_start(before_cursor, set.replace);

        set.candidates
            .into_iter()
            .map(|value| Suggestion {
                value,
                span: Span::new(start, pos),
                append_whitespace: false,
                ..Default::default()
            })
            .collect()
    }
}

/// Byte offset where the last `chars` characters of `text` begin
fn replacement_start(text: &str, chars: usize) -> usize {
    if chars == 0 {
        return text.len();
    }

    text.char_indices()
        .rev()
        .nth(chars - 1)
        .map(|(index, _)| index)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn create_test_completer() -> SqlCompleter {
        let catalog = StaticCatalog::empty()
            .with_collection("books", ["id", "title"])
            .with_collection("bikes", ["id", "brand"]);
        let engine = CompletionEngine::new(Arc::new(catalog));
        SqlCompleter::new(Arc::new(Mutex::new(engine)))
    }

    #[test]
    fn test_complete_collections() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("SELECT * FROM ", 14);

        let values: Vec<_> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, ["books", "bikes"]);
        for suggestion in suggestions {
            assert_eq!(suggestion.span.start, 14);
            assert_eq!(suggestion.span.end, 14);
        }
    }

    #[test]
    fn test_complete_with_prefix() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("SELECT * FROM bo", 16);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "books");
        assert_eq!(suggestions[0].span.start, 14);
        assert_eq!(suggestions[0].span.end, 16);
    }

    #[test]
    fn test_complete_uses_text_before_cursor() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("sel trailing", 3);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "select");
        assert_eq!(suggestions[0].span.start, 0);
        assert_eq!(suggestions[0].span.end, 3);
    }

    #[test]
    fn test_replacement_start_counts_characters() {
        assert_eq!(replacement_start("abc", 0), 3);
        assert_eq!(replacement_start("abc", 2), 1);
        assert_eq!(replacement_start("x é", 1), 2);
        assert_eq!(replacement_start("ab", 5), 0);
    }
}
