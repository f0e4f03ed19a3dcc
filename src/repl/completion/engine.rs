//! Completion engine - orchestrates the completion flow
//!
//! [`CompletionGenerator`] turns a set of advisory grammar states into filtered
//! suggestion strings. [`CompletionEngine`] is the per-session driver: it keeps a
//! [`GrammarStateMachine`] in step with the text typed so far and asks the
//! generator for suggestions.

use std::sync::Arc;

use tracing::{debug, trace};

use super::fsm::{GrammarState, GrammarStateMachine};
use super::provider::{CatalogSnapshot, surface_forms};
use super::token_stream::{BOUNDARY_CHARS, TokenStream};
use crate::catalog::SchemaCatalog;
use crate::error::CompletionError;

/// Suggestions for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    /// Number of characters before the cursor that a suggestion replaces
    pub replace: usize,
    /// Candidate strings, in suggestion order
    pub candidates: Vec<String>,
}

impl CompletionSet {
    /// Check if there is nothing to suggest
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Produces suggestion strings from advisory states and the schema catalog
#[derive(Clone)]
pub struct CompletionGenerator {
    catalog: Arc<dyn SchemaCatalog>,
}

impl CompletionGenerator {
    /// Create a generator over a schema catalog
    pub fn new(catalog: Arc<dyn SchemaCatalog>) -> Self {
        Self { catalog }
    }

    /// Build the suggestions for the given advisory states
    ///
    /// # Arguments
    /// * `last_token` - Last logical token of the text, possibly partial
    /// * `last_char` - Last raw character of the text
    /// * `next_states` - Advisory states, in suggestion order
    ///
    /// # Returns
    /// * `Result<CompletionSet, CompletionError>` - Filtered candidates and the
    ///   replacement length, or a contract violation
    pub fn generate(
        &self,
        last_token: &str,
        last_char: Option<char>,
        next_states: &[GrammarState],
    ) -> Result<CompletionSet, CompletionError> {
        let snapshot = CatalogSnapshot::new(self.catalog.as_ref());
        let show_all = last_char.is_some_and(|c| BOUNDARY_CHARS.contains(&c));

        let mut candidates = Vec::new();
        for &state in next_states {
            let words = surface_forms(state, &snapshot)?;
            candidates.extend(
                words
                    .into_iter()
                    .filter(|word| show_all || word.starts_with(last_token)),
            );
        }

        let replace = if last_char == Some(' ') {
            0
        } else {
            last_token.chars().count()
        };

        trace!(
            last_token,
            ?last_char,
            ?next_states,
            count = candidates.len(),
            "generated candidates"
        );

        Ok(CompletionSet {
            replace,
            candidates,
        })
    }
}

/// Completion driver for one interactive session
pub struct CompletionEngine {
    machine: GrammarStateMachine,
    generator: CompletionGenerator,
    /// Text already fed to the machine
    consumed: String,
}

impl CompletionEngine {
    /// Create an engine positioned at the start of a statement
    ///
    /// # Arguments
    /// * `catalog` - Schema catalog shared for the whole session
    pub fn new(catalog: Arc<dyn SchemaCatalog>) -> Self {
        Self {
            machine: GrammarStateMachine::new(),
            generator: CompletionGenerator::new(catalog),
            consumed: String::new(),
        }
    }

    /// Start a new statement
    pub fn reset(&mut self) {
        self.machine.reset();
        self.consumed.clear();
    }

    /// Current grammar state
    pub fn state(&self) -> GrammarState {
        self.machine.current_state()
    }

    /// Check whether the text so far is an executable statement prefix
    pub fn is_valid(&self) -> bool {
        self.machine.is_valid()
    }

    /// The underlying state machine
    pub fn machine(&self) -> &GrammarStateMachine {
        &self.machine
    }

    /// Bring the state machine up to date with `text`
    ///
    /// Characters beyond the text already consumed are replayed one at a time,
    /// and every prefix that ends on a token boundary hands its token to the
    /// machine. Text that does not extend the consumed text starts over.
    pub fn sync(&mut self, text: &str) {
        if !text.starts_with(self.consumed.as_str()) {
            debug!(consumed = %self.consumed, "input diverged, replaying from start");
            self.reset();
        }

        let start = self.consumed.len();
        for (offset, ch) in text[start..].char_indices() {
            let end = start + offset + ch.len_utf8();
            if let Some(token) = TokenStream::scan(&text[..end]).delivered_token() {
                self.machine.process(&token);
            }
        }

        self.consumed.clear();
        self.consumed.push_str(text);
    }

    /// Suggestions for the text typed so far
    ///
    /// # Arguments
    /// * `text` - Full text before the cursor
    ///
    /// # Returns
    /// * `Result<CompletionSet, CompletionError>` - Suggestions and the number
    ///   of characters they replace
    pub fn complete(&mut self, text: &str) -> Result<CompletionSet, CompletionError> {
        self.sync(text);

        let stream = TokenStream::scan(text);

        // Free text after a bare column: nothing to offer
        if self.machine.current_state() == GrammarState::Expression
            && stream.last_char() == Some(' ')
        {
            return Ok(CompletionSet::default());
        }

        self.generator.generate(
            stream.last_token(),
            stream.last_char(),
            self.machine.next_states(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn test_catalog() -> Arc<dyn SchemaCatalog> {
        Arc::new(
            StaticCatalog::empty()
                .with_collection("books", ["id", "title", "author"])
                .with_collection("authors", ["id", "name"]),
        )
    }

    fn create_test_engine() -> CompletionEngine {
        CompletionEngine::new(test_catalog())
    }

    #[test]
    fn test_generate_unfiltered_after_space() {
        let generator = CompletionGenerator::new(test_catalog());
        let set = generator
            .generate(
                "",
                Some(' '),
                &[GrammarState::CollectionName, GrammarState::Limit],
            )
            .unwrap();

        assert_eq!(set.replace, 0);
        assert_eq!(set.candidates, ["books", "authors", "limit"]);
    }

    #[test]
    fn test_generate_filters_partial_token() {
        let generator = CompletionGenerator::new(test_catalog());
        let set = generator
            .generate("sel", Some('l'), &[GrammarState::Select])
            .unwrap();

        assert_eq!(set.replace, 3);
        assert_eq!(set.candidates, ["select"]);
    }

    #[test]
    fn test_generate_prefix_is_case_sensitive() {
        let generator = CompletionGenerator::new(test_catalog());
        let set = generator
            .generate("SEL", Some('L'), &[GrammarState::Select])
            .unwrap();

        assert!(set.is_empty());
        assert_eq!(set.replace, 3);
    }

    #[test]
    fn test_generate_boundary_punctuation_disables_filter() {
        let generator = CompletionGenerator::new(test_catalog());
        let set = generator
            .generate(",", Some(','), &[GrammarState::From])
            .unwrap();

        assert_eq!(set.candidates, ["from"]);
        assert_eq!(set.replace, 1);
    }

    #[test]
    fn test_generate_keeps_state_order() {
        let generator = CompletionGenerator::new(test_catalog());
        let set = generator
            .generate(
                "",
                None,
                &[
                    GrammarState::Direction,
                    GrammarState::From,
                    GrammarState::Select,
                ],
            )
            .unwrap();

        assert_eq!(set.candidates, ["asc", "desc", "from", "select"]);
    }

    #[test]
    fn test_generate_rejects_initial() {
        let generator = CompletionGenerator::new(test_catalog());
        let result = generator.generate("", None, &[GrammarState::Initial]);

        assert_eq!(
            result,
            Err(CompletionError::NoSurfaceForm(GrammarState::Initial))
        );
    }

    #[test]
    fn test_complete_empty_input() {
        let mut engine = create_test_engine();
        let set = engine.complete("").unwrap();

        assert_eq!(engine.state(), GrammarState::Initial);
        assert_eq!(set.candidates, ["select"]);
        assert_eq!(set.replace, 0);
    }

    #[test]
    fn test_complete_after_select() {
        let mut engine = create_test_engine();
        let set = engine.complete("SELECT ").unwrap();

        assert_eq!(engine.state(), GrammarState::Select);
        assert_eq!(
            set.candidates,
            [
                "id", "title", "author", "id", "name", "count", "sum", "avg", "min", "max"
            ]
        );
    }

    #[test]
    fn test_complete_collection_names() {
        let mut engine = create_test_engine();
        let set = engine.complete("SELECT * FROM ").unwrap();

        assert_eq!(engine.state(), GrammarState::From);
        assert!(engine.is_valid());
        assert_eq!(set.candidates, ["books", "authors"]);
    }

    #[test]
    fn test_complete_partial_collection_name() {
        let mut engine = create_test_engine();
        let set = engine.complete("SELECT * FROM bo").unwrap();

        assert_eq!(set.candidates, ["books"]);
        assert_eq!(set.replace, 2);
    }

    #[test]
    fn test_complete_clauses_after_collection() {
        let mut engine = create_test_engine();
        let set = engine.complete("SELECT * FROM books ").unwrap();

        assert_eq!(engine.state(), GrammarState::CollectionName);
        assert_eq!(set.candidates, ["where", "group by", "order by", "limit"]);
    }

    #[test]
    fn test_complete_group_by_columns() {
        let mut engine = create_test_engine();
        let set = engine.complete("select * from books group by ").unwrap();

        assert_eq!(engine.state(), GrammarState::GroupBy);
        assert_eq!(set.candidates, ["id", "title", "author", "id", "name"]);
    }

    #[test]
    fn test_complete_inside_aggregate_call() {
        let mut engine = create_test_engine();
        let set = engine.complete("SELECT COUNT(").unwrap();

        assert_eq!(engine.state(), GrammarState::Function);
        assert_eq!(engine.machine().stack(), [GrammarState::Select]);
        assert!(set.candidates.iter().any(|c| c == "from"));
        assert!(set.candidates.iter().any(|c| c == "title"));
        // only the `(` is replaced, never the function name
        assert_eq!(set.replace, 1);
    }

    #[test]
    fn test_complete_nothing_after_bare_column() {
        let mut engine = create_test_engine();
        let set = engine.complete("SELECT title ").unwrap();

        assert_eq!(engine.state(), GrammarState::Expression);
        assert!(set.is_empty());
    }

    #[test]
    fn test_repeated_request_does_not_reprocess() {
        let mut engine = create_test_engine();
        engine.complete("SELECT * FROM books ").unwrap();
        engine.complete("SELECT * FROM books ").unwrap();

        assert_eq!(engine.machine().token_buffer(), ["BOOKS"]);
    }

    #[test]
    fn test_keystrokes_and_single_request_agree() {
        let text = "SELECT title, COUNT(id) FROM books WHERE price > 10 ORDER BY ";

        let mut typed = create_test_engine();
        let mut last = CompletionSet::default();
        for (index, ch) in text.char_indices() {
            last = typed.complete(&text[..index + ch.len_utf8()]).unwrap();
        }

        let mut pasted = create_test_engine();
        let once = pasted.complete(text).unwrap();

        assert_eq!(typed.state(), pasted.state());
        assert_eq!(typed.machine().token_buffer(), pasted.machine().token_buffer());
        assert_eq!(last, once);
    }

    #[test]
    fn test_edit_replays_from_start() {
        let mut engine = create_test_engine();
        engine.complete("SELECT * FROM ").unwrap();
        assert_eq!(engine.state(), GrammarState::From);

        let set = engine.complete("SELECT ").unwrap();
        assert_eq!(engine.state(), GrammarState::Select);
        assert!(set.candidates.iter().any(|c| c == "count"));
    }

    #[test]
    fn test_reset_starts_new_statement() {
        let mut engine = create_test_engine();
        engine.complete("SELECT * FROM books ").unwrap();
        engine.reset();

        assert_eq!(engine.state(), GrammarState::Initial);
        assert_eq!(engine.machine().next_states(), [GrammarState::Select]);
        assert!(engine.machine().token_buffer().is_empty());
    }
}
