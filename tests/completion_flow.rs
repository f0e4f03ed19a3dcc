//! End-to-end suggestion flows through the public API

use std::sync::Arc;

use solrsh::catalog::StaticCatalog;
use solrsh::repl::completion::{CompletionEngine, GrammarState, GrammarStateMachine, TokenStream};

fn library_engine() -> CompletionEngine {
    let catalog = StaticCatalog::empty()
        .with_collection("books", ["id", "title", "price"])
        .with_collection("stores", ["id", "city"]);
    CompletionEngine::new(Arc::new(catalog))
}

/// Feed `text` one character at a time, as a line editor would
fn type_text(engine: &mut CompletionEngine, text: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    for (index, ch) in text.char_indices() {
        candidates = engine
            .complete(&text[..index + ch.len_utf8()])
            .unwrap()
            .candidates;
    }
    candidates
}

#[test]
fn empty_line_offers_select() {
    let mut engine = library_engine();
    let set = engine.complete("").unwrap();
    assert_eq!(set.candidates, ["select"]);
}

#[test]
fn select_offers_fields_then_aggregates() {
    let mut engine = library_engine();
    let candidates = type_text(&mut engine, "SELECT ");

    assert_eq!(engine.state(), GrammarState::Select);
    assert_eq!(
        candidates,
        ["id", "title", "price", "id", "city", "count", "sum", "avg", "min", "max"]
    );
}

#[test]
fn from_offers_collections() {
    let mut engine = library_engine();
    let candidates = type_text(&mut engine, "SELECT * FROM ");

    assert_eq!(engine.state(), GrammarState::From);
    assert_eq!(candidates, ["books", "stores"]);
}

#[test]
fn lower_case_keywords_are_recognized() {
    let mut engine = library_engine();
    let candidates = type_text(&mut engine, "select * from books where ");

    assert_eq!(engine.state(), GrammarState::Where);
    assert!(engine.is_valid());
    assert!(candidates.iter().any(|c| c == "not"));
    assert!(candidates.iter().any(|c| c == "price"));
}

#[test]
fn partial_keyword_matches_lower_case_only() {
    let mut engine = library_engine();
    let lower = type_text(&mut engine, "SELECT * FROM books wh");
    assert_eq!(lower, ["where"]);

    engine.reset();
    let upper = type_text(&mut engine, "SELECT * FROM books WH");
    assert!(upper.is_empty());
}

#[test]
fn group_by_is_one_keyword() {
    let mut engine = library_engine();
    let candidates = type_text(&mut engine, "SELECT city, count(id) FROM stores GROUP BY ");

    assert_eq!(engine.state(), GrammarState::GroupBy);
    assert_eq!(candidates, ["id", "title", "price", "id", "city"]);
}

#[test]
fn order_by_then_direction_then_limit() {
    let mut engine = library_engine();
    type_text(&mut engine, "SELECT * FROM books ORDER BY price ");
    assert_eq!(engine.state(), GrammarState::ColumnName);

    let candidates = type_text(&mut engine, "SELECT * FROM books ORDER BY price desc ");
    assert_eq!(engine.state(), GrammarState::Direction);
    assert_eq!(candidates, ["limit"]);

    type_text(&mut engine, "SELECT * FROM books ORDER BY price desc limit 10 ");
    assert_eq!(engine.state(), GrammarState::LimitCount);
    assert_eq!(engine.machine().token_buffer(), ["BOOKS", "10"]);
}

#[test]
fn aggregate_returns_to_caller() {
    let mut machine = GrammarStateMachine::new();
    for token in ["select", "sum", "price", ",", "count"] {
        machine.process(token);
    }
    assert_eq!(machine.current_state(), GrammarState::Function);
    assert_eq!(machine.stack(), [GrammarState::ExpressionList]);

    machine.process("id");
    assert_eq!(machine.current_state(), GrammarState::ExpressionList);
    assert!(machine.stack().is_empty());
}

#[test]
fn tokenizer_delivers_merged_keyword() {
    let stream = TokenStream::scan("SELECT a FROM b order BY ");
    assert_eq!(stream.delivered_token().as_deref(), Some("order BY"));
}

#[test]
fn reset_between_statements() {
    let mut engine = library_engine();
    type_text(&mut engine, "SELECT * FROM books ");
    engine.reset();

    assert_eq!(engine.state(), GrammarState::Initial);
    let set = engine.complete("s").unwrap();
    assert_eq!(set.candidates, ["select"]);
    assert_eq!(set.replace, 1);
}
