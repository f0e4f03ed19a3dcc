//! Candidate provider for completion suggestions
//!
//! Turns a grammar state into the literal words a user could type to get
//! there: fixed keywords, aggregate functions, logical operators, or names
//! taken from the schema catalog.

use std::cell::OnceCell;

use crate::catalog::SchemaCatalog;
use crate::error::CompletionError;

use super::fsm::GrammarState;

/// Aggregate functions, as suggested
pub const AGGREGATE_FUNCTIONS: [&str; 5] = ["count", "sum", "avg", "min", "max"];

/// Logical operators, as suggested
pub const LOGICAL_OPERATORS: [&str; 3] = ["not", "and", "or"];

/// Sort directions, as suggested
pub const DIRECTIONS: [&str; 2] = ["asc", "desc"];

/// Catalog view for a single completion request
///
/// Each catalog listing is fetched at most once and then reused, so a refresh
/// of the underlying metadata cannot change the answers halfway through one
/// request.
pub struct CatalogSnapshot<'a> {
    catalog: &'a dyn SchemaCatalog,
    collections: OnceCell<Vec<String>>,
    fields: OnceCell<Vec<String>>,
}

impl<'a> CatalogSnapshot<'a> {
    /// Create a snapshot; nothing is fetched until needed
    pub fn new(catalog: &'a dyn SchemaCatalog) -> Self {
        Self {
            catalog,
            collections: OnceCell::new(),
            fields: OnceCell::new(),
        }
    }

    /// Collection names
    pub fn collections(&self) -> &[String] {
        self.collections.get_or_init(|| self.catalog.list_collections())
    }

    /// Field names of every collection, flattened in catalog order
    ///
    /// Names are neither deduplicated nor qualified with their collection.
    pub fn fields(&self) -> &[String] {
        self.fields.get_or_init(|| {
            self.collections()
                .iter()
                .flat_map(|collection| self.catalog.list_fields(collection))
                .collect()
        })
    }
}

/// Literal words that lead into `state`
///
/// # Errors
/// * `CompletionError::NoSurfaceForm` - for `INITIAL`, which is never a
///   candidate and has nothing to type
pub fn surface_forms(
    state: GrammarState,
    snapshot: &CatalogSnapshot<'_>,
) -> Result<Vec<String>, CompletionError> {
    use GrammarState::*;

    let words = match state {
        Initial => return Err(CompletionError::NoSurfaceForm(state)),
        Select => keywords(&["select"]),
        From => keywords(&["from"]),
        Where => keywords(&["where"]),
        GroupBy => keywords(&["group by"]),
        OrderBy => keywords(&["order by"]),
        Limit => keywords(&["limit"]),
        Direction => keywords(&DIRECTIONS),
        ExpressionList | Operator => fields_then(snapshot, &[&AGGREGATE_FUNCTIONS[..]]),
        Condition => fields_then(
            snapshot,
            &[&AGGREGATE_FUNCTIONS[..], &LOGICAL_OPERATORS[..]],
        ),
        CollectionName => snapshot.collections().to_vec(),
        ColumnName | ColumnNameList => snapshot.fields().to_vec(),
        Expression | Function | LimitCount | As => Vec::new(),
    };

    Ok(words)
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// Field names followed by fixed word lists
fn fields_then(snapshot: &CatalogSnapshot<'_>, lists: &[&[&str]]) -> Vec<String> {
    let mut words = snapshot.fields().to_vec();
    for list in lists {
        words.extend(list.iter().map(|w| (*w).to_string()));
    }
    words
}
