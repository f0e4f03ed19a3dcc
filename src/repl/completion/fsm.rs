//! Finite State Machine tracking the grammatical position in a query
//!
//! The machine walks the logical tokens of a SQL statement one at a time and
//! keeps track of where in the dialect's grammar the user currently is:
//!
//! ```text
//! SELECT <expressions> FROM <collection> [WHERE <conditions>]
//!        [GROUP BY <columns>] [ORDER BY <columns> [ASC|DESC]] [LIMIT <n>]
//! ```
//!
//! Two tables drive it, and they are deliberately kept apart:
//! - the transition function, which moves to exactly one state for a token;
//! - the advisory table, which lists the states worth *suggesting* from the
//!   current one. It is looser than the transition function: after a collection
//!   name it offers WHERE, GROUP BY, ORDER BY and LIMIT even though only one of
//!   them will be entered.
//!
//! The machine is error-tolerant. A token that no rule recognizes leaves the
//! state unchanged, so typos and free text never derail it.

use std::fmt;

use tracing::{debug, warn};

/// Aggregate functions accepted in the select list.
const AGGREGATES: [&str; 5] = ["COUNT", "SUM", "AVG", "MIN", "MAX"];

/// Logical operators accepted in conditions.
const LOGICAL_OPERATORS: [&str; 3] = ["AND", "OR", "NOT"];

/// Comparison operators accepted in conditions.
const COMPARISON_OPERATORS: [&str; 6] = ["=", "!=", "<", ">", "<=", ">="];

/// Words that never count as a bare identifier.
const RESERVED_WORDS: [&str; 18] = [
    "SELECT", "FROM", "WHERE", "GROUP", "ORDER", "BY", "LIMIT", "ASC", "DESC", "AS", "AND",
    "OR", "NOT", "COUNT", "SUM", "AVG", "MIN", "MAX",
];

/// Positions in the query grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarState {
    /// Nothing typed yet
    Initial,
    /// After `SELECT`
    Select,
    /// After `FROM` - expecting a collection name
    From,
    /// After `WHERE`
    Where,
    /// After `GROUP BY`
    GroupBy,
    /// After `ORDER BY`
    OrderBy,
    /// Inside a select list that may continue
    ExpressionList,
    /// After a single bare select expression
    Expression,
    /// After the first column of a GROUP BY / ORDER BY clause
    ColumnName,
    /// Inside an aggregate call
    Function,
    /// Inside a WHERE condition
    Condition,
    /// After a comparison operator - expecting an operand
    Operator,
    /// After further columns of a GROUP BY / ORDER BY clause
    ColumnNameList,
    /// After `ASC` / `DESC`
    Direction,
    /// After the collection name
    CollectionName,
    /// After `LIMIT` - expecting a count
    Limit,
    /// After the limit count
    LimitCount,
    /// Alias position; reserved, never entered by the current grammar
    As,
}

use GrammarState::*;

const INITIAL_NEXT: &[GrammarState] = &[Select];
const SELECT_NEXT: &[GrammarState] = &[ExpressionList];
const FROM_NEXT: &[GrammarState] = &[CollectionName];
const COLLECTION_NAME_NEXT: &[GrammarState] = &[Where, GroupBy, OrderBy, Limit];
const WHERE_NEXT: &[GrammarState] = &[Condition, Operator];
const GROUP_BY_NEXT: &[GrammarState] = &[ColumnNameList];
const ORDER_BY_NEXT: &[GrammarState] = &[ColumnName];
const EXPRESSION_NEXT: &[GrammarState] = &[ExpressionList, From, Where, GroupBy, OrderBy];
const COLUMN_NAME_NEXT: &[GrammarState] =
    &[ColumnNameList, From, GroupBy, OrderBy, Direction, Limit];
const FUNCTION_NEXT: &[GrammarState] = &[ExpressionList, From, GroupBy, OrderBy];
const CONDITION_NEXT: &[GrammarState] = &[Condition, Operator, GroupBy, OrderBy, Limit];
const OPERATOR_NEXT: &[GrammarState] = &[Condition];
const DIRECTION_NEXT: &[GrammarState] = &[Limit];

impl GrammarState {
    /// Upper-case name of the state, as used in logs and diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Initial => "INITIAL",
            Select => "SELECT",
            From => "FROM",
            Where => "WHERE",
            GroupBy => "GROUP_BY",
            OrderBy => "ORDER_BY",
            ExpressionList => "EXPRESSION_LIST",
            Expression => "EXPRESSION",
            ColumnName => "COLUMN_NAME",
            Function => "FUNCTION",
            Condition => "CONDITION",
            Operator => "OPERATOR",
            ColumnNameList => "COLUMN_NAME_LIST",
            Direction => "DIRECTION",
            CollectionName => "COLLECTION_NAME",
            Limit => "LIMIT",
            LimitCount => "LIMIT_COUNT",
            As => "AS",
        }
    }

    /// Check whether text ending in this state is already an executable prefix
    pub fn is_queryable(self) -> bool {
        matches!(self, From | Where | GroupBy | OrderBy)
    }

    /// States worth suggesting after this one
    pub fn advisory_next_states(self) -> &'static [GrammarState] {
        match self {
            Initial => INITIAL_NEXT,
            Select => SELECT_NEXT,
            From => FROM_NEXT,
            CollectionName => COLLECTION_NAME_NEXT,
            Where => WHERE_NEXT,
            GroupBy => GROUP_BY_NEXT,
            OrderBy => ORDER_BY_NEXT,
            ExpressionList | Expression => EXPRESSION_NEXT,
            ColumnName | ColumnNameList => COLUMN_NAME_NEXT,
            Function => FUNCTION_NEXT,
            Condition => CONDITION_NEXT,
            Operator => OPERATOR_NEXT,
            Direction => DIRECTION_NEXT,
            Limit | LimitCount | As => &[],
        }
    }

    /// Clause state introduced by a clause keyword
    fn clause(token: &str) -> Option<Self> {
        match token {
            "FROM" => Some(From),
            "WHERE" => Some(Where),
            "GROUP BY" => Some(GroupBy),
            "ORDER BY" => Some(OrderBy),
            "LIMIT" => Some(Limit),
            _ => None,
        }
    }
}

impl fmt::Display for GrammarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Effect of one recognized token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Move to another state
    Goto(GrammarState),
    /// Move to another state and keep the token in the buffer
    Capture(GrammarState),
    /// Enter an aggregate call, coming back to the given state when it closes
    Call(GrammarState),
    /// Leave the aggregate call
    Return,
}

/// Grammar tracker for one typing session
#[derive(Debug, Clone)]
pub struct GrammarStateMachine {
    /// Current position in the grammar
    current: GrammarState,
    /// Callers of the aggregate calls that are still open
    stack: Vec<GrammarState>,
    /// Identifiers, aggregate names and counts seen so far
    token_buffer: Vec<String>,
    /// Advisory states for `current`
    next_states: &'static [GrammarState],
}

impl GrammarStateMachine {
    /// Create a machine positioned at the start of a statement
    pub fn new() -> Self {
        Self {
            current: Initial,
            stack: Vec::new(),
            token_buffer: Vec::new(),
            next_states: INITIAL_NEXT,
        }
    }

    /// Return to the start of a statement
    pub fn reset(&mut self) {
        self.current = Initial;
        self.stack.clear();
        self.token_buffer.clear();
        self.next_states = INITIAL_NEXT;
    }

    /// Current grammar state
    pub fn current_state(&self) -> GrammarState {
        self.current
    }

    /// Advisory states computed after the last processed token
    pub fn next_states(&self) -> &'static [GrammarState] {
        self.next_states
    }

    /// Callers of the open aggregate calls, innermost last
    pub fn stack(&self) -> &[GrammarState] {
        &self.stack
    }

    /// Tokens remembered along the way
    pub fn token_buffer(&self) -> &[String] {
        &self.token_buffer
    }

    /// Check whether the text so far is an executable statement prefix
    pub fn is_valid(&self) -> bool {
        self.current.is_queryable()
    }

    /// Consume one logical token
    ///
    /// Applies at most one transition, then recomputes the advisory states for
    /// the state just reached. Unrecognized tokens leave the state unchanged.
    pub fn process(&mut self, token: &str) {
        let token = token.to_uppercase();
        let before = self.current;

        match self.step(&token) {
            Some(Step::Goto(state)) => self.current = state,
            Some(Step::Capture(state)) => {
                self.token_buffer.push(token.clone());
                self.current = state;
            }
            Some(Step::Call(caller)) => {
                self.stack.push(caller);
                self.token_buffer.push(token.clone());
                self.current = Function;
            }
            Some(Step::Return) => match self.stack.pop() {
                Some(caller) => self.current = caller,
                None => warn!(token = %token, "aggregate closed without an open call"),
            },
            None => {}
        }

        self.next_states = self.current.advisory_next_states();
        debug!(token = %token, from = %before, to = %self.current, "processed token");
    }

    /// Transition function: what `token` does in the current state
    fn step(&self, token: &str) -> Option<Step> {
        let step = match (self.current, token) {
            (Initial, "SELECT") => Step::Goto(Select),
            (Initial, _) => return None,

            (Select, t) if is_aggregate(t) => Step::Call(Select),
            (Select, "," | "*") => Step::Goto(ExpressionList),
            (Select, t) if is_name(t) => Step::Capture(Expression),
            (Select, _) => return None,

            (From, t) if is_name(t) => Step::Capture(CollectionName),
            (From, _) => return None,

            (Where, t) if is_logical(t) || is_name(t) => Step::Goto(Condition),
            (Where, t) if is_comparison(t) => Step::Goto(Operator),
            (Where, _) => return None,

            (GroupBy, t) if is_name(t) => Step::Capture(ColumnName),
            (GroupBy, _) => return None,

            (OrderBy, "ASC" | "DESC") => Step::Goto(Direction),
            (OrderBy, t) if is_name(t) => Step::Goto(ColumnName),
            (OrderBy, _) => return None,

            (ExpressionList, ",") => Step::Goto(ExpressionList),
            (ExpressionList, t) if is_aggregate(t) => Step::Call(ExpressionList),
            (ExpressionList, "FROM" | "WHERE" | "GROUP BY" | "ORDER BY") => {
                Step::Goto(GrammarState::clause(token)?)
            }
            (ExpressionList, t) if is_name(t) => Step::Capture(ExpressionList),
            (ExpressionList, _) => return None,

            (Expression, "," | "*") => Step::Goto(ExpressionList),
            (Expression, "FROM" | "WHERE" | "GROUP BY" | "ORDER BY") => {
                Step::Goto(GrammarState::clause(token)?)
            }
            (Expression, _) => return None,

            (ColumnName, "FROM" | "GROUP BY" | "ORDER BY") => {
                Step::Goto(GrammarState::clause(token)?)
            }
            (ColumnName, "ASC" | "DESC") => Step::Goto(Direction),
            (ColumnName, t) if is_name(t) => Step::Goto(ColumnNameList),
            (ColumnName, _) => return None,

            (Function, t) if is_name(t) => Step::Return,
            (Function, "*") => Step::Goto(Expression),
            (Function, _) => return None,

            (Condition, t) if is_logical(t) => Step::Goto(Condition),
            (Condition, t) if is_comparison(t) => Step::Goto(Operator),
            (Condition, "GROUP BY" | "ORDER BY" | "LIMIT") => {
                Step::Goto(GrammarState::clause(token)?)
            }
            (Condition, t) if is_name(t) => Step::Goto(Condition),
            (Condition, _) => return None,

            (Operator, t) if is_operand(t) => Step::Goto(Condition),
            (Operator, _) => return None,

            (ColumnNameList, t) if is_name(t) => Step::Goto(ColumnNameList),
            (ColumnNameList, "FROM" | "GROUP BY" | "ORDER BY") => {
                Step::Goto(GrammarState::clause(token)?)
            }
            (ColumnNameList, _) => return None,

            (Direction, "LIMIT") => Step::Goto(Limit),
            (Direction, _) => return None,

            (CollectionName, "LIMIT" | "WHERE" | "GROUP BY" | "ORDER BY") => {
                Step::Goto(GrammarState::clause(token)?)
            }
            (CollectionName, _) => return None,

            (Limit, t) if is_numeric(t) => Step::Capture(LimitCount),
            (Limit, _) => return None,

            (LimitCount | As, _) => return None,
        };

        Some(step)
    }
}

impl Default for GrammarStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

fn is_aggregate(token: &str) -> bool {
    AGGREGATES.contains(&token)
}

fn is_logical(token: &str) -> bool {
    LOGICAL_OPERATORS.contains(&token)
}

fn is_comparison(token: &str) -> bool {
    COMPARISON_OPERATORS.contains(&token)
}

/// Bare identifier: a letter followed by word characters, not a reserved word
fn is_name(token: &str) -> bool {
    let mut chars = token.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());

    starts_with_letter
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !RESERVED_WORDS.contains(&token)
}

/// Right-hand side of a comparison: letters, digits, `_-."` and spaces
fn is_operand(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '"' | ' '))
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}
