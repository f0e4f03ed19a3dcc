//! Custom prompt implementation for solrsh

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

/// Default prompt text
const DEFAULT_PROMPT: &str = "> ";

/// Prompt for the solrsh REPL
pub struct SqlPrompt {
    /// Text shown before the cursor
    prompt: String,
}

impl SqlPrompt {
    /// Create a prompt with the default `> ` text
    pub fn new() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Create a prompt showing a collection context, e.g. `books> `
    ///
    /// # Arguments
    /// * `context` - Text shown before the prompt marker
    pub fn with_context(context: &str) -> Self {
        Self {
            prompt: format!("{context}{DEFAULT_PROMPT}"),
        }
    }
}

impl Default for SqlPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for SqlPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.prompt)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    /// The marker is part of the left prompt already
    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    /// Render the history search prompt
    ///
    /// # Arguments
    /// * `history_search` - History search state
    ///
    /// # Returns
    /// * `Cow<str>` - History search prompt
    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt() {
        let prompt = SqlPrompt::new();
        assert_eq!(prompt.render_prompt_left(), "> ");
    }

    #[test]
    fn test_prompt_with_context() {
        let prompt = SqlPrompt::with_context("books");
        assert_eq!(prompt.render_prompt_left(), "books> ");
    }

    #[test]
    fn test_right_prompt_and_indicator_empty() {
        let prompt = SqlPrompt::new();
        assert_eq!(prompt.render_prompt_right(), "");
        assert_eq!(prompt.render_prompt_indicator(PromptEditMode::Default), "");
    }

    #[test]
    fn test_multiline_indicator() {
        let prompt = SqlPrompt::new();
        assert_eq!(prompt.render_prompt_multiline_indicator(), "... ");
    }

    #[test]
    fn test_history_search_indicator() {
        let prompt = SqlPrompt::new();
        let search = PromptHistorySearch {
            status: PromptHistorySearchStatus::Failing,
            term: "sel".to_string(),
        };
        assert_eq!(
            prompt.render_prompt_history_search_indicator(search),
            "(failing reverse-search: sel) "
        );
    }
}
