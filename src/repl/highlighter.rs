//! Syntax highlighter for the Solr SQL dialect
//!
//! Colors clause keywords, aggregate functions, logical operators, literals and
//! punctuation as the statement is typed. The text itself is never altered, so
//! the rendered line always matches the editor buffer.

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use super::completion::{AGGREGATE_FUNCTIONS, DIRECTIONS, LOGICAL_OPERATORS};

/// Clause keywords of the dialect
const KEYWORDS: [&str; 8] = ["select", "from", "where", "group", "order", "by", "limit", "as"];

/// Syntax highlighter for the REPL line
pub struct SqlHighlighter {
    enabled: bool,
}

impl SqlHighlighter {
    /// Create a new highlighter
    ///
    /// # Arguments
    /// * `enabled` - Whether to emit styles at all
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn is_keyword(word: &str) -> bool {
        let lower = word.to_ascii_lowercase();
        KEYWORDS.contains(&lower.as_str()) || DIRECTIONS.contains(&lower.as_str())
    }

    fn is_function(word: &str) -> bool {
        AGGREGATE_FUNCTIONS.contains(&word.to_ascii_lowercase().as_str())
    }

    fn is_logical(word: &str) -> bool {
        LOGICAL_OPERATORS.contains(&word.to_ascii_lowercase().as_str())
    }

    fn word_style(word: &str) -> Style {
        if Self::is_keyword(word) {
            Color::Green.bold()
        } else if Self::is_function(word) {
            Color::Magenta.normal()
        } else if Self::is_logical(word) {
            Color::Blue.bold()
        } else if word.chars().all(|c| c.is_ascii_digit()) {
            Color::Yellow.normal()
        } else {
            Style::default()
        }
    }

    fn symbol_style(ch: char) -> Style {
        match ch {
            '(' | ')' => Color::Cyan.normal(),
            ',' | '.' | ';' => Color::DarkGray.normal(),
            '*' | '=' | '<' | '>' | '!' => Color::Blue.normal(),
            _ => Style::default(),
        }
    }

    fn flush_word(styled: &mut StyledText, word: &mut String) {
        if !word.is_empty() {
            styled.push((Self::word_style(word), std::mem::take(word)));
        }
    }

    fn highlight_line(line: &str) -> StyledText {
        let mut styled = StyledText::new();
        let mut word = String::new();
        let mut chars = line.char_indices().peekable();

        while let Some((index, ch)) = chars.next() {
            // `--` comments run to the end of the line
            if ch == '-' && matches!(chars.peek(), Some((_, '-'))) {
                Self::flush_word(&mut styled, &mut word);
                styled.push((Color::DarkGray.dimmed(), line[index..].to_string()));
                break;
            }

            if ch == '\'' || ch == '"' {
                Self::flush_word(&mut styled, &mut word);
                let mut literal = ch.to_string();
                for (_, next) in chars.by_ref() {
                    literal.push(next);
                    if next == ch {
                        break;
                    }
                }
                styled.push((Color::Yellow.normal(), literal));
                continue;
            }

            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                continue;
            }

            Self::flush_word(&mut styled, &mut word);
            styled.push((Self::symbol_style(ch), ch.to_string()));
        }

        Self::flush_word(&mut styled, &mut word);
        styled
    }
}

impl Default for SqlHighlighter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Highlighter for SqlHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        if !self.enabled {
            let mut styled = StyledText::new();
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        Self::highlight_line(line)
    }
}
