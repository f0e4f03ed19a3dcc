//! Logical token stream for completion
//!
//! Splits the text typed so far into logical tokens: maximal runs of word
//! characters, or single non-word characters. Whitespace only separates tokens
//! and never becomes one. The stream also remembers the last raw character of
//! the text, which decides whether the user just finished a token.
//!
//! The stream is rebuilt from scratch for every request. It never fails: any
//! input, including an empty line, produces a valid (possibly empty) stream.

/// Token that opens an aggregate call.
const OPEN_PAREN: &str = "(";
/// Token that closes an aggregate call.
const CLOSE_PAREN: &str = ")";
/// Token separating expressions.
const COMMA: &str = ",";
/// Second word of the `GROUP BY` and `ORDER BY` keywords.
const BY: &str = "by";

/// Characters that end a token when typed last.
pub const BOUNDARY_CHARS: [char; 4] = [' ', ',', '(', ')'];

/// Tokenized view of the text typed so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    /// Logical tokens in input order
    tokens: Vec<String>,
    /// Last raw character of the text, whitespace included
    last_char: Option<char>,
}

impl TokenStream {
    /// Tokenize the text typed so far
    pub fn scan(text: &str) -> Self {
        let mut tokens = Vec::new();
        let mut word = String::new();

        for ch in text.chars() {
            if is_word_char(ch) {
                word.push(ch);
                continue;
            }

            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            if !ch.is_whitespace() {
                tokens.push(ch.to_string());
            }
        }
        if !word.is_empty() {
            tokens.push(word);
        }

        tracing::trace!(?tokens, "scanned input");

        Self {
            tokens,
            last_char: text.chars().last(),
        }
    }

    /// All logical tokens
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The last logical token, or the empty string when there is none
    pub fn last_token(&self) -> &str {
        self.tokens.last().map(String::as_str).unwrap_or("")
    }

    /// The last raw character of the text
    pub fn last_char(&self) -> Option<char> {
        self.last_char
    }

    /// Check whether the text ends on a token boundary
    ///
    /// A boundary is a trailing space, or a last token that is itself a comma
    /// or a parenthesis.
    pub fn at_boundary(&self) -> bool {
        self.last_char == Some(' ')
            || matches!(self.last_token(), COMMA | OPEN_PAREN | CLOSE_PAREN)
    }

    /// The logical token to hand to the grammar engine, if any
    ///
    /// Returns `None` in the middle of a token. At a boundary:
    /// - a trailing parenthesis re-presents the token two positions back, so the
    ///   engine sees the function name (or argument) next to the punctuation;
    /// - a trailing `by` is joined with the token before it, so `GROUP BY` and
    ///   `ORDER BY` arrive as one token;
    /// - anything else is delivered as is.
    pub fn delivered_token(&self) -> Option<String> {
        if !self.at_boundary() {
            return None;
        }

        let count = self.tokens.len();
        let last = self.tokens.last()?;

        let delivered = if last == OPEN_PAREN || last == CLOSE_PAREN {
            match count.checked_sub(2) {
                Some(index) => self.tokens[index].clone(),
                None => last.clone(),
            }
        } else if last.eq_ignore_ascii_case(BY) {
            self.tokens[count.saturating_sub(2)..].join(" ")
        } else {
            last.clone()
        };

        Some(delivered)
    }

    /// Check if the stream has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Word characters: letters, digits and underscore
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_words_and_symbols() {
        let stream = TokenStream::scan("SELECT count(*), name FROM books");
        assert_eq!(
            stream.tokens(),
            ["SELECT", "count", "(", "*", ")", ",", "name", "FROM", "books"]
        );
        assert_eq!(stream.last_token(), "books");
        assert_eq!(stream.last_char(), Some('s'));
    }

    #[test]
    fn test_scan_splits_multi_char_operators() {
        let stream = TokenStream::scan("price>=10");
        assert_eq!(stream.tokens(), ["price", ">", "=", "10"]);
    }

    #[test]
    fn test_scan_empty_input() {
        let stream = TokenStream::scan("");
        assert!(stream.is_empty());
        assert_eq!(stream.last_token(), "");
        assert_eq!(stream.last_char(), None);
        assert!(!stream.at_boundary());
        assert_eq!(stream.delivered_token(), None);
    }

    #[test]
    fn test_whitespace_only_has_boundary_but_nothing_to_deliver() {
        let stream = TokenStream::scan("   ");
        assert!(stream.is_empty());
        assert!(stream.at_boundary());
        assert_eq!(stream.delivered_token(), None);
    }

    #[test]
    fn test_mid_token_is_not_a_boundary() {
        let stream = TokenStream::scan("SELECT na");
        assert!(!stream.at_boundary());
        assert_eq!(stream.delivered_token(), None);

        let stream = TokenStream::scan("SELECT *");
        assert!(!stream.at_boundary());
    }

    #[test]
    fn test_trailing_space_delivers_last_token() {
        let stream = TokenStream::scan("select ");
        assert_eq!(stream.delivered_token(), Some("select".to_string()));
    }

    #[test]
    fn test_comma_is_a_boundary_without_space() {
        let stream = TokenStream::scan("SELECT id,");
        assert!(stream.at_boundary());
        assert_eq!(stream.last_char(), Some(','));
        assert_eq!(stream.delivered_token(), Some(",".to_string()));
    }

    #[test]
    fn test_open_paren_delivers_function_name() {
        let stream = TokenStream::scan("SELECT COUNT(");
        assert_eq!(stream.last_token(), "(");
        assert_eq!(stream.delivered_token(), Some("COUNT".to_string()));
    }

    #[test]
    fn test_close_paren_delivers_argument() {
        let stream = TokenStream::scan("SELECT COUNT(id)");
        assert_eq!(stream.delivered_token(), Some("id".to_string()));
    }

    #[test]
    fn test_lone_paren_delivers_itself() {
        let stream = TokenStream::scan("(");
        assert_eq!(stream.delivered_token(), Some("(".to_string()));
    }

    #[test]
    fn test_by_is_merged_with_previous_token() {
        let stream = TokenStream::scan("SELECT a FROM b GROUP BY ");
        assert_eq!(stream.delivered_token(), Some("GROUP BY".to_string()));

        let stream = TokenStream::scan("select a from b order by ");
        assert_eq!(stream.delivered_token(), Some("order by".to_string()));
    }

    #[test]
    fn test_by_merge_uses_only_two_tokens() {
        let stream = TokenStream::scan("x y GROUP By ");
        assert_eq!(stream.delivered_token(), Some("GROUP By".to_string()));
    }

    #[test]
    fn test_lone_by_is_delivered_alone() {
        let stream = TokenStream::scan("by ");
        assert_eq!(stream.delivered_token(), Some("by".to_string()));
    }
}
