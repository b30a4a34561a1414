//! Error types for lexing, parsing, and compiling queries.
//!
//! Lexer and parser failures stay typed ([`LexError`], [`ParseError`], [`RegexError`]) and
//! are gathered into a [`QueryError`] at the compiler boundary, which renders the failing
//! query with a caret under the offending position.

use std::{error::Error, fmt};

use thiserror::Error;

use crate::lexer::TokenKind;

/// Lexer error: a fragment of the input could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}: {fragment:?}")]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// The unconsumed input starting at the failure.
    pub fragment: String,
    /// Byte position in input where error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error. The fragment is the rest of the input from `position`.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        let fragment = input.get(position..).unwrap_or_default().to_string();
        Self {
            message: message.into(),
            fragment,
            position,
            input: input.to_string(),
        }
    }
}

/// Grammar violation found by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// The lexeme of the token the parser choked on, if any.
    pub lexeme: Option<String>,
    /// Token kinds that would have been accepted instead.
    pub expected: Vec<TokenKind>,
    /// Byte position of the offending token (if applicable).
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            lexeme: None,
            expected: Vec::new(),
            position,
        }
    }

    /// Records the lexeme of the offending token.
    pub fn with_lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.lexeme = Some(lexeme.into());
        self
    }

    /// Records which token kinds would have been accepted.
    pub fn expecting(mut self, expected: &[TokenKind]) -> Self {
        self.expected = expected.to_vec();
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.expected.is_empty() {
            let names: Vec<&str> = self.expected.iter().map(TokenKind::describe).collect();
            write!(f, " (expected {})", names.join(" or "))?;
        }
        Ok(())
    }
}

impl Error for ParseError {}

/// A regex body that lexed and parsed fine but does not compile.
#[derive(Debug, Clone, Error)]
#[error("invalid regular expression /{pattern}/: {source}")]
pub struct RegexError {
    /// The pattern as handed to the regex engine.
    pub pattern: String,
    /// Byte position of the regex token in the query.
    pub position: Option<usize>,
    /// Underlying regex error.
    pub source: regex::Error,
}

/// Diacritic folding could not rewrite a pattern.
///
/// Never surfaced to callers: the compiler falls back to the unmodified pattern.
#[derive(Debug, Clone, Error)]
pub enum FoldError {
    /// The pattern could not be parsed.
    #[error("cannot parse pattern for folding: {0}")]
    Syntax(#[from] regex_syntax::ast::Error),
    /// The pattern uses a construct the rewriter does not handle.
    #[error("pattern construct not supported by folding: {0}")]
    Unsupported(&'static str),
}

/// A unified error type for query compilation.
///
/// This type provides detailed error messages with context, including
/// the original query string and position indicators where applicable.
#[derive(Debug, Clone)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string (if available).
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone)]
pub enum QueryErrorKind {
    /// Tokenization failed.
    Lex(LexError),
    /// Invalid syntax.
    Parse(ParseError),
    /// A pattern failed to compile.
    Regex(RegexError),
}

impl QueryError {
    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match &self.kind {
            QueryErrorKind::Lex(err) => err.to_string(),
            QueryErrorKind::Parse(err) => err.to_string(),
            QueryErrorKind::Regex(err) => err.to_string(),
        }
    }

    /// Returns the byte offset into the query where the error was detected.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex(err) => Some(err.position),
            QueryErrorKind::Parse(err) => err.position,
            QueryErrorKind::Regex(err) => err.position,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            QueryErrorKind::Lex(err) if err.fragment.starts_with('/') => {
                Some("Close the regular expression with '/', or write '\\/' for a literal slash")
            }
            QueryErrorKind::Parse(err) if err.expected.contains(&TokenKind::CloseParen) => {
                Some("Add a closing parenthesis ) to match the opening one")
            }
            QueryErrorKind::Parse(err) if err.expected.contains(&TokenKind::Equals) => {
                Some("Tag searches look like 'artist = beatles'")
            }
            QueryErrorKind::Parse(err) if err.message.contains("modifier") => {
                Some("Valid regex modifiers are c, i, s, l and d")
            }
            QueryErrorKind::Regex(_) => {
                Some("Quote the value (\"...\") to search for it literally")
            }
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match &self.kind {
            QueryErrorKind::Lex(_) | QueryErrorKind::Parse(_) => "query syntax error",
            QueryErrorKind::Regex(_) => "query error",
        };

        writeln!(f, "{}: {}", prefix, self.message())?;

        if let Some(query) = &self.query {
            writeln!(f, "  {}", query)?;
            if let Some(pos) = self.position() {
                let column = query.get(..pos).map_or(0, |prefix| prefix.chars().count());
                writeln!(f, "  {}^", " ".repeat(column))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {}", suggestion)?;
        }

        Ok(())
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            QueryErrorKind::Lex(err) => Some(err),
            QueryErrorKind::Parse(err) => Some(err),
            QueryErrorKind::Regex(err) => Some(err),
        }
    }
}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        let query = Some(err.input.clone());
        Self {
            kind: QueryErrorKind::Lex(err),
            query,
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: QueryErrorKind::Parse(err),
            query: None,
        }
    }
}

impl From<RegexError> for QueryError {
    fn from(err: RegexError) -> Self {
        Self {
            kind: QueryErrorKind::Regex(err),
            query: None,
        }
    }
}
