//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser. Rules are tried in
//! priority order at every position:
//!
//! 1. `/regex/` with `\/` for a literal slash
//! 2. `"quoted"` and `'quoted'` literals, turned into anchored escaped regexes
//! 3. relational operators `<=`, `>=`, `!=`, `<`, `>`
//! 4. structural characters `= | ( ) & ! , #`
//! 5. whitespace (skipped)
//! 6. bare words, up to the next structural character
//!
//! Letters glued to the closing delimiter of a regex or quoted literal become a
//! [`TokenKind::RegexModifiers`] token. The stream always ends with
//! [`TokenKind::EndOfInput`].

use std::{iter::Peekable, str::CharIndices};

use crate::error::LexError;

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `!`
    Negation,
    /// `&`
    Intersect,
    /// `|`
    Union,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// A bare word: a tag name, free text, or a numeric operand.
    TagName,
    /// The body of a `/regex/`, or a quoted literal already turned into a regex.
    RegexBody,
    /// Flag letters following a regex or quoted literal.
    RegexModifiers,
    /// `<`, `<=`, `>`, `>=` or `!=`.
    RelOp,
    /// `#`
    NumericMarker,
    /// Terminal sentinel.
    EndOfInput,
}

impl TokenKind {
    /// Human-readable name used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Negation => "'!'",
            Self::Intersect => "'&'",
            Self::Union => "'|'",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
            Self::Equals => "'='",
            Self::Comma => "','",
            Self::TagName => "a tag name or word",
            Self::RegexBody => "a /regex/ or quoted string",
            Self::RegexModifiers => "regex modifiers",
            Self::RelOp => "a comparison operator",
            Self::NumericMarker => "'#'",
            Self::EndOfInput => "end of query",
        }
    }
}

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The token text. Regex bodies are unescaped, bare words are trimmed.
    pub text: String,
    /// Byte offset of the token in the trimmed input.
    pub position: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

/// Characters that end a bare word.
fn is_structural(ch: char) -> bool {
    matches!(
        ch,
        '=' | '|' | '(' | ')' | '&' | '!' | ',' | '#' | '/' | '<' | '>'
    )
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            let glued = matches!(token.kind, TokenKind::RegexBody);
            tokens.push(token);
            if glued && let Some(mods) = self.read_modifiers() {
                tokens.push(mods);
            }
        }

        tokens.push(Token::new(TokenKind::EndOfInput, "", self.input.len()));
        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(&(start, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '/' => self.read_regex(start)?,
            '"' | '\'' => match self.read_quoted(start, ch) {
                Some(token) => token,
                // An unterminated quote is just part of a word.
                None => self.read_word(start),
            },
            '<' | '>' => {
                self.advance();
                if self.eat('=') {
                    Token::new(TokenKind::RelOp, format!("{ch}="), start)
                } else {
                    Token::new(TokenKind::RelOp, ch.to_string(), start)
                }
            }
            '!' => {
                self.advance();
                if self.eat('=') {
                    Token::new(TokenKind::RelOp, "!=", start)
                } else {
                    Token::new(TokenKind::Negation, "!", start)
                }
            }
            '=' | '|' | '(' | ')' | '&' | ',' | '#' => {
                self.advance();
                let kind = match ch {
                    '=' => TokenKind::Equals,
                    '|' => TokenKind::Union,
                    '(' => TokenKind::OpenParen,
                    ')' => TokenKind::CloseParen,
                    '&' => TokenKind::Intersect,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::NumericMarker,
                };
                Token::new(kind, ch.to_string(), start)
            }
            _ => self.read_word(start),
        };

        Ok(Some(token))
    }

    /// Reads a `/…/` regex. The body keeps its escapes except `\/`, which becomes `/`.
    fn read_regex(&mut self, start: usize) -> Result<Token, LexError> {
        let mut lookahead = self.chars.clone();
        lookahead.next(); // opening slash

        let mut body = String::new();
        loop {
            match lookahead.next() {
                Some((_, '/')) => break,
                Some((_, '\\')) => match lookahead.next() {
                    Some((_, '/')) => body.push('/'),
                    Some((_, escaped)) => {
                        body.push('\\');
                        body.push(escaped);
                    }
                    None => {
                        return Err(LexError::new("characters left over in query", start, self.input));
                    }
                },
                Some((_, ch)) => body.push(ch),
                None => {
                    return Err(LexError::new("characters left over in query", start, self.input));
                }
            }
        }

        self.chars = lookahead;
        Ok(Token::new(TokenKind::RegexBody, body, start))
    }

    /// Reads a quoted literal and converts it to an anchored, fully escaped regex.
    ///
    /// Returns `None` (consuming nothing) if the quote is never closed.
    fn read_quoted(&mut self, start: usize, quote: char) -> Option<Token> {
        let mut lookahead = self.chars.clone();
        lookahead.next(); // opening quote

        let mut raw = String::new();
        loop {
            match lookahead.next()? {
                (_, ch) if ch == quote => break,
                (_, '\\') => {
                    let (_, escaped) = lookahead.next()?;
                    raw.push('\\');
                    raw.push(escaped);
                }
                (_, ch) => raw.push(ch),
            }
        }

        self.chars = lookahead;
        let literal = unescape_literal(&raw);
        Some(Token::new(
            TokenKind::RegexBody,
            format!("^{}$", regex::escape(&literal)),
            start,
        ))
    }

    /// Reads modifier letters glued to the end of a regex or quoted literal.
    fn read_modifiers(&mut self) -> Option<Token> {
        let &(start, ch) = self.chars.peek()?;
        if !ch.is_ascii_alphabetic() {
            return None;
        }

        let mut mods = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if !ch.is_ascii_alphabetic() {
                break;
            }
            mods.push(ch);
            self.advance();
        }

        Some(Token::new(TokenKind::RegexModifiers, mods, start))
    }

    /// Reads a bare word. Inner whitespace is kept, surrounding whitespace is trimmed.
    fn read_word(&mut self, start: usize) -> Token {
        let mut end = start;
        while let Some(&(idx, ch)) = self.chars.peek() {
            if is_structural(ch) {
                break;
            }
            end = idx + ch.len_utf8();
            self.advance();
        }

        Token::new(TokenKind::TagName, self.input[start..end].trim(), start)
    }

    /// Consumes `expected` if it is the next character.
    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek().is_some_and(|&(_, ch)| ch == expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        self.chars.next();
    }
}

/// Decodes backslash escapes in a quoted literal.
///
/// `\n`, `\t`, `\r`, `\0`, `\xHH`, `\\` and escaped quotes are decoded; any other
/// escape is kept as written.
fn unescape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.clone().take(2).collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 => {
                        out.push(char::from(byte));
                        chars.nth(1);
                    }
                    _ => out.push_str("\\x"),
                }
            }
            Some(c @ ('\\' | '"' | '\'')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Tokenizes a query string. Surrounding whitespace is stripped first.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input.trim()).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::EndOfInput]);
        assert_eq!(kinds("   "), vec![TokenKind::EndOfInput]);
    }

    #[test]
    fn tag_equals_word() {
        assert_eq!(
            kinds("artist = beatles"),
            vec![
                TokenKind::TagName,
                TokenKind::Equals,
                TokenKind::TagName,
                TokenKind::EndOfInput
            ]
        );
        assert_eq!(texts("artist = beatles"), vec!["artist", "=", "beatles", ""]);
    }

    #[test]
    fn words_keep_inner_whitespace() {
        assert_eq!(
            texts("artist = rolling  stones "),
            vec!["artist", "=", "rolling  stones", ""]
        );
    }

    #[test]
    fn regex_body() {
        let tokens = tokenize("artist = /^be.*s$/").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::RegexBody);
        assert_eq!(tokens[2].text, "^be.*s$");
        assert_eq!(tokens[2].position, 9);
    }

    #[test]
    fn regex_escaped_slash() {
        let tokens = tokenize(r"/AC\/DC/").unwrap();
        assert_eq!(tokens[0].text, "AC/DC");
    }

    #[test]
    fn regex_keeps_other_escapes() {
        let tokens = tokenize(r"/a\.b\\/").unwrap();
        assert_eq!(tokens[0].text, r"a\.b\\");
    }

    #[test]
    fn regex_modifiers_glued() {
        assert_eq!(
            kinds("/foo/ci"),
            vec![
                TokenKind::RegexBody,
                TokenKind::RegexModifiers,
                TokenKind::EndOfInput
            ]
        );
        assert_eq!(texts("/foo/ci")[1], "ci");
    }

    #[test]
    fn regex_modifiers_not_glued_across_space() {
        assert_eq!(
            kinds("/foo/ c"),
            vec![TokenKind::RegexBody, TokenKind::TagName, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn unterminated_regex_is_lex_error() {
        let err = tokenize("artist = /abc").unwrap_err();
        assert_eq!(err.position, 9);
        assert_eq!(err.fragment, "/abc");
    }

    #[test]
    fn trailing_backslash_in_regex_is_lex_error() {
        assert!(tokenize(r"/abc\").is_err());
    }

    #[test]
    fn quoted_string_becomes_anchored_literal() {
        let tokens = tokenize("artist = \"AC/DC\"").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::RegexBody);
        assert_eq!(tokens[2].text, "^AC/DC$");
    }

    #[test]
    fn quoted_string_escapes_regex_metacharacters() {
        let tokens = tokenize("'a.b (c)'").unwrap();
        assert_eq!(tokens[0].text, r"^a\.b \(c\)$");
    }

    #[test]
    fn quoted_string_unescapes() {
        let tokens = tokenize(r#""say \"hi\"""#).unwrap();
        assert_eq!(tokens[0].text, r#"^say "hi"$"#);
    }

    #[test]
    fn single_quotes_may_contain_double_quotes() {
        let tokens = tokenize(r#"'a"b'"#).unwrap();
        assert_eq!(tokens[0].text, r#"^a"b$"#);
    }

    #[test]
    fn unterminated_quote_is_a_word() {
        let tokens = tokenize("\"abc").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::TagName);
        assert_eq!(tokens[0].text, "\"abc");
    }

    #[test]
    fn relational_operators_longest_first() {
        assert_eq!(
            texts("<= >= != < >"),
            vec!["<=", ">=", "!=", "<", ">", ""]
        );
        assert!(
            kinds("<= >= != < >")[..5]
                .iter()
                .all(|k| *k == TokenKind::RelOp)
        );
    }

    #[test]
    fn negation_is_not_not_equals() {
        assert_eq!(
            kinds("!a"),
            vec![TokenKind::Negation, TokenKind::TagName, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn structural_tokens() {
        assert_eq!(
            kinds("&(|(!#,=))"),
            vec![
                TokenKind::Intersect,
                TokenKind::OpenParen,
                TokenKind::Union,
                TokenKind::OpenParen,
                TokenKind::Negation,
                TokenKind::NumericMarker,
                TokenKind::Comma,
                TokenKind::Equals,
                TokenKind::CloseParen,
                TokenKind::CloseParen,
                TokenKind::EndOfInput
            ]
        );
    }

    #[test]
    fn numeric_comparison() {
        assert_eq!(
            texts("#(30 < length < 4:00)"),
            vec!["#", "(", "30", "<", "length", "<", "4:00", ")", ""]
        );
    }

    #[test]
    fn positions_are_relative_to_trimmed_input() {
        let tokens = tokenize("   a = b").unwrap();
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[2].position, 4);
    }

    #[test]
    fn unicode_words() {
        assert_eq!(texts("artist = Múm"), vec!["artist", "=", "Múm", ""]);
    }

    #[test]
    fn unescape_hex() {
        assert_eq!(unescape_literal(r"\x41b"), "Ab");
        assert_eq!(unescape_literal(r"\xZZ"), r"\xZZ");
        assert_eq!(unescape_literal(r"a\qb"), r"a\qb");
    }
}
