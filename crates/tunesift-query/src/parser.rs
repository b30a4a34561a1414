//! Query parser.
//!
//! Parses a token stream into a [`Matcher`] tree using recursive descent with one
//! token of lookahead. Patterns are compiled while parsing, so a tree that parses
//! is ready to evaluate.
//!
//! # Grammar
//!
//! ```text
//! query        → "|" "(" query_list ")" | "&" "(" query_list ")" | "!" query
//!              | "#" "(" comparison ("," comparison)* ")" | "(" query ")"
//!              | tag_list ("=" | "!=") value_set
//! query_list   → query ("," query)*
//! comparison   → operand relop operand (relop operand)?
//! tag_list     → TAG ("," TAG)*
//! value_set    → "|" "(" value_list ")" | "&" "(" value_list ")" | "!" value_set
//!              | WORD | REGEX MODIFIERS?
//! value_list   → value_set ("," value_set)*
//! ```
//!
//! A parenthesized list with a single entry is that entry, not a one-element group.

use std::cell::OnceCell;

use crate::{
    ast::{Matcher, TagMatch, ValueMatcher},
    error::{ParseError, QueryError, RegexError},
    fold::FoldingTable,
    lexer::{Token, TokenKind, tokenize},
    numeric::{NumericCompare, RelOp},
    pattern::{Pattern, PatternFlags},
};

/// Default limit on how deeply queries may nest.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard limit on nesting, whatever `max_depth` asks for. Parsing recurses once per
/// level, so this bounds stack use.
pub const MAX_DEPTH_CEILING: usize = 256;

/// Settings that affect how a query is parsed and its patterns compiled.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions<'a> {
    /// Table used for diacritic folding. Built on demand if a pattern asks for
    /// folding and none is given.
    pub folding_table: Option<&'a FoldingTable>,
    /// Fold every pattern, not only those with the `d` modifier.
    pub fold_by_default: bool,
    /// Maximum nesting depth of groups and negations, capped at [`MAX_DEPTH_CEILING`].
    pub max_depth: usize,
    /// Current Unix time, for relative ages such as `3 days`.
    pub now: f64,
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        Self {
            folding_table: None,
            fold_by_default: false,
            max_depth: DEFAULT_MAX_DEPTH,
            now: 0.0,
        }
    }
}

/// Recursive descent parser for query expressions.
struct Parser<'a> {
    /// Token stream to parse, ending with [`TokenKind::EndOfInput`].
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
    /// Current nesting depth.
    depth: usize,
    /// Parse settings.
    options: &'a ParseOptions<'a>,
    /// Folding table built for `d` patterns when the options carry none.
    fallback_table: OnceCell<FoldingTable>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token>, options: &'a ParseOptions<'a>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            options,
            fallback_table: OnceCell::new(),
        }
    }

    /// Parses a complete query.
    fn parse_query(mut self) -> Result<Matcher, QueryError> {
        let matcher = self.query()?;
        self.expect(&[TokenKind::EndOfInput])?;
        Ok(matcher)
    }

    /// Parses a bare value set and applies it to `fields`.
    ///
    /// A lone word is not a value set here, so that plain text can be treated
    /// separately by the caller.
    fn parse_value_query(mut self, fields: &[String]) -> Result<Matcher, QueryError> {
        let value = self.value_set(false)?;
        self.expect(&[TokenKind::EndOfInput])?;
        Ok(apply_to_fields(value, fields))
    }

    /// Parses: query
    fn query(&mut self) -> Result<Matcher, QueryError> {
        self.enter()?;
        let result = self.query_inner();
        self.depth -= 1;
        result
    }

    /// Dispatches on the first token of a query.
    fn query_inner(&mut self) -> Result<Matcher, QueryError> {
        match self.peek_kind() {
            TokenKind::Union => {
                self.advance();
                Ok(Matcher::any(self.parenthesized(Self::query)?))
            }
            TokenKind::Intersect => {
                self.advance();
                Ok(Matcher::all(self.parenthesized(Self::query)?))
            }
            TokenKind::Negation => {
                self.advance();
                Ok(Matcher::Negation(Box::new(self.query()?)))
            }
            TokenKind::NumericMarker => {
                self.advance();
                Ok(Matcher::all(self.parenthesized(Self::comparison)?))
            }
            TokenKind::OpenParen => {
                self.advance();
                let inner = self.query()?;
                self.expect_closing(&[TokenKind::CloseParen])?;
                Ok(inner)
            }
            TokenKind::TagName => self.tag_expr(),
            _ => Err(self
                .unexpected(&[
                    TokenKind::Union,
                    TokenKind::Intersect,
                    TokenKind::Negation,
                    TokenKind::NumericMarker,
                    TokenKind::OpenParen,
                    TokenKind::TagName,
                ])
                .into()),
        }
    }

    /// Parses: "(" item ("," item)* ")"
    fn parenthesized<T, F>(&mut self, mut item: F) -> Result<Vec<T>, QueryError>
    where
        F: FnMut(&mut Self) -> Result<T, QueryError>,
    {
        self.expect(&[TokenKind::OpenParen])?;

        let mut items = vec![item(self)?];
        while self.check(TokenKind::Comma) {
            self.advance();
            items.push(item(self)?);
        }

        self.expect_closing(&[TokenKind::Comma, TokenKind::CloseParen])?;
        Ok(items)
    }

    /// Parses: tag_list ("=" | "!=") value_set
    fn tag_expr(&mut self) -> Result<Matcher, QueryError> {
        let mut names = vec![self.tag_name()?];
        while self.check(TokenKind::Comma) {
            self.advance();
            names.push(self.tag_name()?);
        }

        let negated = match self.peek() {
            Some(token) if token.kind == TokenKind::Equals => false,
            Some(token) if token.kind == TokenKind::RelOp && token.text == "!=" => true,
            _ => return Err(self.unexpected(&[TokenKind::Comma, TokenKind::Equals]).into()),
        };
        self.advance();

        let tag = Matcher::Tag(TagMatch::new(names, self.value_set(true)?));
        Ok(if negated {
            Matcher::Negation(Box::new(tag))
        } else {
            tag
        })
    }

    /// Parses one tag name, which must be ASCII.
    fn tag_name(&mut self) -> Result<String, QueryError> {
        let token = self.expect(&[TokenKind::TagName])?;
        if !token.text.is_ascii() {
            return Err(ParseError::new(
                format!("tag name '{}' is not ASCII", token.text),
                Some(token.position),
            )
            .with_lexeme(token.text)
            .into());
        }
        Ok(token.text)
    }

    /// Parses: value_set
    fn value_set(&mut self, allow_word: bool) -> Result<ValueMatcher, QueryError> {
        self.enter()?;
        let result = self.value_set_inner(allow_word);
        self.depth -= 1;
        result
    }

    /// Dispatches on the first token of a value set.
    fn value_set_inner(&mut self, allow_word: bool) -> Result<ValueMatcher, QueryError> {
        match self.peek_kind() {
            TokenKind::Union => {
                self.advance();
                Ok(ValueMatcher::any(self.parenthesized(|p| p.value_set(true))?))
            }
            TokenKind::Intersect => {
                self.advance();
                Ok(ValueMatcher::all(self.parenthesized(|p| p.value_set(true))?))
            }
            TokenKind::Negation => {
                self.advance();
                Ok(ValueMatcher::Not(Box::new(self.value_set(true)?)))
            }
            TokenKind::TagName if allow_word => {
                let token = self.expect(&[TokenKind::TagName])?;
                let table = self.table_for(PatternFlags::default());
                let pattern = Pattern::literal(&token.text, table)
                    .map_err(|source| regex_error(&token, source))?;
                Ok(ValueMatcher::Pattern(pattern))
            }
            TokenKind::RegexBody => self.regex(),
            _ => {
                let mut expected = vec![
                    TokenKind::Union,
                    TokenKind::Intersect,
                    TokenKind::Negation,
                    TokenKind::RegexBody,
                ];
                if allow_word {
                    expected.push(TokenKind::TagName);
                }
                Err(self.unexpected(&expected).into())
            }
        }
    }

    /// Parses: REGEX MODIFIERS?
    fn regex(&mut self) -> Result<ValueMatcher, QueryError> {
        let token = self.expect(&[TokenKind::RegexBody])?;

        let mut flags = PatternFlags::default();
        if self.check(TokenKind::RegexModifiers) {
            let mods = self.expect(&[TokenKind::RegexModifiers])?;
            flags = flags.with_modifiers(&mods.text, mods.position)?;
        }

        let pattern = Pattern::compile(&token.text, flags, self.table_for(flags))
            .map_err(|source| regex_error(&token, source))?;
        Ok(ValueMatcher::Pattern(pattern))
    }

    /// Parses: operand relop operand (relop operand)?
    ///
    /// The chained form `a < field < b` becomes two comparisons sharing the middle
    /// operand, joined by an intersection.
    fn comparison(&mut self) -> Result<Matcher, QueryError> {
        let relops = [TokenKind::RelOp, TokenKind::Equals];

        let left = self.expect(&[TokenKind::TagName])?;
        let op = self.expect(&relops)?;
        let middle = self.expect(&[TokenKind::TagName])?;
        let first = self.compare(&left, &op, &middle)?;

        if !(self.check(TokenKind::RelOp) || self.check(TokenKind::Equals)) {
            return Ok(first);
        }

        let op = self.expect(&relops)?;
        let right = self.expect(&[TokenKind::TagName])?;
        let second = self.compare(&middle, &op, &right)?;
        Ok(Matcher::Intersection(vec![first, second]))
    }

    /// Builds one numeric comparison.
    fn compare(&self, left: &Token, op: &Token, right: &Token) -> Result<Matcher, QueryError> {
        let rel = RelOp::parse(&op.text).ok_or_else(|| {
            ParseError::new(format!("unknown operator '{}'", op.text), Some(op.position))
                .with_lexeme(&op.text)
        })?;

        NumericCompare::from_operands(&left.text, rel, &right.text, self.options.now)
            .map(Matcher::Numeric)
            .map_err(|message| ParseError::new(message, Some(left.position)).into())
    }

    /// The folding table to compile a pattern with, if it should be folded.
    fn table_for(&self, flags: PatternFlags) -> Option<&FoldingTable> {
        if !(flags.fold || self.options.fold_by_default) {
            return None;
        }
        Some(
            self.options
                .folding_table
                .unwrap_or_else(|| self.fallback_table.get_or_init(FoldingTable::new)),
        )
    }

    /// Descends one nesting level.
    fn enter(&mut self) -> Result<(), ParseError> {
        let limit = self.options.max_depth.min(MAX_DEPTH_CEILING);
        if self.depth >= limit {
            let position = self.peek().map(|t| t.position);
            return Err(ParseError::new(
                format!("query nested too deeply (limit {limit})"),
                position,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Consumes the current token if it is one of `kinds`.
    fn expect(&mut self, kinds: &[TokenKind]) -> Result<Token, ParseError> {
        match self.peek() {
            Some(token) if kinds.contains(&token.kind) => {
                let token = token.clone();
                self.advance();
                Ok(token)
            }
            _ => Err(self.unexpected(kinds)),
        }
    }

    /// Consumes a closing parenthesis, reporting `expected` on failure.
    fn expect_closing(&mut self, expected: &[TokenKind]) -> Result<(), ParseError> {
        if self.check(TokenKind::CloseParen) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Builds an error for the current token.
    fn unexpected(&self, expected: &[TokenKind]) -> ParseError {
        match self.peek() {
            Some(token) if token.kind != TokenKind::EndOfInput => {
                ParseError::new(format!("unexpected '{}'", token.text), Some(token.position))
                    .with_lexeme(&token.text)
                    .expecting(expected)
            }
            token => ParseError::new("unexpected end of query", token.map(|t| t.position))
                .expecting(expected),
        }
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// The kind of the current token.
    fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::EndOfInput, |t| t.kind)
    }

    /// Checks if the current token is of the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Wraps a regex compile failure with the token it came from.
fn regex_error(token: &Token, source: regex::Error) -> QueryError {
    RegexError {
        pattern: token.text.clone(),
        position: Some(token.position),
        source,
    }
    .into()
}

/// Spreads a bare value set over `fields`.
///
/// `&(a, b)` becomes one tag match per value, joined by intersection; `|` likewise with
/// a union. A leading `!` negates the whole result rather than the value.
fn apply_to_fields(value: ValueMatcher, fields: &[String]) -> Matcher {
    let tag = |v| Matcher::Tag(TagMatch::new(fields, v));
    match value {
        ValueMatcher::All(values) => Matcher::Intersection(values.into_iter().map(tag).collect()),
        ValueMatcher::Any(values) => Matcher::Union(values.into_iter().map(tag).collect()),
        ValueMatcher::Not(inner) => Matcher::Negation(Box::new(apply_to_fields(*inner, fields))),
        pattern @ ValueMatcher::Pattern(_) => tag(pattern),
    }
}

/// Parses a query in the full grammar.
pub fn parse(input: &str, options: &ParseOptions<'_>) -> Result<Matcher, QueryError> {
    let tokens = tokenize(input)?;
    Parser::new(tokens, options)
        .parse_query()
        .map_err(|e| e.with_query(input.trim()))
}

/// Parses a bare value set (`|(beatles, /^stones/)`, `"AC/DC"`, `!/live/`) and applies
/// it to `fields`.
pub fn parse_values(
    input: &str,
    fields: &[String],
    options: &ParseOptions<'_>,
) -> Result<Matcher, QueryError> {
    let tokens = tokenize(input)?;
    Parser::new(tokens, options)
        .parse_value_query(fields)
        .map_err(|e| e.with_query(input.trim()))
}
