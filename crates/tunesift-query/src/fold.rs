//! Diacritic folding for regular expressions.
//!
//! Rewrites a pattern so that plain letters also match their accented forms:
//! `mum` becomes `m[uùúûü…]m` and finds "Múm". The rewrite works on the regex
//! engine's own syntax tree, so escapes, groups and bracketed classes are left
//! intact. Only literal characters are touched.

use std::{
    collections::{BTreeSet, HashMap},
    iter,
};

use regex_syntax::ast::{self, Ast, ClassSet, ClassSetItem, parse::Parser};
use unicode_normalization::UnicodeNormalization;

use crate::{
    diacritics::{COLLATION_VARIANTS, COMBINING_BASES},
    error::FoldError,
};

/// Lookup table from plain letters to the characters that should also match them.
///
/// Building the table composes every base letter with its combining marks, so it is
/// meant to be built once and shared (it is cheap to wrap in an `Arc`).
#[derive(Debug, Clone, Default)]
pub struct FoldingTable {
    /// Single characters and their variants, sorted and deduplicated.
    variants: HashMap<char, String>,
    /// Letter sequences and their ligature forms, longest sequence first.
    sequences: Vec<(Vec<char>, String)>,
}

/// A pending replacement of `start..end` in the pattern source.
#[derive(Debug)]
struct Edit {
    /// Byte offset where the replaced span starts.
    start: usize,
    /// Byte offset where the replaced span ends.
    end: usize,
    /// Replacement text.
    text: String,
}

impl FoldingTable {
    /// Builds the table from the bundled diacritic data.
    pub fn new() -> Self {
        let mut variants: HashMap<char, BTreeSet<char>> = HashMap::new();

        for (marks, bases) in COMBINING_BASES {
            for base in bases.chars() {
                let composed: String = iter::once(base).chain(marks.chars()).nfc().collect();
                let mut chars = composed.chars();
                // Sequences without a single precomposed form are useless in a class.
                if let (Some(c), None) = (chars.next(), chars.next())
                    && c != base
                {
                    variants.entry(base).or_default().insert(c);
                }
            }
        }

        let mut sequences = Vec::new();
        for (key, forms) in COLLATION_VARIANTS {
            let key: Vec<char> = key.chars().collect();
            match key.as_slice() {
                [single] => variants.entry(*single).or_default().extend(forms.chars()),
                _ => sequences.push((key, (*forms).to_string())),
            }
        }
        sequences.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            variants: variants
                .into_iter()
                .map(|(base, set)| (base, set.into_iter().collect()))
                .collect(),
            sequences,
        }
    }

    /// Returns the variants of `c`, not including `c` itself.
    pub fn variants(&self, c: char) -> Option<&str> {
        self.variants.get(&c).map(String::as_str)
    }

    /// Rewrites `pattern` so that its literal letters also match their variants.
    ///
    /// Fails with [`FoldError::Syntax`] if the pattern does not parse and with
    /// [`FoldError::Unsupported`] for class set operations (`[a&&b]`, `[a--b]`).
    pub fn augment(&self, pattern: &str) -> Result<String, FoldError> {
        let ast = Parser::new().parse(pattern)?;

        let mut edits = Vec::new();
        self.visit(&ast, pattern, &mut edits)?;
        edits.sort_by(|a, b| b.start.cmp(&a.start));

        let mut out = pattern.to_string();
        for edit in edits {
            out.replace_range(edit.start..edit.end, &edit.text);
        }
        Ok(out)
    }

    /// Collects edits for one node of the pattern tree.
    fn visit(&self, node: &Ast, pattern: &str, edits: &mut Vec<Edit>) -> Result<(), FoldError> {
        match node {
            Ast::Literal(lit) => {
                let lit: &ast::Literal = lit;
                self.rewrite_run(&[lit], pattern, edits);
            }
            Ast::Concat(concat) => {
                let mut run: Vec<&ast::Literal> = Vec::new();
                for item in &concat.asts {
                    if let Ast::Literal(lit) = item {
                        run.push(lit);
                        continue;
                    }
                    self.rewrite_run(&run, pattern, edits);
                    run.clear();
                    self.visit(item, pattern, edits)?;
                }
                self.rewrite_run(&run, pattern, edits);
            }
            Ast::Alternation(alternation) => {
                for item in &alternation.asts {
                    self.visit(item, pattern, edits)?;
                }
            }
            Ast::Group(group) => self.visit(&group.ast, pattern, edits)?,
            Ast::Repetition(repetition) => self.visit(&repetition.ast, pattern, edits)?,
            Ast::ClassBracketed(class) => self.visit_class_set(&class.kind, edits)?,
            _ => {}
        }
        Ok(())
    }

    /// Collects edits inside a bracketed class.
    fn visit_class_set(&self, set: &ClassSet, edits: &mut Vec<Edit>) -> Result<(), FoldError> {
        match set {
            ClassSet::Item(item) => self.visit_class_item(item, edits),
            ClassSet::BinaryOp(_) => Err(FoldError::Unsupported("class set operation")),
        }
    }

    /// Appends variants after literals and ranges of a class.
    fn visit_class_item(&self, item: &ClassSetItem, edits: &mut Vec<Edit>) -> Result<(), FoldError> {
        match item {
            ClassSetItem::Literal(lit) => {
                if let Some(variants) = self.variants(lit.c) {
                    edits.push(Edit::insert(lit.span.end.offset, escape_class(variants)));
                }
            }
            ClassSetItem::Range(range) => {
                let (start, end) = (range.start.c, range.end.c);
                let mut extra: BTreeSet<char> = BTreeSet::new();
                for (base, variants) in &self.variants {
                    if (start..=end).contains(base) {
                        extra.extend(variants.chars());
                    }
                }
                if !extra.is_empty() {
                    let extra: String = extra.into_iter().collect();
                    edits.push(Edit::insert(range.span.end.offset, escape_class(&extra)));
                }
            }
            ClassSetItem::Bracketed(inner) => self.visit_class_set(&inner.kind, edits)?,
            ClassSetItem::Union(union) => {
                for item in &union.items {
                    self.visit_class_item(item, edits)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Rewrites a run of adjacent literals, preferring the longest letter sequence.
    fn rewrite_run(&self, run: &[&ast::Literal], pattern: &str, edits: &mut Vec<Edit>) {
        let mut i = 0;
        while i < run.len() {
            if let Some((len, forms)) = self.sequence_at(run, i) {
                let letters: String = run[i..i + len]
                    .iter()
                    .map(|lit| self.literal_class(lit, pattern))
                    .collect();
                let ligatures = if forms.chars().count() > 1 {
                    format!("[{}]", escape_class(forms))
                } else {
                    escape_class(forms)
                };
                edits.push(Edit {
                    start: run[i].span.start.offset,
                    end: run[i + len - 1].span.end.offset,
                    text: format!("(?:{letters}|{ligatures})"),
                });
                i += len;
                continue;
            }

            let lit = run[i];
            if self.variants.contains_key(&lit.c) {
                edits.push(Edit {
                    start: lit.span.start.offset,
                    end: lit.span.end.offset,
                    text: self.literal_class(lit, pattern),
                });
            }
            i += 1;
        }
    }

    /// The literal as written, widened to a class when it has variants.
    fn literal_class(&self, lit: &ast::Literal, pattern: &str) -> String {
        let written = &pattern[lit.span.start.offset..lit.span.end.offset];
        match self.variants(lit.c) {
            Some(variants) => format!("[{written}{}]", escape_class(variants)),
            None => written.to_string(),
        }
    }

    /// Finds the longest letter sequence starting at `run[i]`.
    fn sequence_at(&self, run: &[&ast::Literal], i: usize) -> Option<(usize, &str)> {
        self.sequences.iter().find_map(|(key, forms)| {
            let rest = run.get(i..i + key.len())?;
            rest.iter()
                .zip(key)
                .all(|(lit, c)| lit.c == *c)
                .then_some((key.len(), forms.as_str()))
        })
    }
}

impl Edit {
    /// An edit that inserts text without replacing anything.
    fn insert(offset: usize, text: String) -> Self {
        Self {
            start: offset,
            end: offset,
            text,
        }
    }
}

/// Escapes characters that are special inside a bracketed class.
fn escape_class(chars: &str) -> String {
    let mut out = String::with_capacity(chars.len());
    for c in chars.chars() {
        if regex_syntax::is_meta_character(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    fn folded(pattern: &str) -> Regex {
        let table = FoldingTable::new();
        Regex::new(&table.augment(pattern).unwrap()).unwrap()
    }

    #[test]
    fn table_composes_combining_marks() {
        let table = FoldingTable::new();
        let u = table.variants('u').unwrap();
        assert!(u.contains('ú'));
        assert!(u.contains('ü'));
        assert!(!u.contains('u'));
    }

    #[test]
    fn table_includes_collation_variants() {
        let table = FoldingTable::new();
        assert!(table.variants('o').unwrap().contains('ø'));
        assert!(table.variants('l').unwrap().contains('ł'));
    }

    #[test]
    fn plain_letters_match_accents() {
        let re = folded("mum");
        assert!(re.is_match("múm"));
        assert!(re.is_match("mum"));
        assert!(!re.is_match("mam"));
    }

    #[test]
    fn letter_sequences_match_ligatures() {
        assert!(folded("ae").is_match("æ"));
        assert!(folded("ae").is_match("ae"));
        assert!(folded("strasse").is_match("straße"));
        assert!(folded("fin").is_match("\u{fb01}n"));
    }

    #[test]
    fn escapes_are_preserved() {
        let re = folded(r"a\.b");
        assert!(re.is_match("á.b"));
        assert!(!re.is_match("áxb"));
    }

    #[test]
    fn pattern_without_letters_is_unchanged() {
        let table = FoldingTable::new();
        assert_eq!(table.augment(r"^\d+$").unwrap(), r"^\d+$");
    }

    #[test]
    fn classes_gain_variants() {
        assert!(folded("[u]").is_match("ü"));
        assert!(folded("^[a-c]$").is_match("á"));
        assert!(!folded("^[^u]$").is_match("ü"));
    }

    #[test]
    fn groups_alternations_and_repetitions() {
        assert!(folded("(?:foo|bar)").is_match("fóo"));
        assert!(folded("(?:foo|bar)").is_match("bär"));
        assert!(folded("^o+$").is_match("öö"));
    }

    #[test]
    fn class_set_operations_are_unsupported() {
        let table = FoldingTable::new();
        assert!(matches!(
            table.augment("[a&&b]"),
            Err(FoldError::Unsupported(_))
        ));
    }

    #[test]
    fn invalid_pattern_is_syntax_error() {
        let table = FoldingTable::new();
        assert!(matches!(table.augment("("), Err(FoldError::Syntax(_))));
    }
}
