//! Indexed token stream with forward and backward search.

use crate::token::{Token, TokenKind};
use std::ops::Deref;

/// An ordered sequence of tokens for one source file.
///
/// Bracket and doc-comment pairs are resolved once at construction, so
/// `matching` is a table lookup. All searches are bounded linear scans.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pairs: Vec<Option<usize>>,
}

impl TokenStream {
    /// Creates a stream and resolves bracket pairs.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let pairs = compute_pairs(&tokens);
        Self { tokens, pairs }
    }

    /// Returns the token at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Finds the first token at or after `from` whose kind is in `kinds`.
    #[must_use]
    pub fn find_next(&self, kinds: &[TokenKind], from: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, t)| kinds.contains(&t.kind))
            .map(|(i, _)| i)
    }

    /// Like [`find_next`](Self::find_next), but stops before `end`.
    #[must_use]
    pub fn find_next_before(&self, kinds: &[TokenKind], from: usize, end: usize) -> Option<usize> {
        self.find_next(kinds, from).filter(|&i| i < end)
    }

    /// Finds the first token at or after `from` whose kind is NOT in `kinds`.
    #[must_use]
    pub fn find_next_excluding(&self, kinds: &[TokenKind], from: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, t)| !kinds.contains(&t.kind))
            .map(|(i, _)| i)
    }

    /// Finds the last token at or before `from` whose kind is in `kinds`.
    #[must_use]
    pub fn find_previous(&self, kinds: &[TokenKind], from: usize) -> Option<usize> {
        let end = from.saturating_add(1).min(self.tokens.len());
        self.tokens[..end]
            .iter()
            .rposition(|t| kinds.contains(&t.kind))
    }

    /// Finds the last token at or before `from` whose kind is NOT in `kinds`.
    #[must_use]
    pub fn find_previous_excluding(&self, kinds: &[TokenKind], from: usize) -> Option<usize> {
        let end = from.saturating_add(1).min(self.tokens.len());
        self.tokens[..end]
            .iter()
            .rposition(|t| !kinds.contains(&t.kind))
    }

    /// Next token after `index` that is not whitespace or a comment.
    #[must_use]
    pub fn next_significant(&self, index: usize) -> Option<usize> {
        self.find_next_excluding(TokenKind::EMPTY, index + 1)
    }

    /// Previous token before `index` that is not whitespace or a comment.
    #[must_use]
    pub fn previous_significant(&self, index: usize) -> Option<usize> {
        self.find_previous_excluding(TokenKind::EMPTY, index.checked_sub(1)?)
    }

    /// Returns the paired bracket or doc-comment delimiter.
    #[must_use]
    pub fn matching(&self, index: usize) -> Option<usize> {
        self.pairs.get(index).copied().flatten()
    }

    /// Returns the `@tag` tokens inside the doc comment opened at `opener`.
    #[must_use]
    pub fn doc_comment_tags(&self, opener: usize) -> Vec<usize> {
        let Some(closer) = self.matching(opener) else {
            return Vec::new();
        };
        (opener..closer)
            .filter(|&i| self.tokens[i].kind == TokenKind::DocCommentTag)
            .collect()
    }

    /// Returns the name declared by a `function`, `class`, `interface` or
    /// `trait` keyword, or `None` for closures and anonymous classes.
    #[must_use]
    pub fn declaration_name(&self, index: usize) -> Option<&str> {
        let mut next = self.next_significant(index)?;
        if self.tokens[next].content == "&" {
            next = self.next_significant(next)?;
        }
        let token = &self.tokens[next];
        (token.kind == TokenKind::String).then_some(token.content.as_str())
    }

    /// Returns true if the `function` keyword at `index` starts a closure.
    #[must_use]
    pub fn is_closure(&self, index: usize) -> bool {
        self.tokens[index].kind == TokenKind::Function && self.declaration_name(index).is_none()
    }

    /// Returns true if the `class` keyword at `index` is `new class`.
    #[must_use]
    pub fn is_anonymous_class(&self, index: usize) -> bool {
        self.tokens[index].kind == TokenKind::Class
            && self
                .previous_significant(index)
                .is_some_and(|p| self.tokens[p].kind == TokenKind::New)
    }

    /// Returns true if the `class`, `interface` or `trait` keyword at
    /// `index` declares a named type (and is not `Foo::class`).
    #[must_use]
    pub fn is_type_declaration(&self, index: usize) -> bool {
        matches!(
            self.tokens[index].kind,
            TokenKind::Class | TokenKind::Interface | TokenKind::Trait
        ) && !self.previous_significant(index).is_some_and(|p| {
            matches!(self.tokens[p].kind, TokenKind::DoubleColon | TokenKind::New)
        }) && self.declaration_name(index).is_some()
    }

    /// Returns the `{` that opens the body of the declaration at `index`.
    ///
    /// For functions the search skips the parameter list and stops at `;`,
    /// so abstract and interface methods have no body.
    #[must_use]
    pub fn scope_opener(&self, index: usize) -> Option<usize> {
        let mut from = index + 1;
        if matches!(self.tokens[index].kind, TokenKind::Function | TokenKind::Fn) {
            let open = self.find_next(&[TokenKind::OpenParenthesis], from)?;
            from = self.matching(open)? + 1;
        }
        let found = self.find_next(&[TokenKind::OpenCurlyBracket, TokenKind::Semicolon], from)?;
        (self.tokens[found].kind == TokenKind::OpenCurlyBracket).then_some(found)
    }

    /// Returns the `}` that closes the body of the declaration at `index`.
    #[must_use]
    pub fn scope_closer(&self, index: usize) -> Option<usize> {
        self.matching(self.scope_opener(index)?)
    }

    /// Concatenates token contents from `start` to `end` inclusive.
    #[must_use]
    pub fn content_between(&self, start: usize, end: usize) -> String {
        let end = end.min(self.tokens.len().saturating_sub(1));
        if start > end {
            return String::new();
        }
        self.tokens[start..=end]
            .iter()
            .map(|t| t.content.as_str())
            .collect()
    }

    /// Returns the underlying tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl Deref for TokenStream {
    type Target = [Token];

    fn deref(&self) -> &Self::Target {
        &self.tokens
    }
}

/// Pairs brackets and doc-comment delimiters with a stack.
///
/// A closer that does not match the innermost opener is left unpaired,
/// which keeps attribute syntax (`#[...]`) and broken code from shifting
/// every later pair.
fn compute_pairs(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut pairs = vec![None; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let opener = match token.kind {
            TokenKind::OpenParenthesis
            | TokenKind::OpenCurlyBracket
            | TokenKind::OpenSquareBracket
            | TokenKind::DocCommentOpenTag => {
                stack.push(i);
                continue;
            }
            TokenKind::CloseParenthesis => TokenKind::OpenParenthesis,
            TokenKind::CloseCurlyBracket => TokenKind::OpenCurlyBracket,
            TokenKind::CloseSquareBracket => TokenKind::OpenSquareBracket,
            TokenKind::DocCommentCloseTag => TokenKind::DocCommentOpenTag,
            _ => continue,
        };

        if let Some(&top) = stack.last() {
            if tokens[top].kind == opener {
                stack.pop();
                pairs[top] = Some(i);
                pairs[i] = Some(top);
            }
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn stream(source: &str) -> TokenStream {
        tokenize(source).unwrap()
    }

    fn position(stream: &TokenStream, kind: TokenKind) -> usize {
        stream.iter().position(|t| t.kind == kind).unwrap()
    }

    #[test]
    fn find_next_includes_start() {
        let s = stream("<?php declare(strict_types=1);");
        let declare = position(&s, TokenKind::Declare);
        assert_eq!(s.find_next(&[TokenKind::Declare], declare), Some(declare));
        assert_eq!(s.find_next(&[TokenKind::Declare], declare + 1), None);
    }

    #[test]
    fn find_previous_searches_backward() {
        let s = stream("<?php $a = 1; $b = 2;");
        let last = s.len() - 1;
        let var = s.find_previous(&[TokenKind::Variable], last).unwrap();
        assert_eq!(s[var].content, "$b");
        assert_eq!(s.find_previous(&[TokenKind::Class], last), None);
        assert_eq!(s.find_previous(&[TokenKind::OpenTag], usize::MAX), Some(0));
    }

    #[test]
    fn significant_neighbours_skip_whitespace_and_comments() {
        let s = stream("<?php $a /* x */ === // y\n 1;");
        let op = position(&s, TokenKind::IsIdentical);
        assert_eq!(s[s.previous_significant(op).unwrap()].content, "$a");
        assert_eq!(s[s.next_significant(op).unwrap()].content, "1");
    }

    #[test]
    fn brackets_are_paired() {
        let s = stream("<?php f([1, (2)], {3});");
        for (i, token) in s.iter().enumerate() {
            if matches!(
                token.kind,
                TokenKind::OpenParenthesis | TokenKind::OpenSquareBracket
            ) {
                let close = s.matching(i).unwrap();
                assert_eq!(s.matching(close), Some(i));
                assert!(close > i);
            }
        }
    }

    #[test]
    fn unbalanced_closer_is_ignored() {
        let s = stream("<?php #[Attr] function f() { }");
        let open = position(&s, TokenKind::OpenCurlyBracket);
        let close = position(&s, TokenKind::CloseCurlyBracket);
        assert_eq!(s.matching(open), Some(close));
        let square = position(&s, TokenKind::CloseSquareBracket);
        assert_eq!(s.matching(square), None);
    }

    #[test]
    fn doc_comment_pairs_and_tags() {
        let s = stream("<?php\n/**\n * @param int $a\n * @return int\n */\nfunction f($a) {}");
        let open = position(&s, TokenKind::DocCommentOpenTag);
        let close = position(&s, TokenKind::DocCommentCloseTag);
        assert_eq!(s.matching(open), Some(close));
        let tags: Vec<&str> = s
            .doc_comment_tags(open)
            .into_iter()
            .map(|i| s[i].content.as_str())
            .collect();
        assert_eq!(tags, vec!["@param", "@return"]);
    }

    #[test]
    fn declaration_names() {
        let s = stream("<?php class Foo { function &bar() {} } $f = function () {};");
        let class = position(&s, TokenKind::Class);
        assert_eq!(s.declaration_name(class), Some("Foo"));
        assert!(s.is_type_declaration(class));

        let functions: Vec<usize> = s
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == TokenKind::Function)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(s.declaration_name(functions[0]), Some("bar"));
        assert!(!s.is_closure(functions[0]));
        assert!(s.is_closure(functions[1]));
    }

    #[test]
    fn class_constant_is_not_a_declaration() {
        let s = stream("<?php $x = Foo::class; $y = new class {};");
        let classes: Vec<usize> = s
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == TokenKind::Class)
            .map(|(i, _)| i)
            .collect();
        assert!(!s.is_type_declaration(classes[0]));
        assert!(!s.is_type_declaration(classes[1]));
        assert!(s.is_anonymous_class(classes[1]));
    }

    #[test]
    fn scope_closer_of_function_body() {
        let s = stream("<?php function f(array $a = []): int { if ($a) { return 1; } return 0; }");
        let function = position(&s, TokenKind::Function);
        let closer = s.scope_closer(function).unwrap();
        assert_eq!(closer, s.len() - 1);
    }

    #[test]
    fn abstract_method_has_no_scope() {
        let s = stream("<?php abstract class A { abstract function f(): int; public $x = [1]; }");
        let function = position(&s, TokenKind::Function);
        assert_eq!(s.scope_closer(function), None);
    }

    #[test]
    fn content_between_joins_tokens() {
        let s = stream("<?php namespace App\\Models;");
        let ns = position(&s, TokenKind::Namespace);
        let semi = position(&s, TokenKind::Semicolon);
        assert_eq!(s.content_between(ns + 2, semi - 1), "App\\Models");
    }
}
