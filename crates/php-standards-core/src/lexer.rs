//! A small PHP tokenizer.
//!
//! Produces the token stream that sniffs operate on. It recognizes enough of
//! PHP to give every token the right kind, line and column; it does not
//! validate syntax.

use crate::stream::TokenStream;
use crate::token::{Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Quoted string without its closing quote.
    UnterminatedString,
    /// `/*` or `/**` without `*/`.
    UnterminatedComment,
    /// Heredoc or nowdoc whose closing marker never appears.
    UnterminatedHeredoc,
}

impl std::fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::UnterminatedComment => write!(f, "unterminated comment"),
            Self::UnterminatedHeredoc => write!(f, "unterminated heredoc"),
        }
    }
}

/// Error produced during tokenization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Line where the offending token starts.
    pub line: usize,
    /// Column where the offending token starts.
    pub column: usize,
}

/// Tokenizes PHP source into a [`TokenStream`].
///
/// # Errors
///
/// Returns `LexError` for unterminated strings, comments and heredocs.
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    Lexer::new(source).tokenize().map(TokenStream::new)
}

/// Operators longer than one character, longest first.
const OPERATORS: &[&str] = &[
    "===", "!==", "<=>", "**=", "...", "<<=", ">>=", "??=", "?->", "==", "!=", "<>", "<=", ">=",
    "&&", "||", "++", "--", "+=", "-=", "*=", "/=", ".=", "%=", "&=", "|=", "^=", "->", "=>", "::",
    "<<", ">>", "??", "**",
];

struct Lexer<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        let mut chars: Vec<(usize, char)> = source.char_indices().collect();
        if chars.first().map(|&(_, c)| c) == Some('\u{feff}') {
            chars.remove(0);
        }
        Self {
            source,
            chars,
            pos: 0,
            line: 1,
            col: 1,
            tokens: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while !self.at_end() {
            self.lex_html();
            self.lex_php()?;
        }
        Ok(self.tokens)
    }

    // --- cursor helpers ---

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).map(|&(_, c)| c)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or(self.source.len(), |&(offset, _)| offset)
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, expected)| self.peek_at(i) == Some(expected))
    }

    fn starts_with_ignore_case(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, expected)| {
            self.peek_at(i)
                .is_some_and(|c| c.eq_ignore_ascii_case(&expected))
        })
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    /// Consumes `count` characters and pushes them as one token.
    fn emit(&mut self, kind: TokenKind, count: usize) {
        let (line, column, start) = (self.line, self.col, self.offset());
        for _ in 0..count {
            self.advance();
        }
        let content = &self.source[start..self.offset()];
        self.tokens
            .push(Token::new(kind, content, line, column, start));
    }

    /// Counts characters from the cursor while `pred` holds.
    fn count_while(&self, from: usize, pred: impl Fn(char) -> bool) -> usize {
        let mut n = from;
        while self.peek_at(n).is_some_and(&pred) {
            n += 1;
        }
        n - from
    }

    fn error(kind: LexErrorKind, line: usize, column: usize) -> LexError {
        LexError { kind, line, column }
    }

    /// Last token that is not whitespace or a comment.
    fn last_significant(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .map(|t| t.kind)
            .find(|k| !k.is_empty())
    }

    // --- modes ---

    fn lex_html(&mut self) {
        let mut n = 0;
        while self.pos + n < self.chars.len() {
            let saved = self.pos;
            self.pos += n;
            let open = self.starts_with_ignore_case("<?php") || self.starts_with("<?=");
            self.pos = saved;
            if open {
                break;
            }
            n += 1;
        }
        if n > 0 {
            self.emit(TokenKind::InlineHtml, n);
        }
        if self.at_end() {
            return;
        }

        if self.starts_with("<?=") {
            self.emit(TokenKind::OpenTag, 3);
            return;
        }

        let mut len = 5;
        match self.peek_at(5) {
            Some(' ' | '\t' | '\n') => len += 1,
            Some('\r') if self.peek_at(6) == Some('\n') => len += 2,
            _ => {}
        }
        self.emit(TokenKind::OpenTag, len);
    }

    fn lex_php(&mut self) -> Result<(), LexError> {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' => self.lex_whitespace(),
                '?' if self.peek_at(1) == Some('>') => {
                    let len = if self.peek_at(2) == Some('\n') { 3 } else { 2 };
                    self.emit(TokenKind::CloseTag, len);
                    return Ok(());
                }
                '#' if self.peek_at(1) == Some('[') => self.emit(TokenKind::Operator, 2),
                '#' => self.lex_line_comment(),
                '/' if self.peek_at(1) == Some('/') => self.lex_line_comment(),
                '/' if self.starts_with("/**")
                    && self
                        .peek_at(3)
                        .is_some_and(|c| c.is_whitespace()) =>
                {
                    self.lex_doc_comment()?;
                }
                '/' if self.peek_at(1) == Some('*') => self.lex_block_comment()?,
                '$' if self.peek_at(1).is_some_and(is_ident_start) => {
                    let len = 1 + self.count_while(1, is_ident_char);
                    self.emit(TokenKind::Variable, len);
                }
                c if is_ident_start(c) => self.lex_word(),
                c if c.is_ascii_digit() => self.lex_number(),
                '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
                '\'' | '"' | '`' => self.lex_quoted(c)?,
                '<' if self.starts_with("<<<") && self.heredoc_marker().is_some() => {
                    self.lex_heredoc()?;
                }
                _ => self.lex_operator(),
            }
        }
        Ok(())
    }

    // --- token readers ---

    fn lex_whitespace(&mut self) {
        let mut n = self.count_while(0, |c| matches!(c, ' ' | '\t' | '\r'));
        if self.peek_at(n) == Some('\n') {
            n += 1;
        }
        self.emit(TokenKind::Whitespace, n.max(1));
    }

    fn lex_line_comment(&mut self) {
        let mut n = 0;
        while let Some(c) = self.peek_at(n) {
            if c == '\n' || (c == '?' && self.peek_at(n + 1) == Some('>')) {
                break;
            }
            n += 1;
        }
        if n > 0 && self.peek_at(n - 1) == Some('\r') {
            n -= 1;
        }
        self.emit(TokenKind::Comment, n);
    }

    fn lex_block_comment(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.col);
        let mut n = 2;
        loop {
            match self.peek_at(n) {
                None => return Err(Self::error(LexErrorKind::UnterminatedComment, line, column)),
                Some('*') if self.peek_at(n + 1) == Some('/') => break,
                Some(_) => n += 1,
            }
        }
        self.emit(TokenKind::Comment, n + 2);
        Ok(())
    }

    fn lex_doc_comment(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.col);
        self.emit(TokenKind::DocCommentOpenTag, 3);
        let mut content_on_line = false;

        loop {
            let Some(c) = self.peek() else {
                return Err(Self::error(LexErrorKind::UnterminatedComment, line, column));
            };
            match c {
                '*' if self.peek_at(1) == Some('/') => {
                    self.emit(TokenKind::DocCommentCloseTag, 2);
                    return Ok(());
                }
                '\n' => {
                    self.emit(TokenKind::DocCommentWhitespace, 1);
                    content_on_line = false;
                }
                '\r' if self.peek_at(1) == Some('\n') => {
                    self.emit(TokenKind::DocCommentWhitespace, 2);
                    content_on_line = false;
                }
                ' ' | '\t' | '\r' => {
                    let n = self.count_while(0, |c| matches!(c, ' ' | '\t' | '\r'));
                    self.emit(TokenKind::DocCommentWhitespace, n);
                }
                '*' if !content_on_line => self.emit(TokenKind::DocCommentStar, 1),
                '@' if !content_on_line => {
                    let n = self.doc_text_len(|c| c.is_whitespace());
                    self.emit(TokenKind::DocCommentTag, n);
                    content_on_line = true;
                }
                _ => {
                    let n = self.doc_text_len(|c| c == '\n' || c == '\r');
                    let trimmed = (0..n)
                        .rev()
                        .find(|&i| self.peek_at(i).is_some_and(|c| !matches!(c, ' ' | '\t')))
                        .map_or(n, |i| i + 1);
                    self.emit(TokenKind::DocCommentString, trimmed);
                    content_on_line = true;
                }
            }
        }
    }

    /// Length of doc comment text up to `stop` or the closing `*/`.
    fn doc_text_len(&self, stop: impl Fn(char) -> bool) -> usize {
        let mut n = 0;
        while let Some(c) = self.peek_at(n) {
            if stop(c) || (c == '*' && self.peek_at(n + 1) == Some('/')) {
                break;
            }
            n += 1;
        }
        n.max(1)
    }

    fn lex_word(&mut self) {
        let len = self.count_while(0, is_ident_char);
        let start = self.offset();
        let end = self
            .chars
            .get(self.pos + len)
            .map_or(self.source.len(), |&(offset, _)| offset);
        let word = self.source[start..end].to_ascii_lowercase();

        if word == "yield" {
            let gap = self.count_while(len, char::is_whitespace);
            if gap > 0 {
                let saved = self.pos;
                self.pos += len + gap;
                let from = self.starts_with_ignore_case("from")
                    && !self.peek_at(4).is_some_and(is_ident_char);
                self.pos = saved;
                if from {
                    self.emit(TokenKind::YieldFrom, len + gap + 4);
                    return;
                }
            }
        }

        let member = match self.last_significant() {
            Some(TokenKind::Function | TokenKind::ObjectOperator | TokenKind::NsSeparator) => true,
            Some(TokenKind::DoubleColon) => word != "class",
            _ => false,
        };
        let kind = if member {
            TokenKind::String
        } else {
            TokenKind::keyword(&word).unwrap_or(TokenKind::String)
        };
        self.emit(kind, len);
    }

    fn lex_number(&mut self) {
        let is_digit_or_sep = |c: char| c.is_ascii_digit() || c == '_';

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X' | 'b' | 'B')) {
            let len = 2 + self.count_while(2, |c| c.is_ascii_hexdigit() || c == '_');
            self.emit(TokenKind::LNumber, len);
            return;
        }

        let mut len = self.count_while(0, is_digit_or_sep);
        let mut float = false;
        if self.peek_at(len) == Some('.') && self.peek_at(len + 1).is_some_and(|c| c.is_ascii_digit())
        {
            float = true;
            len += 1 + self.count_while(len + 1, is_digit_or_sep);
        }
        if matches!(self.peek_at(len), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.peek_at(len + 1), Some('+' | '-')));
            if self
                .peek_at(len + 1 + sign)
                .is_some_and(|c| c.is_ascii_digit())
            {
                float = true;
                len += 1 + sign + self.count_while(len + 1 + sign, is_digit_or_sep);
            }
        }
        let kind = if float {
            TokenKind::DNumber
        } else {
            TokenKind::LNumber
        };
        self.emit(kind, len);
    }

    fn lex_quoted(&mut self, quote: char) -> Result<(), LexError> {
        let (line, column) = (self.line, self.col);
        let mut n = 1;
        loop {
            match self.peek_at(n) {
                None => return Err(Self::error(LexErrorKind::UnterminatedString, line, column)),
                Some('\\') => n += 2,
                Some(c) if c == quote => break,
                Some(_) => n += 1,
            }
        }
        self.emit(TokenKind::ConstantEncapsedString, n + 1);
        Ok(())
    }

    /// Reads the marker after `<<<`, returning it and the header length
    /// up to and including the newline.
    fn heredoc_marker(&self) -> Option<(String, usize)> {
        let mut n = 3 + self.count_while(3, |c| c == ' ' || c == '\t');
        let quote = match self.peek_at(n) {
            Some(q @ ('\'' | '"')) => {
                n += 1;
                Some(q)
            }
            _ => None,
        };
        if !self.peek_at(n).is_some_and(is_ident_start) {
            return None;
        }
        let len = self.count_while(n, is_ident_char);
        let marker: String = (n..n + len).filter_map(|i| self.peek_at(i)).collect();
        n += len;
        if let Some(q) = quote {
            if self.peek_at(n) != Some(q) {
                return None;
            }
            n += 1;
        }
        match self.peek_at(n) {
            Some('\n') => Some((marker, n + 1)),
            Some('\r') if self.peek_at(n + 1) == Some('\n') => Some((marker, n + 2)),
            _ => None,
        }
    }

    fn lex_heredoc(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.col);
        let Some((marker, header)) = self.heredoc_marker() else {
            self.lex_operator();
            return Ok(());
        };

        let mut n = header;
        loop {
            if self.peek_at(n).is_none() {
                return Err(Self::error(LexErrorKind::UnterminatedHeredoc, line, column));
            }
            // Closing marker may be indented (PHP 7.3+).
            let indent = self.count_while(n, |c| c == ' ' || c == '\t');
            let at_marker = marker
                .chars()
                .enumerate()
                .all(|(i, m)| self.peek_at(n + indent + i) == Some(m));
            let after = self.peek_at(n + indent + marker.chars().count());
            if at_marker && !after.is_some_and(is_ident_char) {
                n += indent + marker.chars().count();
                break;
            }
            while let Some(c) = self.peek_at(n) {
                n += 1;
                if c == '\n' {
                    break;
                }
            }
        }
        self.emit(TokenKind::Heredoc, n);
        Ok(())
    }

    fn lex_operator(&mut self) {
        for op in OPERATORS {
            if self.starts_with(op) {
                let kind = match *op {
                    "===" => TokenKind::IsIdentical,
                    "!==" => TokenKind::IsNotIdentical,
                    "==" => TokenKind::IsEqual,
                    "!=" | "<>" => TokenKind::IsNotEqual,
                    "<=" => TokenKind::IsSmallerOrEqual,
                    ">=" => TokenKind::IsGreaterOrEqual,
                    "->" | "?->" => TokenKind::ObjectOperator,
                    "=>" => TokenKind::DoubleArrow,
                    "::" => TokenKind::DoubleColon,
                    _ => TokenKind::Operator,
                };
                self.emit(kind, op.chars().count());
                return;
            }
        }

        let kind = match self.peek() {
            Some('(') => TokenKind::OpenParenthesis,
            Some(')') => TokenKind::CloseParenthesis,
            Some('{') => TokenKind::OpenCurlyBracket,
            Some('}') => TokenKind::CloseCurlyBracket,
            Some('[') => TokenKind::OpenSquareBracket,
            Some(']') => TokenKind::CloseSquareBracket,
            Some(';') => TokenKind::Semicolon,
            Some(',') => TokenKind::Comma,
            Some('=') => TokenKind::Equal,
            Some('<') => TokenKind::LessThan,
            Some('>') => TokenKind::GreaterThan,
            Some('\\') => TokenKind::NsSeparator,
            _ => TokenKind::Operator,
        };
        self.emit(kind, 1);
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .iter()
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Whitespace)
            .collect()
    }

    #[test]
    fn open_tag_takes_trailing_newline() {
        let stream = tokenize("<?php\ndeclare(strict_types=1);\n").unwrap();
        let open = &stream[0];
        assert_eq!(open.kind, TokenKind::OpenTag);
        assert_eq!(open.content, "<?php\n");

        let declare = &stream[1];
        assert_eq!(declare.kind, TokenKind::Declare);
        assert_eq!((declare.line, declare.column), (2, 1));
    }

    #[test]
    fn declare_statement_tokens_are_adjacent() {
        let stream = tokenize("<?php\ndeclare(strict_types=1);\n").unwrap();
        let columns: Vec<(TokenKind, usize, usize)> = stream
            .iter()
            .skip(1)
            .take(7)
            .map(|t| (t.kind, t.column, t.length))
            .collect();
        assert_eq!(
            columns,
            vec![
                (TokenKind::Declare, 1, 7),
                (TokenKind::OpenParenthesis, 8, 1),
                (TokenKind::String, 9, 12),
                (TokenKind::Equal, 21, 1),
                (TokenKind::LNumber, 22, 1),
                (TokenKind::CloseParenthesis, 23, 1),
                (TokenKind::Semicolon, 24, 1),
            ]
        );
    }

    #[test]
    fn inline_html_before_open_tag() {
        let stream = tokenize("<html>\n<?php echo 1; ?>\n</html>").unwrap();
        assert_eq!(stream[0].kind, TokenKind::InlineHtml);
        assert_eq!(stream[1].kind, TokenKind::OpenTag);
        assert_eq!(stream[1].content, "<?php ");
        assert_eq!(stream.last().map(|t| t.kind), Some(TokenKind::InlineHtml));
    }

    #[test]
    fn whitespace_splits_after_newline() {
        let stream = tokenize("<?php\n\n  $a;").unwrap();
        assert_eq!(stream[1].content, "\n");
        assert_eq!(stream[2].content, "  ");
        assert_eq!(stream[3].kind, TokenKind::Variable);
        assert_eq!((stream[3].line, stream[3].column), (3, 3));
    }

    #[test]
    fn doc_comment_is_split_into_parts() {
        let source = "<?php\n/**\n * Summary.\n *\n * @return void\n */\n";
        let stream = tokenize(source).unwrap();
        let doc: Vec<(TokenKind, &str)> = stream
            .iter()
            .filter(|t| t.kind.is_doc_comment() && t.kind != TokenKind::DocCommentWhitespace)
            .map(|t| (t.kind, t.content.as_str()))
            .collect();
        assert_eq!(
            doc,
            vec![
                (TokenKind::DocCommentOpenTag, "/**"),
                (TokenKind::DocCommentStar, "*"),
                (TokenKind::DocCommentString, "Summary."),
                (TokenKind::DocCommentStar, "*"),
                (TokenKind::DocCommentStar, "*"),
                (TokenKind::DocCommentTag, "@return"),
                (TokenKind::DocCommentString, "void"),
                (TokenKind::DocCommentCloseTag, "*/"),
            ]
        );
    }

    #[test]
    fn return_tag_type_is_two_tokens_after_tag() {
        let stream = tokenize("<?php\n/**\n * @return string The name\n */\n").unwrap();
        let tag = stream
            .iter()
            .position(|t| t.kind == TokenKind::DocCommentTag)
            .unwrap();
        assert_eq!(stream[tag + 1].kind, TokenKind::DocCommentWhitespace);
        assert_eq!(stream[tag + 2].kind, TokenKind::DocCommentString);
        assert_eq!(stream[tag + 2].content, "string The name");
    }

    #[test]
    fn inline_inheritdoc_is_a_string() {
        let stream = tokenize("<?php\n/**\n * {@inheritdoc}\n */\n").unwrap();
        assert!(stream
            .iter()
            .any(|t| t.kind == TokenKind::DocCommentString && t.content == "{@inheritdoc}"));
        assert!(!stream.iter().any(|t| t.kind == TokenKind::DocCommentTag));
    }

    #[test]
    fn block_comment_is_not_a_doc_comment() {
        assert_eq!(
            kinds("<?php /* plain */ $a;"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Comment,
                TokenKind::Variable,
                TokenKind::Semicolon
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            kinds("<?php DECLARE Function"),
            vec![TokenKind::OpenTag, TokenKind::Declare, TokenKind::Function]
        );
    }

    #[test]
    fn member_names_are_identifiers() {
        assert_eq!(
            kinds("<?php $a->list; function new() {} Foo::class; Foo::new();"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Variable,
                TokenKind::ObjectOperator,
                TokenKind::String,
                TokenKind::Semicolon,
                TokenKind::Function,
                TokenKind::String,
                TokenKind::OpenParenthesis,
                TokenKind::CloseParenthesis,
                TokenKind::OpenCurlyBracket,
                TokenKind::CloseCurlyBracket,
                TokenKind::String,
                TokenKind::DoubleColon,
                TokenKind::Class,
                TokenKind::Semicolon,
                TokenKind::String,
                TokenKind::DoubleColon,
                TokenKind::String,
                TokenKind::OpenParenthesis,
                TokenKind::CloseParenthesis,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn comparison_operators() {
        assert_eq!(
            kinds("<?php 1 === $a !== 2 == 3 != 4 <> 5 <= 6 >= 7 < 8 > 9 <=> 0"),
            vec![
                TokenKind::OpenTag,
                TokenKind::LNumber,
                TokenKind::IsIdentical,
                TokenKind::Variable,
                TokenKind::IsNotIdentical,
                TokenKind::LNumber,
                TokenKind::IsEqual,
                TokenKind::LNumber,
                TokenKind::IsNotEqual,
                TokenKind::LNumber,
                TokenKind::IsNotEqual,
                TokenKind::LNumber,
                TokenKind::IsSmallerOrEqual,
                TokenKind::LNumber,
                TokenKind::IsGreaterOrEqual,
                TokenKind::LNumber,
                TokenKind::LessThan,
                TokenKind::LNumber,
                TokenKind::GreaterThan,
                TokenKind::LNumber,
                TokenKind::Operator,
                TokenKind::LNumber,
            ]
        );
    }

    #[test]
    fn numbers() {
        let stream = tokenize("<?php 1_000 0x1F 1.5 2e10 .5").unwrap();
        let numbers: Vec<(TokenKind, &str)> = stream
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::LNumber | TokenKind::DNumber))
            .map(|t| (t.kind, t.content.as_str()))
            .collect();
        assert_eq!(
            numbers,
            vec![
                (TokenKind::LNumber, "1_000"),
                (TokenKind::LNumber, "0x1F"),
                (TokenKind::DNumber, "1.5"),
                (TokenKind::DNumber, "2e10"),
                (TokenKind::DNumber, ".5"),
            ]
        );
    }

    #[test]
    fn strings_with_escapes() {
        let stream = tokenize(r#"<?php 'it\'s' "say \"hi\"";"#).unwrap();
        let strings: Vec<&str> = stream
            .iter()
            .filter(|t| t.kind == TokenKind::ConstantEncapsedString)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(strings, vec![r"'it\'s'", r#""say \"hi\"""#]);
    }

    #[test]
    fn yield_from_is_one_token() {
        assert_eq!(
            kinds("<?php yield from $gen; yield $x;"),
            vec![
                TokenKind::OpenTag,
                TokenKind::YieldFrom,
                TokenKind::Variable,
                TokenKind::Semicolon,
                TokenKind::Yield,
                TokenKind::Variable,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn heredoc_body_is_one_token() {
        let source = "<?php\n$a = <<<EOT\nline one\n  EOT;\n$b;";
        let stream = tokenize(source).unwrap();
        let heredoc = stream
            .iter()
            .find(|t| t.kind == TokenKind::Heredoc)
            .unwrap();
        assert_eq!(heredoc.content, "<<<EOT\nline one\n  EOT");
        let b = stream.iter().rfind(|t| t.kind == TokenKind::Variable).unwrap();
        assert_eq!(b.line, 5);
    }

    #[test]
    fn line_comment_stops_at_close_tag() {
        let stream = tokenize("<?php // note ?>after").unwrap();
        assert_eq!(stream[1].kind, TokenKind::Comment);
        assert_eq!(stream[1].content, "// note ");
        assert_eq!(stream[2].kind, TokenKind::CloseTag);
        assert_eq!(stream[3].kind, TokenKind::InlineHtml);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("<?php\n$a = 'open;").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!((err.line, err.column), (2, 6));
    }

    #[test]
    fn unterminated_doc_comment_is_an_error() {
        let err = tokenize("<?php\n/**\n * never closed\n").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn unterminated_heredoc_is_an_error() {
        // `EOTX` is not the closing marker.
        let err = tokenize("<?php\n$a = <<<EOT\nline one\nEOTX\n").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedHeredoc);
        assert_eq!((err.line, err.column), (2, 6));

        let err = tokenize("<?php\n$a = <<<'EOT'\nline one\n").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedHeredoc);
    }

    #[test]
    fn offsets_are_bytes() {
        let stream = tokenize("<?php\n$é = 1;").unwrap();
        let one = stream.iter().find(|t| t.kind == TokenKind::LNumber).unwrap();
        assert_eq!(one.offset, "<?php\n$é = ".len());
        assert_eq!(one.column, 6);
    }
}
