//! Lexical token types.

use serde::Serialize;

/// Kind of a PHP token.
///
/// Names follow the PHP tokenizer where one exists (`String` is PHP's
/// `T_STRING`, a bare identifier). Punctuation that PHP reports as a plain
/// character gets its own kind when a sniff needs to look for it, and falls
/// back to [`TokenKind::Operator`] otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// `<?php` or `<?=`, including one trailing whitespace character.
    OpenTag,
    /// `?>`.
    CloseTag,
    /// Text outside of PHP tags.
    InlineHtml,
    /// Spaces and tabs, ending after a newline if one is reached.
    Whitespace,
    /// `//`, `#` or `/* */` comment.
    Comment,
    /// `/**` opening a doc comment.
    DocCommentOpenTag,
    /// `*/` closing a doc comment.
    DocCommentCloseTag,
    /// Leading `*` of a doc comment line.
    DocCommentStar,
    /// Whitespace inside a doc comment. Newlines are separate tokens.
    DocCommentWhitespace,
    /// `@name` at the start of a doc comment line.
    DocCommentTag,
    /// Any other text inside a doc comment.
    DocCommentString,
    /// `$name`.
    Variable,
    /// Bare identifier.
    String,
    /// Integer literal.
    LNumber,
    /// Float literal.
    DNumber,
    /// Single-quoted, double-quoted or backtick string.
    ConstantEncapsedString,
    /// Heredoc or nowdoc body, including its markers.
    Heredoc,
    /// `declare`.
    Declare,
    /// `namespace`.
    Namespace,
    /// `use`.
    Use,
    /// `class`.
    Class,
    /// `interface`.
    Interface,
    /// `trait`.
    Trait,
    /// `extends`.
    Extends,
    /// `implements`.
    Implements,
    /// `function`.
    Function,
    /// `fn`.
    Fn,
    /// `abstract`.
    Abstract,
    /// `final`.
    Final,
    /// `static`.
    Static,
    /// `public`.
    Public,
    /// `protected`.
    Protected,
    /// `private`.
    Private,
    /// `readonly`.
    Readonly,
    /// `return`.
    Return,
    /// `yield`.
    Yield,
    /// `yield from`.
    YieldFrom,
    /// `new`.
    New,
    /// `array`.
    Array,
    /// `true`.
    True,
    /// `false`.
    False,
    /// `null`.
    Null,
    /// `(`.
    OpenParenthesis,
    /// `)`.
    CloseParenthesis,
    /// `{`.
    OpenCurlyBracket,
    /// `}`.
    CloseCurlyBracket,
    /// `[`.
    OpenSquareBracket,
    /// `]`.
    CloseSquareBracket,
    /// `;`.
    Semicolon,
    /// `,`.
    Comma,
    /// `=`.
    Equal,
    /// `==`.
    IsEqual,
    /// `!=` or `<>`.
    IsNotEqual,
    /// `===`.
    IsIdentical,
    /// `!==`.
    IsNotIdentical,
    /// `<`.
    LessThan,
    /// `>`.
    GreaterThan,
    /// `<=`.
    IsSmallerOrEqual,
    /// `>=`.
    IsGreaterOrEqual,
    /// `::`.
    DoubleColon,
    /// `->` or `?->`.
    ObjectOperator,
    /// `\`.
    NsSeparator,
    /// `=>`.
    DoubleArrow,
    /// Any other operator or punctuation.
    Operator,
}

impl TokenKind {
    /// Whitespace and comments that carry no code.
    pub const EMPTY: &'static [TokenKind] = &[
        TokenKind::Whitespace,
        TokenKind::Comment,
        TokenKind::DocCommentOpenTag,
        TokenKind::DocCommentCloseTag,
        TokenKind::DocCommentStar,
        TokenKind::DocCommentWhitespace,
        TokenKind::DocCommentTag,
        TokenKind::DocCommentString,
    ];

    /// Modifiers that may appear between a doc comment and `function`.
    pub const METHOD_PREFIXES: &'static [TokenKind] = &[
        TokenKind::Public,
        TokenKind::Protected,
        TokenKind::Private,
        TokenKind::Static,
        TokenKind::Abstract,
        TokenKind::Final,
        TokenKind::Readonly,
    ];

    /// Comparison operators.
    pub const COMPARISONS: &'static [TokenKind] = &[
        TokenKind::IsEqual,
        TokenKind::IsNotEqual,
        TokenKind::IsIdentical,
        TokenKind::IsNotIdentical,
        TokenKind::LessThan,
        TokenKind::GreaterThan,
        TokenKind::IsSmallerOrEqual,
        TokenKind::IsGreaterOrEqual,
    ];

    /// Returns true for tokens that belong to a doc comment.
    #[must_use]
    pub fn is_doc_comment(self) -> bool {
        matches!(
            self,
            Self::DocCommentOpenTag
                | Self::DocCommentCloseTag
                | Self::DocCommentStar
                | Self::DocCommentWhitespace
                | Self::DocCommentTag
                | Self::DocCommentString
        )
    }

    /// Returns true for whitespace and comments.
    #[must_use]
    pub fn is_empty(self) -> bool {
        Self::EMPTY.contains(&self)
    }

    /// Maps a lowercased identifier to its keyword kind.
    #[must_use]
    pub fn keyword(lowercase: &str) -> Option<Self> {
        let kind = match lowercase {
            "declare" => Self::Declare,
            "namespace" => Self::Namespace,
            "use" => Self::Use,
            "class" => Self::Class,
            "interface" => Self::Interface,
            "trait" => Self::Trait,
            "extends" => Self::Extends,
            "implements" => Self::Implements,
            "function" => Self::Function,
            "fn" => Self::Fn,
            "abstract" => Self::Abstract,
            "final" => Self::Final,
            "static" => Self::Static,
            "public" => Self::Public,
            "protected" => Self::Protected,
            "private" => Self::Private,
            "readonly" => Self::Readonly,
            "return" => Self::Return,
            "yield" => Self::Yield,
            "new" => Self::New,
            "array" => Self::Array,
            "true" => Self::True,
            "false" => Self::False,
            "null" => Self::Null,
            _ => return None,
        };
        Some(kind)
    }
}

/// A single lexical token with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Kind of token.
    pub kind: TokenKind,
    /// Source text of the token.
    pub content: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Width in characters. An adjacent token starts at `column + length`.
    pub length: usize,
    /// Byte offset in the source.
    pub offset: usize,
}

impl Token {
    /// Creates a token. The length is the character count of `content`.
    #[must_use]
    pub fn new(
        kind: TokenKind,
        content: impl Into<String>,
        line: usize,
        column: usize,
        offset: usize,
    ) -> Self {
        let content = content.into();
        let length = content.chars().count();
        Self {
            kind,
            content,
            line,
            column,
            length,
            offset,
        }
    }

    /// Column at which an adjacent token would start.
    #[must_use]
    pub fn end_column(&self) -> usize {
        self.column + self.length
    }

    /// Returns true if this token is of the given kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
