//! Sniff for the operand order of comparisons.
//!
//! With the default `require` style, literals go on the left:
//!
//! ```php
//! if (null === $user) {}    // ok
//! if ($user === null) {}    // NotYoda
//! ```
//!
//! The `disallow` style inverts the check and reports `Found` instead.

use php_standards_core::{FileContext, Severity, Sniff, TokenKind, TokenStream, Violation};
use std::fmt;
use std::str::FromStr;

/// Sniff code for yoda-condition.
pub const CODE: &str = "PS005";

/// Sniff name for yoda-condition.
pub const NAME: &str = "yoda-condition";

/// Operators that bind an adjacent literal into a larger operand.
const BINDING_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "**", ".", "<<", ">>", "&", "|", "^", "??",
];

/// Which operand order is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YodaStyle {
    /// Literals must be on the left.
    #[default]
    Require,
    /// Literals must be on the right.
    Disallow,
}

impl FromStr for YodaStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "require" => Ok(Self::Require),
            "disallow" => Ok(Self::Disallow),
            other => Err(format!("unknown yoda style `{other}`, expected require or disallow")),
        }
    }
}

impl fmt::Display for YodaStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Require => f.write_str("require"),
            Self::Disallow => f.write_str("disallow"),
        }
    }
}

/// Enforces the operand order of comparisons against literals.
#[derive(Debug, Clone)]
pub struct YodaCondition {
    /// Severity level.
    pub severity: Severity,
    /// Enforced style.
    pub style: YodaStyle,
}

impl Default for YodaCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl YodaCondition {
    /// Creates a new sniff with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            style: YodaStyle::default(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the enforced style.
    #[must_use]
    pub fn style(mut self, style: YodaStyle) -> Self {
        self.style = style;
        self
    }
}

fn is_literal(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::LNumber
            | TokenKind::DNumber
            | TokenKind::ConstantEncapsedString
    )
}

fn is_binding_operator(stream: &TokenStream, index: usize) -> bool {
    let token = &stream[index];
    match token.kind {
        TokenKind::DoubleColon | TokenKind::ObjectOperator => true,
        TokenKind::Operator => BINDING_OPERATORS.contains(&token.content.as_str()),
        _ => false,
    }
}

fn is_sign(stream: &TokenStream, index: usize) -> bool {
    stream[index].kind == TokenKind::Operator && matches!(stream[index].content.as_str(), "-" | "+")
}

/// Returns true if the operand ending right before the operator at `op`
/// is a lone literal.
fn left_is_literal(stream: &TokenStream, op: usize) -> bool {
    let Some(literal) = stream.previous_significant(op) else {
        return false;
    };
    if !is_literal(stream[literal].kind) {
        return false;
    }
    let Some(mut before) = stream.previous_significant(literal) else {
        return true;
    };
    if is_sign(stream, before) && matches!(stream[literal].kind, TokenKind::LNumber | TokenKind::DNumber) {
        // A unary sign stays part of the literal.
        match stream.previous_significant(before) {
            Some(p) if !ends_operand(stream[p].kind) => before = p,
            Some(_) => return false,
            None => return true,
        }
    }
    !is_binding_operator(stream, before)
}

/// Returns true if the operand starting right after the operator at `op`
/// is a lone literal.
fn right_is_literal(stream: &TokenStream, op: usize) -> bool {
    let Some(mut literal) = stream.next_significant(op) else {
        return false;
    };
    if is_sign(stream, literal) {
        match stream.next_significant(literal) {
            Some(n) if matches!(stream[n].kind, TokenKind::LNumber | TokenKind::DNumber) => literal = n,
            _ => return false,
        }
    }
    if !is_literal(stream[literal].kind) {
        return false;
    }
    stream.next_significant(literal).map_or(true, |after| {
        !is_binding_operator(stream, after) && stream[after].kind != TokenKind::OpenSquareBracket
    })
}

/// Token kinds that can end a value, making a following sign binary.
fn ends_operand(kind: TokenKind) -> bool {
    is_literal(kind)
        || matches!(
            kind,
            TokenKind::Variable
                | TokenKind::String
                | TokenKind::CloseParenthesis
                | TokenKind::CloseSquareBracket
                | TokenKind::CloseCurlyBracket
        )
}

impl Sniff for YodaCondition {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces the operand order of comparisons against literals"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn register(&self) -> &'static [TokenKind] {
        TokenKind::COMPARISONS
    }

    fn process(&self, ctx: &FileContext, ptr: usize) -> Vec<Violation> {
        let stream = ctx.stream;
        let left = left_is_literal(stream, ptr);
        let right = right_is_literal(stream, ptr);
        let operator = &stream[ptr].content;

        match self.style {
            YodaStyle::Require if !left && right => vec![ctx.report(
                self,
                ptr,
                "NotYoda",
                format!("Use Yoda condition, place the literal on the left of `{operator}`"),
            )],
            YodaStyle::Disallow if left && !right => vec![ctx.report(
                self,
                ptr,
                "Found",
                format!("Yoda condition found, place the literal on the right of `{operator}`"),
            )],
            _ => Vec::new(),
        }
    }
}
