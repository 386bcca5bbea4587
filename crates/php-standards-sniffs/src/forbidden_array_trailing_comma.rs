//! Sniff forbidding a comma after the last array element.
//!
//! Applies to short arrays and `array(...)` alike, single- or multi-line:
//!
//! ```php
//! $bad = [1, 2, 3,];
//! $good = array(
//!     'a' => 1,
//!     'b' => 2
//! );
//! ```

use php_standards_core::{FileContext, Severity, Sniff, TokenKind, TokenStream, Violation};

/// Sniff code for forbidden-array-trailing-comma.
pub const CODE: &str = "PS004";

/// Sniff name for forbidden-array-trailing-comma.
pub const NAME: &str = "forbidden-array-trailing-comma";

/// Forbids trailing commas in array literals.
#[derive(Debug, Clone)]
pub struct ForbiddenArrayTrailingComma {
    /// Severity level.
    pub severity: Severity,
}

impl Default for ForbiddenArrayTrailingComma {
    fn default() -> Self {
        Self::new()
    }
}

impl ForbiddenArrayTrailingComma {
    /// Creates a new sniff with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Returns true if the `[` at `index` indexes into the preceding value.
fn is_index_access(stream: &TokenStream, index: usize) -> bool {
    let Some(previous) = stream.previous_significant(index) else {
        return false;
    };
    matches!(
        stream[previous].kind,
        TokenKind::Variable
            | TokenKind::String
            | TokenKind::ConstantEncapsedString
            | TokenKind::CloseParenthesis
            | TokenKind::CloseSquareBracket
            | TokenKind::CloseCurlyBracket
    )
}

/// Returns the bracket pair of the array literal starting at `ptr`.
fn array_bounds(stream: &TokenStream, ptr: usize) -> Option<(usize, usize)> {
    let opener = match stream[ptr].kind {
        TokenKind::OpenSquareBracket if !is_index_access(stream, ptr) => ptr,
        TokenKind::Array => {
            let next = stream.next_significant(ptr)?;
            (stream[next].kind == TokenKind::OpenParenthesis).then_some(next)?
        }
        _ => return None,
    };
    Some((opener, stream.matching(opener)?))
}

impl Sniff for ForbiddenArrayTrailingComma {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids a comma after the last array element"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::OpenSquareBracket, TokenKind::Array]
    }

    fn process(&self, ctx: &FileContext, ptr: usize) -> Vec<Violation> {
        let stream = ctx.stream;
        let Some((opener, closer)) = array_bounds(stream, ptr) else {
            return Vec::new();
        };
        let Some(last) = stream.previous_significant(closer) else {
            return Vec::new();
        };
        if last <= opener || stream[last].kind != TokenKind::Comma {
            return Vec::new();
        }

        vec![ctx.report(self, last, "Found", "Trailing array comma is forbidden")]
    }
}
