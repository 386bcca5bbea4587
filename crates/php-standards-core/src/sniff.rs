//! The sniff trait.

use crate::context::FileContext;
use crate::token::TokenKind;
use crate::types::{Severity, Violation};

/// A token-driven check.
///
/// A sniff registers the token kinds it listens for. The analyzer walks each
/// file once and calls [`process`](Sniff::process) for every token whose kind
/// was registered, passing the token's index in the stream.
///
/// # Example
///
/// ```ignore
/// use php_standards_core::{FileContext, Sniff, TokenKind, Violation};
///
/// pub struct NoGoto;
///
/// impl Sniff for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///     fn code(&self) -> &'static str { "X001" }
///     fn register(&self) -> &'static [TokenKind] { &[TokenKind::String] }
///
///     fn process(&self, ctx: &FileContext, ptr: usize) -> Vec<Violation> {
///         if ctx.stream[ptr].content.eq_ignore_ascii_case("goto") {
///             return vec![ctx.report(self, ptr, "Found", "goto is not allowed")];
///         }
///         Vec::new()
///     }
/// }
/// ```
pub trait Sniff: Send + Sync {
    /// Returns the kebab-case name of this sniff (e.g., "strict-declaration").
    fn name(&self) -> &'static str;

    /// Returns the sniff code (e.g., "PS001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this sniff checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this sniff.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this sniff requires a reason when using allow directives.
    ///
    /// By default, sniffs with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Token kinds this sniff wants to process.
    fn register(&self) -> &'static [TokenKind];

    /// Processes the token at `ptr` and returns any violations found.
    fn process(&self, ctx: &FileContext, ptr: usize) -> Vec<Violation>;
}

/// Type alias for boxed Sniff trait objects.
pub type SniffBox = Box<dyn Sniff>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::symbols::SymbolTable;
    use std::path::Path;

    struct VariableSniff;

    impl Sniff for VariableSniff {
        fn name(&self) -> &'static str {
            "test-sniff"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "Reports every variable"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn register(&self) -> &'static [TokenKind] {
            &[TokenKind::Variable]
        }

        fn process(&self, ctx: &FileContext, ptr: usize) -> Vec<Violation> {
            vec![ctx.report(self, ptr, "Found", "Variable found")]
        }
    }

    #[test]
    fn test_sniff_trait() {
        let sniff = VariableSniff;
        assert_eq!(sniff.name(), "test-sniff");
        assert_eq!(sniff.code(), "TEST001");
        assert!(!sniff.requires_allow_reason());
        assert_eq!(sniff.register(), &[TokenKind::Variable]);
    }

    #[test]
    fn test_process_reports_at_token() {
        let source = "<?php\n$a = 1;\n";
        let stream = tokenize(source).unwrap();
        let symbols = SymbolTable::new();
        let ctx = FileContext::new(Path::new("a.php"), source, Path::new("."), &stream, &symbols);
        let ptr = stream
            .iter()
            .position(|t| t.kind == TokenKind::Variable)
            .unwrap();

        let violations = VariableSniff.process(&ctx, ptr);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].qualified_code(), "TEST001.Found");
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!((violations[0].location.line, violations[0].location.column), (2, 1));
    }
}
