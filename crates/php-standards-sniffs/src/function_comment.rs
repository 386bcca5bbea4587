//! Sniff for function doc comments.
//!
//! Every named function needs a `/** */` comment directly above it with a
//! single `@return` tag whose type agrees with the body:
//!
//! ```php
//! /**
//!  * Find a user.
//!  *
//!  * @return \App\User|null
//!  */
//! public function find(int $id)
//! {
//!     return $this->users[$id] ?? null;
//! }
//! ```
//!
//! Test methods of PHPUnit test classes may omit the comment. A comment
//! containing `{@inheritdoc}` must belong to a method that overrides or
//! implements an ancestor method.

use php_standards_core::{FileContext, Severity, Sniff, TokenKind, TokenStream, Violation};
use tracing::debug;

/// Sniff code for function-comment.
pub const CODE: &str = "PS002";

/// Sniff name for function-comment.
pub const NAME: &str = "function-comment";

/// Base classes that mark a PHPUnit test class.
pub const DEFAULT_TEST_CLASSES: &[&str] = &["PHPUnit_Framework_TestCase", "PHPUnit\\Framework\\TestCase"];

/// Checks presence, placement and `@return` consistency of function comments.
#[derive(Debug, Clone)]
pub struct FunctionComment {
    /// Severity level.
    pub severity: Severity,
    /// Fully qualified names of test base classes.
    pub test_classes: Vec<String>,
}

impl Default for FunctionComment {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionComment {
    /// Creates a new sniff with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            test_classes: DEFAULT_TEST_CLASSES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Replaces the test base classes.
    #[must_use]
    pub fn test_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true for a public, non-abstract `test*` method of a test class.
    fn is_test_method(&self, ctx: &FileContext, ptr: usize) -> bool {
        let Some(name) = ctx.stream.declaration_name(ptr) else {
            return false;
        };
        if !name.to_ascii_lowercase().starts_with("test") {
            return false;
        }

        let modifiers = modifiers_before(ctx.stream, ptr);
        let is_public = !modifiers
            .iter()
            .any(|k| matches!(k, TokenKind::Protected | TokenKind::Private));
        if !is_public || modifiers.contains(&TokenKind::Abstract) {
            return false;
        }

        let Some(class) = ctx.symbols.class_at(ctx.stream, ptr) else {
            return false;
        };
        let ancestry = ctx.symbols.ancestors(&class.name);
        if self.test_classes.iter().any(|t| ancestry.contains(t)) {
            return true;
        }
        // The base test class usually lives outside the analyzed tree.
        !ancestry.complete && ctx.is_test
    }

    fn check_returns(
        &self,
        ctx: &FileContext,
        ptr: usize,
        tags: &[usize],
        closer: usize,
        violations: &mut Vec<Violation>,
    ) {
        let stream = ctx.stream;
        let name = stream.declaration_name(ptr).unwrap_or_default();
        let is_special = name == "__construct" || name == "__destruct";

        let mut returns = tags.iter().filter(|&&t| stream[t].content == "@return");
        let return_tag = returns.next().copied();
        if let Some(&duplicate) = returns.next() {
            let mut violation = ctx.report(
                self,
                duplicate,
                "DuplicateReturn",
                "Only 1 @return tag is allowed in a function comment",
            );
            if let Some(first) = return_tag {
                violation = violation.with_label(ctx.label(first, "first @return tag"));
            }
            violations.push(violation);
            return;
        }

        if is_special {
            return;
        }

        let Some(tag) = return_tag else {
            violations.push(ctx.report(
                self,
                closer,
                "MissingReturn",
                "Missing @return tag in function comment",
            ));
            return;
        };

        let content = match stream.get(tag + 2) {
            Some(t) if t.kind == TokenKind::DocCommentString && !t.content.is_empty() => {
                t.content.as_str()
            }
            _ => {
                violations.push(ctx.report(
                    self,
                    tag,
                    "MissingReturnType",
                    "Return type missing for @return tag in function comment",
                ));
                return;
            }
        };

        // Abstract and interface methods have no body to compare against.
        let Some(body_end) = stream.scope_closer(ptr) else {
            return;
        };

        let return_type = parse_return_type(content);
        let returns = return_statements(stream, ptr, body_end);

        if return_type == "void" {
            if let Some(&value) = returns.iter().find(|&&r| returns_value(stream, r)) {
                violations.push(
                    ctx.report(
                        self,
                        tag,
                        "InvalidReturnVoid",
                        "Function return type is void, but function contains return statement",
                    )
                    .with_label(ctx.label(value, "value returned here")),
                );
            }
        } else if return_type != "mixed" && !return_type.split('|').any(|t| t == "void") {
            match returns.first() {
                None => violations.push(ctx.report(
                    self,
                    tag,
                    "InvalidNoReturn",
                    "Function return type is not void, but function has no return statement",
                )),
                Some(&first) if !returns_value(stream, first) => violations.push(
                    ctx.report(
                        self,
                        first,
                        "InvalidReturnNotVoid",
                        "Function return type is not void, but function is returning void here",
                    )
                    .with_label(ctx.label(tag, format!("declared as `{return_type}`"))),
                ),
                Some(_) => {}
            }
        }
    }
}

impl Sniff for FunctionComment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires doc comments on functions with a consistent @return tag"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Function]
    }

    fn process(&self, ctx: &FileContext, ptr: usize) -> Vec<Violation> {
        let stream = ctx.stream;
        if stream.is_closure(ptr) {
            return Vec::new();
        }

        let mut violations = Vec::new();
        let Some(comment_end) = comment_end(stream, ptr) else {
            if !self.is_test_method(ctx, ptr) {
                violations.push(ctx.report(self, ptr, "Missing", "Missing function doc comment"));
            }
            return violations;
        };

        if stream[comment_end].kind == TokenKind::Comment {
            violations.push(ctx.report(
                self,
                ptr,
                "WrongStyle",
                "You must use \"/**\" style comments for a function comment",
            ));
            return violations;
        }

        if stream[comment_end].line + 1 != stream[ptr].line {
            violations.push(ctx.report(
                self,
                comment_end,
                "SpacingAfter",
                "There must be no blank lines after the function comment",
            ));
        }

        let Some(comment_start) = stream.matching(comment_end) else {
            return violations;
        };
        let tags = stream.doc_comment_tags(comment_start);

        for &tag in &tags {
            if stream[tag].content != "@see" {
                continue;
            }
            let described = stream
                .find_next_before(&[TokenKind::DocCommentString], tag, comment_end)
                .is_some_and(|s| stream[s].line == stream[tag].line);
            if !described {
                violations.push(ctx.report(
                    self,
                    tag,
                    "EmptySees",
                    "Content missing for @see tag in function comment",
                ));
            }
        }

        if stream
            .content_between(comment_start, comment_end)
            .contains("@inheritdoc")
        {
            match self.inheritdoc_target(ctx, ptr) {
                Some(true) | None => return violations,
                Some(false) => violations.push(ctx.report(
                    self,
                    comment_start,
                    "InvalidInheritdoc",
                    "No override method found for {@inheritdoc} annotation",
                )),
            }
        }

        self.check_returns(ctx, ptr, &tags, comment_end, &mut violations);
        violations
    }
}

impl FunctionComment {
    /// Whether an ancestor declares the method, or `None` when unknown.
    fn inheritdoc_target(&self, ctx: &FileContext, ptr: usize) -> Option<bool> {
        let method = ctx.stream.declaration_name(ptr)?;
        let Some(class) = ctx.symbols.class_at(ctx.stream, ptr) else {
            debug!("{{@inheritdoc}} on {method} outside a known class");
            return None;
        };
        let found = ctx.symbols.inherits_method(&class.name, method);
        if found.is_none() {
            debug!("Ancestry of {} is incomplete, skipping {{@inheritdoc}} check", class.name);
        }
        found
    }
}

/// Token kinds skipped when looking for the comment above a function.
const COMMENT_SEARCH_SKIP: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Public,
    TokenKind::Protected,
    TokenKind::Private,
    TokenKind::Static,
    TokenKind::Abstract,
    TokenKind::Final,
    TokenKind::Readonly,
];

/// Returns the comment closing above the function at `ptr`.
///
/// A `//` comment that trails other code on its line belongs to that code.
fn comment_end(stream: &TokenStream, ptr: usize) -> Option<usize> {
    let mut end = stream.find_previous_excluding(COMMENT_SEARCH_SKIP, ptr.checked_sub(1)?)?;
    if stream[end].kind == TokenKind::Comment {
        if let Some(prev) = end
            .checked_sub(1)
            .and_then(|p| stream.find_previous_excluding(COMMENT_SEARCH_SKIP, p))
        {
            if stream[prev].line == stream[end].line {
                end = prev;
            }
        }
    }
    matches!(
        stream[end].kind,
        TokenKind::DocCommentCloseTag | TokenKind::Comment
    )
    .then_some(end)
}

/// Modifier keywords written before the function at `ptr`.
fn modifiers_before(stream: &TokenStream, ptr: usize) -> Vec<TokenKind> {
    let mut kinds = Vec::new();
    let mut cursor = ptr;
    while let Some(prev) = stream.previous_significant(cursor) {
        let kind = stream[prev].kind;
        if !TokenKind::METHOD_PREFIXES.contains(&kind) {
            break;
        }
        kinds.push(kind);
        cursor = prev;
    }
    kinds
}

/// Extracts the type from `@return` content, dropping the description.
///
/// The type is a `|`-separated run of names made of letters, digits, `\`,
/// `[` and `]`, where `array(...)` counts as one name.
fn parse_return_type(content: &str) -> &str {
    let bytes = content.as_bytes();
    let mut end = 0;
    loop {
        let mut pos = end;
        if bytes.get(pos) == Some(&b'|') {
            pos += 1;
        }
        let matched = match_array_group(bytes, pos).or_else(|| match_type_name(bytes, pos));
        match matched {
            Some(next) => end = next,
            None => break,
        }
    }
    &content[..end]
}

fn match_array_group(bytes: &[u8], pos: usize) -> Option<usize> {
    let head = bytes.get(pos..pos + 6)?;
    if !head.eq_ignore_ascii_case(b"array(") {
        return None;
    }
    let close = bytes[pos + 6..].iter().position(|&b| b == b')')?;
    Some(pos + 6 + close + 1)
}

fn match_type_name(bytes: &[u8], pos: usize) -> Option<usize> {
    let len = bytes[pos.min(bytes.len())..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'\\' | b'[' | b']'))
        .count();
    (len > 0).then_some(pos + len)
}

/// Indices of `return`, `yield` and `yield from` in the body, skipping
/// closures and anonymous classes.
fn return_statements(stream: &TokenStream, ptr: usize, end: usize) -> Vec<usize> {
    let mut found = Vec::new();
    let mut cursor = ptr + 1;
    while cursor < end {
        let token = &stream[cursor];
        let nested = (token.kind == TokenKind::Function && stream.is_closure(cursor))
            || stream.is_anonymous_class(cursor);
        if nested {
            if let Some(closer) = stream.scope_closer(cursor) {
                cursor = closer + 1;
                continue;
            }
        }
        if matches!(
            token.kind,
            TokenKind::Return | TokenKind::Yield | TokenKind::YieldFrom
        ) {
            found.push(cursor);
        }
        cursor += 1;
    }
    found
}

/// Returns false for a bare `return;`.
fn returns_value(stream: &TokenStream, statement: usize) -> bool {
    stream
        .find_next_excluding(&[TokenKind::Whitespace], statement + 1)
        .map_or(true, |next| stream[next].kind != TokenKind::Semicolon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{run_sniff, run_sniff_on_files};

    fn reasons(source: &str) -> Vec<String> {
        run_sniff(&FunctionComment::new(), source)
            .into_iter()
            .filter_map(|v| v.reason)
            .collect()
    }

    #[test]
    fn test_parse_return_type() {
        assert_eq!(parse_return_type("int"), "int");
        assert_eq!(parse_return_type("string|null The name"), "string|null");
        assert_eq!(parse_return_type("\\App\\User[] Users"), "\\App\\User[]");
        assert_eq!(parse_return_type("array(int => string)|bool x"), "array(int => string)|bool");
        assert_eq!(parse_return_type("array<int, string>"), "array");
        assert_eq!(parse_return_type("?string"), "");
    }

    #[test]
    fn test_documented_function_passes() {
        let source = r"<?php
/**
 * Add numbers.
 *
 * @return int
 */
function add(int $a, int $b): int
{
    return $a + $b;
}
";
        assert!(reasons(source).is_empty());
    }

    #[test]
    fn test_missing_comment() {
        let v = run_sniff(&FunctionComment::new(), "<?php\nfunction a()\n{\n}\n");
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason.as_deref(), Some("Missing"));
        assert_eq!(v[0].location.line, 2);
    }

    #[test]
    fn test_wrong_style() {
        assert_eq!(
            reasons("<?php\n// Adds.\nfunction a()\n{\n}\n"),
            vec!["WrongStyle"]
        );
    }

    #[test]
    fn test_trailing_comment_belongs_to_code() {
        let source = "<?php\nclass A\n{\n    private $x; // cached\n    public function a()\n    {\n    }\n}\n";
        assert_eq!(reasons(source), vec!["Missing"]);
    }

    #[test]
    fn test_modifiers_are_skipped() {
        let source = r"<?php
class A
{
    /**
     * @return void
     */
    final public static function a(): void
    {
    }
}
";
        assert!(reasons(source).is_empty());
    }

    #[test]
    fn test_spacing_after() {
        let source = "<?php\n/**\n * @return void\n */\n\nfunction a()\n{\n}\n";
        let v = run_sniff(&FunctionComment::new(), source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason.as_deref(), Some("SpacingAfter"));
        assert_eq!(v[0].location.line, 4);
    }

    #[test]
    fn test_empty_see() {
        let source = "<?php\n/**\n * @see\n * @see \\App\\Other::run()\n *\n * @return void\n */\nfunction a()\n{\n}\n";
        let v = run_sniff(&FunctionComment::new(), source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason.as_deref(), Some("EmptySees"));
        assert_eq!(v[0].location.line, 3);
    }

    #[test]
    fn test_missing_return() {
        let v = run_sniff(&FunctionComment::new(), "<?php\n/**\n * Does things.\n */\nfunction a()\n{\n}\n");
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason.as_deref(), Some("MissingReturn"));
        assert_eq!(v[0].location.line, 4);
    }

    #[test]
    fn test_constructor_needs_no_return() {
        let source = "<?php\nclass A\n{\n    /**\n     * Build.\n     */\n    public function __construct()\n    {\n    }\n}\n";
        assert!(reasons(source).is_empty());
    }

    #[test]
    fn test_duplicate_return_even_for_constructor() {
        let source = "<?php\nclass A\n{\n    /**\n     * @return void\n     * @return void\n     */\n    public function __construct()\n    {\n    }\n}\n";
        let v = run_sniff(&FunctionComment::new(), source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason.as_deref(), Some("DuplicateReturn"));
        assert_eq!(v[0].location.line, 6);
        assert_eq!(v[0].labels.len(), 1);
        assert_eq!(v[0].labels[0].message, "first @return tag");
        assert_eq!(v[0].labels[0].location.line, 5);
    }

    #[test]
    fn test_missing_return_type() {
        assert_eq!(
            reasons("<?php\n/**\n * @return\n */\nfunction a()\n{\n}\n"),
            vec!["MissingReturnType"]
        );
    }

    #[test]
    fn test_void_with_return_value() {
        let source = "<?php\n/**\n * @return void\n */\nfunction a()\n{\n    if (true) {\n        return;\n    }\n\n    return 1;\n}\n";
        let v = run_sniff(&FunctionComment::new(), source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason.as_deref(), Some("InvalidReturnVoid"));
        assert_eq!(v[0].location.line, 3);
        assert_eq!(v[0].labels[0].location.line, 11);
    }

    #[test]
    fn test_void_ignores_closure_returns() {
        let source = "<?php\n/**\n * @return void\n */\nfunction a()\n{\n    $f = function () {\n        return 1;\n    };\n    $o = new class {\n        public function b() { return 2; }\n    };\n}\n";
        let v = run_sniff(&FunctionComment::new(), source);
        // Only the method inside the anonymous class lacks a comment.
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason.as_deref(), Some("Missing"));
        assert_eq!(v[0].location.line, 11);
    }

    #[test]
    fn test_no_return_statement() {
        let source = "<?php\n/**\n * @return string The name\n */\nfunction a()\n{\n    $x = 1;\n}\n";
        let v = run_sniff(&FunctionComment::new(), source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason.as_deref(), Some("InvalidNoReturn"));
        assert_eq!(v[0].location.line, 3);
    }

    #[test]
    fn test_bare_return_in_non_void_function() {
        let source = "<?php\n/**\n * @return int\n */\nfunction a()\n{\n    return;\n}\n";
        let v = run_sniff(&FunctionComment::new(), source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason.as_deref(), Some("InvalidReturnNotVoid"));
        assert_eq!(v[0].location.line, 7);
        assert_eq!(v[0].labels[0].message, "declared as `int`");
        assert_eq!(v[0].labels[0].location.line, 3);
    }

    #[test]
    fn test_generator_and_mixed_and_nullable_void() {
        let generator = "<?php\n/**\n * @return \\Generator\n */\nfunction a()\n{\n    yield 1;\n}\n";
        assert!(reasons(generator).is_empty());
        let mixed = "<?php\n/**\n * @return mixed\n */\nfunction a()\n{\n}\n";
        assert!(reasons(mixed).is_empty());
        let union = "<?php\n/**\n * @return int|void\n */\nfunction a()\n{\n}\n";
        assert!(reasons(union).is_empty());
    }

    #[test]
    fn test_abstract_method_skips_body_checks() {
        let source = "<?php\ninterface A\n{\n    /**\n     * @return int\n     */\n    public function a(): int;\n}\n";
        assert!(reasons(source).is_empty());
    }

    #[test]
    fn test_inheritdoc_with_known_parent() {
        let files = [
            "<?php\nnamespace App;\n\ninterface Named\n{\n    /**\n     * @return string\n     */\n    public function name(): string;\n}\n",
            "<?php\nnamespace App;\n\nclass User implements Named\n{\n    /**\n     * {@inheritdoc}\n     */\n    public function name(): string\n    {\n        return 'u';\n    }\n\n    /**\n     * {@inheritdoc}\n     */\n    public function other(): string\n    {\n        return 'o';\n    }\n}\n",
        ];
        let v = run_sniff_on_files(&FunctionComment::new(), &files, 1);
        let codes: Vec<_> = v.iter().filter_map(|v| v.reason.as_deref()).collect();
        // `other` overrides nothing, and then also lacks a @return tag.
        assert_eq!(codes, vec!["InvalidInheritdoc", "MissingReturn"]);
        assert_eq!(v[0].location.line, 14);
    }

    #[test]
    fn test_inheritdoc_with_unknown_parent_is_skipped() {
        let source = "<?php\nclass User extends \\Vendor\\Model\n{\n    /**\n     * {@inheritdoc}\n     */\n    public function save()\n    {\n    }\n}\n";
        assert!(reasons(source).is_empty());
    }

    #[test]
    fn test_phpunit_test_methods_need_no_comment() {
        let source = "<?php\nnamespace Tests;\n\nuse PHPUnit\\Framework\\TestCase;\n\nclass UserTest extends TestCase\n{\n    public function testName()\n    {\n    }\n\n    private function testHelper()\n    {\n    }\n\n    public function helper()\n    {\n    }\n}\n";
        let v = run_sniff(&FunctionComment::new(), source);
        let lines: Vec<_> = v.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![12, 16]);
    }

    #[test]
    fn test_custom_test_classes() {
        let source = "<?php\nclass UserSpec extends \\Spec\\Base\n{\n    public function testName()\n    {\n    }\n}\n";
        assert_eq!(reasons(source), vec!["Missing"]);
        let sniff = FunctionComment::new().test_classes(["Spec\\Base"]);
        assert!(run_sniff(&sniff, source).is_empty());
    }

    #[test]
    fn test_closures_are_ignored() {
        assert!(reasons("<?php\n$f = function () {\n    return 1;\n};\n").is_empty());
    }
}
