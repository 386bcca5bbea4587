//! Sniff for blank lines inside doc comments.
//!
//! Counts the blank lines at five places in every multi-line doc comment
//! and compares each count with its configured value:
//!
//! ```php
//! /**
//!  * Description.          <- lines_before_first_content (0)
//!  *                       <- lines_between_description_and_annotations (1)
//!  * @param int $a
//!  * @param int $b         <- lines_between_same_annotations (0)
//!  *                       <- lines_between_different_annotations (1)
//!  * @return int
//!  */                      <- lines_after_last_content (0)
//! ```

use php_standards_core::{FileContext, Severity, Sniff, TokenKind, TokenStream, Violation};

/// Sniff code for doc-comment-spacing.
pub const CODE: &str = "PS003";

/// Sniff name for doc-comment-spacing.
pub const NAME: &str = "doc-comment-spacing";

/// Enforces blank-line counts inside doc comments.
#[derive(Debug, Clone)]
pub struct DocCommentSpacing {
    /// Severity level.
    pub severity: Severity,
    /// Blank lines between `/**` and the first content.
    pub lines_before_first_content: usize,
    /// Blank lines between the description and the first annotation.
    pub lines_between_description_and_annotations: usize,
    /// Blank lines between annotations with different names.
    pub lines_between_different_annotations: usize,
    /// Blank lines between annotations with the same name.
    pub lines_between_same_annotations: usize,
    /// Blank lines between the last content and `*/`.
    pub lines_after_last_content: usize,
}

impl Default for DocCommentSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl DocCommentSpacing {
    /// Creates a new sniff with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            lines_before_first_content: 0,
            lines_between_description_and_annotations: 1,
            lines_between_different_annotations: 1,
            lines_between_same_annotations: 0,
            lines_after_last_content: 0,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the blank lines expected between description and annotations.
    #[must_use]
    pub fn lines_between_description_and_annotations(mut self, lines: usize) -> Self {
        self.lines_between_description_and_annotations = lines;
        self
    }

    /// Sets the blank lines expected between different annotations.
    #[must_use]
    pub fn lines_between_different_annotations(mut self, lines: usize) -> Self {
        self.lines_between_different_annotations = lines;
        self
    }

    fn expect(
        &self,
        ctx: &FileContext,
        at: usize,
        reason: &str,
        place: &str,
        expected: usize,
        found: usize,
    ) -> Option<Violation> {
        (expected != found).then(|| {
            let plural = if expected == 1 { "" } else { "s" };
            ctx.report(
                self,
                at,
                reason,
                format!("Expected {expected} line{plural} {place}, found {found}"),
            )
        })
    }
}

/// Blank lines strictly between two lines.
fn gap(from_line: usize, to_line: usize) -> usize {
    to_line.saturating_sub(from_line).saturating_sub(1)
}

/// Line of the last content token at or before `index`, not before `floor`.
fn last_content_line(stream: &TokenStream, floor: usize, index: usize) -> Option<usize> {
    stream
        .find_previous(&[TokenKind::DocCommentString, TokenKind::DocCommentTag], index)
        .filter(|&i| i > floor)
        .map(|i| stream[i].line)
}

impl Sniff for DocCommentSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces blank-line counts inside doc comments"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::DocCommentOpenTag]
    }

    fn process(&self, ctx: &FileContext, ptr: usize) -> Vec<Violation> {
        let stream = ctx.stream;
        let Some(closer) = stream.matching(ptr) else {
            return Vec::new();
        };
        if stream[ptr].line == stream[closer].line {
            return Vec::new();
        }
        let Some(first) = stream.find_next_before(
            &[TokenKind::DocCommentString, TokenKind::DocCommentTag],
            ptr,
            closer,
        ) else {
            return Vec::new();
        };

        let mut violations = Vec::new();
        violations.extend(self.expect(
            ctx,
            ptr,
            "IncorrectLinesCountBeforeFirstContent",
            "before first content",
            self.lines_before_first_content,
            gap(stream[ptr].line, stream[first].line),
        ));

        let tags = stream.doc_comment_tags(ptr);
        if let Some(&first_tag) = tags.first() {
            if first < first_tag {
                let description_end =
                    last_content_line(stream, ptr, first_tag - 1).unwrap_or(stream[first].line);
                violations.extend(self.expect(
                    ctx,
                    first_tag,
                    "IncorrectLinesCountBetweenDescriptionAndAnnotations",
                    "between description and annotations",
                    self.lines_between_description_and_annotations,
                    gap(description_end, stream[first_tag].line),
                ));
            }
        }

        for pair in tags.windows(2) {
            let (previous, next) = (pair[0], pair[1]);
            let previous_end = last_content_line(stream, ptr, next - 1).unwrap_or(stream[previous].line);
            let found = gap(previous_end, stream[next].line);
            let violation = if stream[previous].content == stream[next].content {
                self.expect(
                    ctx,
                    next,
                    "IncorrectLinesCountBetweenSameAnnotations",
                    "between same annotations",
                    self.lines_between_same_annotations,
                    found,
                )
            } else {
                self.expect(
                    ctx,
                    next,
                    "IncorrectLinesCountBetweenDifferentAnnotationsTypes",
                    "between different annotations types",
                    self.lines_between_different_annotations,
                    found,
                )
            };
            violations.extend(violation);
        }

        if let Some(last_line) = last_content_line(stream, ptr, closer) {
            violations.extend(self.expect(
                ctx,
                closer,
                "IncorrectLinesCountAfterLastContent",
                "after last content",
                self.lines_after_last_content,
                gap(last_line, stream[closer].line),
            ));
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run_sniff;

    fn check(source: &str) -> Vec<(usize, String)> {
        run_sniff(&DocCommentSpacing::new(), source)
            .into_iter()
            .map(|v| (v.location.line, v.reason.unwrap_or_default()))
            .collect()
    }

    #[test]
    fn test_well_formed_comment() {
        let source = r"<?php
/**
 * Sum values.
 *
 * Longer text
 * over two lines.
 *
 * @param int $a
 * @param int $b
 *
 * @return int
 */
";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_single_line_comment_is_skipped() {
        assert!(check("<?php\n/** @var int $x */\n$x = 1;\n").is_empty());
    }

    #[test]
    fn test_blank_line_before_first_content() {
        let source = "<?php\n/**\n *\n * Text.\n */\n";
        assert_eq!(
            check(source),
            vec![(2, "IncorrectLinesCountBeforeFirstContent".to_string())]
        );
    }

    #[test]
    fn test_description_needs_gap_before_annotations() {
        let source = "<?php\n/**\n * Text.\n * @return void\n */\n";
        let found = run_sniff(&DocCommentSpacing::new(), source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location.line, 4);
        assert_eq!(found[0].message, "Expected 1 line between description and annotations, found 0");
    }

    #[test]
    fn test_same_and_different_annotations() {
        let source = "<?php\n/**\n * @param int $a\n *\n * @param int $b\n * @return int\n */\n";
        assert_eq!(
            check(source),
            vec![
                (5, "IncorrectLinesCountBetweenSameAnnotations".to_string()),
                (6, "IncorrectLinesCountBetweenDifferentAnnotationsTypes".to_string()),
            ]
        );
    }

    #[test]
    fn test_multi_line_annotation_content() {
        let source = "<?php\n/**\n * @param array $a Options\n *   spread over lines.\n *\n * @return void\n */\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_blank_line_after_last_content() {
        let source = "<?php\n/**\n * Text.\n *\n */\n";
        assert_eq!(
            check(source),
            vec![(5, "IncorrectLinesCountAfterLastContent".to_string())]
        );
    }

    #[test]
    fn test_configured_counts() {
        let sniff = DocCommentSpacing::new()
            .lines_between_description_and_annotations(0)
            .lines_between_different_annotations(0);
        let source = "<?php\n/**\n * Text.\n * @param int $a\n * @return int\n */\n";
        assert!(run_sniff(&sniff, source).is_empty());
    }

    #[test]
    fn test_empty_comment_is_skipped() {
        assert!(check("<?php\n/**\n *\n */\n").is_empty());
    }
}
