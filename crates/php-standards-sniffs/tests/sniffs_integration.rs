//! Integration tests: every built-in sniff run through the Analyzer over
//! the PHP fixtures in `tests/fixtures/`.

use php_standards_core::{Analyzer, Config, LintResult, Severity, Sniff};
use php_standards_sniffs::{
    all_sniffs, sniffs_from_config, DocCommentSpacing, ForbiddenArrayTrailingComma,
    FunctionComment, StrictDeclaration, YodaCondition, YodaStyle,
};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run<S: Sniff + 'static>(name: &str, sniff: S) -> LintResult {
    Analyzer::builder()
        .root(fixture(name))
        .sniff(sniff)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed")
}

/// `(file, line, reason)` for every violation, in report order.
fn findings(result: &LintResult) -> Vec<(String, usize, String)> {
    result
        .violations
        .iter()
        .map(|v| {
            (
                v.location.file.display().to_string(),
                v.location.line,
                v.reason.clone().unwrap_or_default(),
            )
        })
        .collect()
}

fn lines(result: &LintResult) -> Vec<usize> {
    result.violations.iter().map(|v| v.location.line).collect()
}

#[test]
fn strict_declaration_over_directory() {
    let result = run("strict", StrictDeclaration::new());

    assert_eq!(result.files_checked, 6);
    assert_eq!(
        findings(&result),
        vec![
            ("BlankLine.php".to_string(), 1, "WrongPosition".to_string()),
            ("Disabled.php".to_string(), 1, "InvalidDeclaration".to_string()),
            ("Indented.php".to_string(), 1, "LeadingSpace".to_string()),
            ("Missing.php".to_string(), 1, "MissingDeclaration".to_string()),
            ("Spaced.php".to_string(), 1, "InvalidDeclaration".to_string()),
        ]
    );
    assert!(result.has_errors());
    assert!(!result
        .violations
        .iter()
        .any(|v| v.location.file == Path::new("Valid.php")));
}

#[test]
fn function_comment_over_directory() {
    let result = run("function_comment", FunctionComment::new());

    assert_eq!(
        findings(&result),
        vec![
            ("Service.php".to_string(), 8, "Missing".to_string()),
            ("Service.php".to_string(), 14, "MissingReturn".to_string()),
            ("Service.php".to_string(), 23, "InvalidReturnVoid".to_string()),
            ("ServiceTest.php".to_string(), 14, "Missing".to_string()),
        ]
    );
}

#[test]
fn doc_comment_spacing_fixture() {
    let result = run("doc_comment_spacing.php", DocCommentSpacing::new());
    assert_eq!(lines(&result), vec![10, 11, 12, 14]);
}

#[test]
fn forbidden_array_trailing_comma_fixture() {
    let result = run(
        "forbidden_array_trailing_comma.php",
        ForbiddenArrayTrailingComma::new(),
    );
    assert_eq!(lines(&result), vec![5]);
}

#[test]
fn yoda_condition_fixture_in_both_styles() {
    let required = run("yoda_condition.php", YodaCondition::new());
    assert_eq!(lines(&required), vec![5, 7, 10, 13, 16, 19, 22, 25, 28]);

    let disallowed = run(
        "yoda_condition.php",
        YodaCondition::new().style(YodaStyle::Disallow),
    );
    assert_eq!(lines(&disallowed), vec![4, 6, 11, 14, 17, 20, 23, 26, 29]);
}

#[test]
fn clean_file_passes_every_sniff() {
    let result = Analyzer::builder()
        .root(fixture("clean"))
        .sniffs(all_sniffs())
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(result.files_checked, 1);
    assert!(
        result.violations.is_empty(),
        "{}",
        result.format_test_report(Severity::Info)
    );
}

#[test]
fn allow_directives_suppress_findings() {
    let result = run("allow", YodaCondition::new());

    assert_eq!(
        findings(&result),
        vec![
            ("allowed.php".to_string(), 7, "AllowWithoutReason".to_string()),
            ("allowed.php".to_string(), 9, "NotYoda".to_string()),
        ]
    );
    assert_eq!(result.violations[0].severity, Severity::Warning);
    assert_eq!(result.violations[1].severity, Severity::Error);
}

#[test]
fn config_drives_sniff_options_and_severity() {
    let config = Config::parse(
        r#"
[rules.yoda-condition]
style = "disallow"
severity = "warning"

[rules.strict-declaration]
enabled = false
"#,
    )
    .expect("config should parse");

    let result = Analyzer::builder()
        .root(fixture("yoda_condition.php"))
        .sniffs(sniffs_from_config(&config))
        .config(config)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(lines(&result), vec![4, 6, 11, 14, 17, 20, 23, 26, 29]);
    assert!(result
        .violations
        .iter()
        .all(|v| v.rule == "yoda-condition" && v.severity == Severity::Warning));
}
