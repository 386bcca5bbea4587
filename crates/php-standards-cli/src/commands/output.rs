//! Shared output formatting for lint results.

use anyhow::Result;
use miette::{NamedSource, Report};
use php_standards_core::{LintResult, Severity, ViolationDiagnostic};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analyzed path; violation locations are relative to it.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        println!(
            "{} {} at {}:{}:{}",
            violation.qualified_code(),
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator(violation.severity), violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }
    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

/// Renders each violation with its source snippet.
///
/// Falls back to the plain text rendering when a file cannot be re-read.
fn print_pretty(result: &LintResult, root: &Path) {
    let base = if root.is_file() {
        root.parent().unwrap_or(root)
    } else {
        root
    };
    let mut sources: HashMap<PathBuf, Option<String>> = HashMap::new();

    for violation in &result.violations {
        let file = &violation.location.file;
        let content = sources
            .entry(file.clone())
            .or_insert_with(|| std::fs::read_to_string(base.join(file)).ok());

        match content {
            Some(content) => {
                let report = Report::new(ViolationDiagnostic::from(violation)).with_source_code(
                    NamedSource::new(file.display().to_string(), content.clone()),
                );
                println!("{report:?}");
            }
            None => println!("{}", violation.format()),
        }
    }
    print_summary(result);
}
