//! Helpers for running a single sniff over inline sources.

use php_standards_core::{tokenize, FileContext, Sniff, SymbolTable, TokenStream, Violation};
use std::path::Path;

/// Runs `sniff` over one source file named `src/Sample.php`.
pub(crate) fn run_sniff<S: Sniff>(sniff: &S, source: &str) -> Vec<Violation> {
    run_sniff_on_files(sniff, &[source], 0)
}

/// Runs `sniff` over `files[index]`, with symbols collected from all of `files`.
pub(crate) fn run_sniff_on_files<S: Sniff>(
    sniff: &S,
    files: &[&str],
    index: usize,
) -> Vec<Violation> {
    let streams: Vec<TokenStream> = files
        .iter()
        .map(|source| tokenize(source).expect("fixture should tokenize"))
        .collect();
    let symbols = SymbolTable::build(&streams);
    let stream = &streams[index];

    let ctx = FileContext::new(
        Path::new("src/Sample.php"),
        files[index],
        Path::new("."),
        stream,
        &symbols,
    );

    let mut violations: Vec<Violation> = (0..stream.len())
        .filter(|&i| sniff.register().contains(&stream[i].kind))
        .flat_map(|i| sniff.process(&ctx, i))
        .collect();
    violations.sort_by_key(|v| (v.location.line, v.location.column));
    violations
}
