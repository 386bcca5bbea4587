//! Context types for sniff execution.

use crate::sniff::Sniff;
use crate::stream::TokenStream;
use crate::symbols::SymbolTable;
use crate::types::{Label, Location, Violation};
use std::path::{Path, PathBuf};

/// Context provided to sniffs for one file.
///
/// Contains the token stream and metadata about the file being analyzed,
/// plus the project-wide symbol table.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Tokens of the file.
    pub stream: &'a TokenStream,
    /// Declarations from every analyzed file.
    pub symbols: &'a SymbolTable,
    /// Whether this file is detected as a test file.
    pub is_test: bool,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(
        path: &'a Path,
        content: &'a str,
        root: &Path,
        stream: &'a TokenStream,
        symbols: &'a SymbolTable,
    ) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let is_test = Self::detect_test_file(&relative_path);

        Self {
            path,
            content,
            stream,
            symbols,
            is_test,
            relative_path,
        }
    }

    /// Detects if a file is a test file based on path conventions.
    ///
    /// Only the part of the path below the project root is considered.
    fn detect_test_file(path: &Path) -> bool {
        for component in path.components() {
            if let std::path::Component::Normal(s) = component {
                let s = s.to_string_lossy();
                if s == "tests" || s == "test" || s == "Tests" {
                    return true;
                }
            }
        }

        path.file_stem()
            .and_then(|n| n.to_str())
            .is_some_and(|stem| stem.ends_with("Test"))
    }

    /// Location of the token at `index`.
    #[must_use]
    pub fn location(&self, index: usize) -> Location {
        match self.stream.get(index) {
            Some(token) => Location::at_token(self.relative_path.clone(), token),
            None => Location::new(self.relative_path.clone(), 1, 1),
        }
    }

    /// A secondary label pointing at the token at `index`.
    #[must_use]
    pub fn label(&self, index: usize, message: impl Into<String>) -> Label {
        Label::new(self.location(index), message)
    }

    /// Builds a violation of `sniff` at the token at `index`.
    #[must_use]
    pub fn report<S: Sniff + ?Sized>(
        &self,
        sniff: &S,
        index: usize,
        reason: &str,
        message: impl Into<String>,
    ) -> Violation {
        Violation::new(
            sniff.code(),
            sniff.name(),
            sniff.default_severity(),
            self.location(index),
            message,
        )
        .with_reason(reason)
    }
}
