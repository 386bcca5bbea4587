//! Core analyzer for orchestrating sniff execution.
//!
//! Analysis runs in two passes. The first reads and tokenizes every file and
//! builds the [`SymbolTable`]. The second walks each token stream once and
//! dispatches tokens to the sniffs that registered their kind.

use crate::config::Config;
use crate::context::FileContext;
use crate::lexer::tokenize;
use crate::sniff::{Sniff, SniffBox};
use crate::stream::TokenStream;
use crate::symbols::SymbolTable;
use crate::token::TokenKind;
use crate::types::{LintResult, Location, Severity, Suggestion, Violation};
use crate::utils::allowance::check_allow_with_reason;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the directory tree.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Error tokenizing a PHP source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to tokenize.
        path: PathBuf,
        /// Lexer error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    sniffs: Vec<SniffBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory (or single file) to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a sniff to the analyzer.
    #[must_use]
    pub fn sniff<S: Sniff + 'static>(mut self, sniff: S) -> Self {
        self.sniffs.push(Box::new(sniff));
        self
    }

    /// Adds a boxed sniff to the analyzer.
    #[must_use]
    pub fn sniff_box(mut self, sniff: SniffBox) -> Self {
        self.sniffs.push(sniff);
        self
    }

    /// Adds several boxed sniffs.
    #[must_use]
    pub fn sniffs(mut self, sniffs: impl IntoIterator<Item = SniffBox>) -> Self {
        self.sniffs.extend(sniffs);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on tokenizer errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// Sniffs disabled in the configuration are dropped here, and the
    /// dispatch table is built from the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.clone());
        for pattern in &exclude_patterns {
            glob::Pattern::new(pattern)?;
        }

        let sniffs: Vec<SniffBox> = self
            .sniffs
            .into_iter()
            .filter(|s| {
                let enabled = config.is_rule_enabled(s.name());
                if !enabled {
                    debug!("Skipping disabled sniff: {}", s.name());
                }
                enabled
            })
            .collect();

        let mut listeners: HashMap<TokenKind, Vec<usize>> = HashMap::new();
        for (id, sniff) in sniffs.iter().enumerate() {
            for kind in sniff.register() {
                listeners.entry(*kind).or_default().push(id);
            }
        }

        Ok(Analyzer {
            root,
            sniffs,
            listeners,
            exclude_patterns,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// A tokenized file kept between the two passes.
struct SourceFile {
    path: PathBuf,
    content: String,
    stream: TokenStream,
}

/// The main analyzer that orchestrates sniff execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    sniffs: Vec<SniffBox>,
    listeners: HashMap<TokenKind, Vec<usize>>,
    exclude_patterns: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of enabled sniffs.
    #[must_use]
    pub fn sniff_count(&self) -> usize {
        self.sniffs.len()
    }

    /// Analyzes all files under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or if a file
    /// is not UTF-8 or cannot be tokenized and `fail_on_parse_error` is set.
    /// Otherwise non-UTF-8 bytes are replaced and the file is still checked.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let mut sources = Vec::with_capacity(files.len());
        for path in files {
            debug!("Tokenizing: {}", path.display());
            let content = match String::from_utf8(std::fs::read(&path)?) {
                Ok(content) => content,
                Err(e) => {
                    warn!("{} is not valid UTF-8: {}", path.display(), e);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse {
                            path,
                            message: e.to_string(),
                        });
                    }
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            match tokenize(&content) {
                Ok(stream) => sources.push(SourceFile {
                    path,
                    content,
                    stream,
                }),
                Err(e) => {
                    warn!("Failed to tokenize {}: {}", path.display(), e);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse {
                            path,
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        let symbols = SymbolTable::build(sources.iter().map(|s| &s.stream));
        debug!("Symbol table holds {} declarations", symbols.len());

        let base = self.base_dir();
        let mut result = LintResult::new();
        for source in &sources {
            let ctx = FileContext::new(
                &source.path,
                &source.content,
                base,
                &source.stream,
                &symbols,
            );
            result.violations.extend(self.check(&ctx));
            result.files_checked += 1;
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes a single in-memory source.
    ///
    /// The symbol table only contains the declarations of this source.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the source cannot be tokenized.
    pub fn analyze_source(&self, path: &Path, content: &str) -> Result<Vec<Violation>, AnalyzerError> {
        let stream = tokenize(content).map_err(|e| AnalyzerError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let symbols = SymbolTable::build([&stream]);
        let ctx = FileContext::new(path, content, self.base_dir(), &stream, &symbols);

        let mut violations = self.check(&ctx);
        violations.sort_by_key(|v| (v.location.line, v.location.column));
        Ok(violations)
    }

    /// Runs every registered sniff over one file.
    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (index, token) in ctx.stream.iter().enumerate() {
            let Some(ids) = self.listeners.get(&token.kind) else {
                continue;
            };
            for &id in ids {
                let sniff = &self.sniffs[id];
                let found = sniff.process(ctx, index);
                if found.is_empty() {
                    continue;
                }
                let found = self.apply_allowances(sniff.as_ref(), ctx, found);
                violations.extend(self.apply_severity_override(sniff.name(), found));
            }
        }

        violations
    }

    /// Drops violations covered by an allow directive.
    ///
    /// A directive without a reason still suppresses the violation, but a
    /// sniff that requires a reason gets a warning in its place.
    fn apply_allowances(
        &self,
        sniff: &dyn Sniff,
        ctx: &FileContext,
        violations: Vec<Violation>,
    ) -> Vec<Violation> {
        let mut kept = Vec::with_capacity(violations.len());
        for violation in violations {
            let line = violation.location.line;
            let allow = check_allow_with_reason(ctx.content, line, sniff.name());
            if !allow.is_allowed() {
                kept.push(violation);
                continue;
            }

            debug!("Allowed {} at {}:{}", sniff.name(), ctx.relative_path.display(), line);
            if sniff.requires_allow_reason() && allow.reason().is_none() {
                kept.push(
                    Violation::new(
                        sniff.code(),
                        sniff.name(),
                        Severity::Warning,
                        Location::new(ctx.relative_path.clone(), line, violation.location.column),
                        format!(
                            "Allow directive for '{}' is missing required reason",
                            sniff.name()
                        ),
                    )
                    .with_reason("AllowWithoutReason")
                    .with_suggestion(Suggestion::new(
                        "Add reason=\"...\" to explain why this exception is necessary",
                    )),
                );
            }
        }
        kept
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Directory that relative paths in reports are based on.
    fn base_dir(&self) -> &Path {
        if self.root.is_file() {
            self.root.parent().unwrap_or(self.root.as_path())
        } else {
            &self.root
        }
    }

    /// Discovers all source files to analyze, sorted by path.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .git_exclude(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !self.has_source_extension(path) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.config
                    .analyzer
                    .extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        let relative = path
            .strip_prefix(self.base_dir())
            .map_or_else(|_| path_str.to_string(), |p| p.to_string_lossy().to_string());

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) || glob_pattern.matches(&relative) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/vendor/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty()
                && normalized_pattern != "/"
                && path_str.contains(&normalized_pattern)
            {
                return true;
            }
        }

        false
    }
}
