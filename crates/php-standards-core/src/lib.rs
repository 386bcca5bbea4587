//! # php-standards-core
//!
//! Core framework for token-based PHP coding-standard checks.
//!
//! This crate provides:
//!
//! - [`tokenize`] and [`TokenStream`], a PHP tokenizer covering what the
//!   sniffs need, with bracket matching and search queries
//! - [`Sniff`] trait for token-driven checks
//! - [`SymbolTable`] for project-wide inheritance questions
//! - [`Analyzer`] for discovering files and dispatching tokens to sniffs
//! - [`Violation`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use php_standards_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .sniff(MySniff::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod lexer;
mod sniff;
mod stream;
mod symbols;
mod token;
mod types;

/// Utility modules for sniff implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use lexer::{tokenize, LexError, LexErrorKind};
pub use sniff::{Sniff, SniffBox};
pub use stream::TokenStream;
pub use symbols::{Ancestry, ClassSymbol, SymbolKind, SymbolTable};
pub use token::{Token, TokenKind};
pub use types::{
    Label, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
