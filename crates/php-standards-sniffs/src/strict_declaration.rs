//! Sniff requiring `declare(strict_types=1);` directly after the open tag.
//!
//! # Accepted Shape
//!
//! ```php
//! <?php
//! declare(strict_types=1);
//! ```
//!
//! The statement must sit on the line right after `<?php`, start in column 1
//! and be written without any whitespace inside it.
//!
//! # Error Codes
//!
//! - `MissingDeclaration`: no `declare` statement at all
//! - `WrongPosition`: not on the line after the open tag
//! - `LeadingSpace`: indented
//! - `InvalidDeclaration`: anything else about the shape is wrong

use php_standards_core::{FileContext, Severity, Sniff, TokenKind, TokenStream, Violation};
use std::fmt;

/// Sniff code for strict-declaration.
pub const CODE: &str = "PS001";

/// Sniff name for strict-declaration.
pub const NAME: &str = "strict-declaration";

const EXPECTED_NAME: &str = "strict_types";
const EXPECTED_VALUE: &str = "1";

/// The six tokens after `declare`, in order.
const SHAPE: [TokenKind; 6] = [
    TokenKind::OpenParenthesis,
    TokenKind::String,
    TokenKind::Equal,
    TokenKind::LNumber,
    TokenKind::CloseParenthesis,
    TokenKind::Semicolon,
];

/// Why a file failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// No `declare` token after the start marker.
    MissingDeclaration,
    /// The declaration is not on the line after the start marker.
    WrongPosition,
    /// The declaration does not start in column 1.
    LeadingSpace,
    /// The declaration is present but malformed.
    InvalidDeclaration,
}

impl FailureReason {
    /// Error code reported for this reason.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingDeclaration => "MissingDeclaration",
            Self::WrongPosition => "WrongPosition",
            Self::LeadingSpace => "LeadingSpace",
            Self::InvalidDeclaration => "InvalidDeclaration",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::MissingDeclaration => "Strict type declaration not found in file",
            Self::WrongPosition => {
                "Strict type declaration must be on the line immediately following the opening tag"
            }
            Self::LeadingSpace => {
                "Strict type declaration must be on its own line with no leading spaces"
            }
            Self::InvalidDeclaration => {
                "Strict type declaration invalid, must be `declare(strict_types=1);`"
            }
        };
        f.write_str(message)
    }
}

/// A failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationFailure {
    /// What went wrong.
    pub reason: FailureReason,
    /// Index of the token the failure is reported at (always the start marker).
    pub position: usize,
}

/// Validates the strict-types declaration following the token at `start`.
///
/// Pure: the result depends only on the stream and `start`. The first
/// failing check wins.
///
/// # Errors
///
/// Returns the first [`DeclarationFailure`] found.
pub fn validate(stream: &TokenStream, start: usize) -> Result<(), DeclarationFailure> {
    let fail = |reason| {
        Err(DeclarationFailure {
            reason,
            position: start,
        })
    };

    let Some(declare_ptr) = stream.find_next(&[TokenKind::Declare], start) else {
        return fail(FailureReason::MissingDeclaration);
    };

    let open = &stream[start];
    let declare = &stream[declare_ptr];
    if declare.line != open.line + 1 {
        return fail(FailureReason::WrongPosition);
    }
    if declare.column != 1 {
        return fail(FailureReason::LeadingSpace);
    }

    let mut parts = Vec::with_capacity(SHAPE.len());
    let mut cursor = declare_ptr;
    for kind in SHAPE {
        let Some(found) = stream.find_next(&[kind], cursor) else {
            return fail(FailureReason::InvalidDeclaration);
        };
        parts.push(&stream[found]);
        cursor = found;
    }

    if parts[1].content != EXPECTED_NAME || parts[3].content != EXPECTED_VALUE {
        return fail(FailureReason::InvalidDeclaration);
    }

    let mut previous = declare;
    for part in parts {
        if part.line != declare.line || part.column != previous.end_column() {
            return fail(FailureReason::InvalidDeclaration);
        }
        previous = part;
    }

    Ok(())
}

/// Requires a well-formed strict-types declaration in every file.
#[derive(Debug, Clone)]
pub struct StrictDeclaration {
    /// Severity level.
    pub severity: Severity,
}

impl Default for StrictDeclaration {
    fn default() -> Self {
        Self::new()
    }
}

impl StrictDeclaration {
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

impl Sniff for StrictDeclaration {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires `declare(strict_types=1);` on the line after the open tag"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::OpenTag]
    }

    fn process(&self, ctx: &FileContext, ptr: usize) -> Vec<Violation> {
        // Only the first open tag of a file is checked.
        if ptr > 0 && ctx.stream.find_previous(&[TokenKind::OpenTag], ptr - 1).is_some() {
            return Vec::new();
        }

        match validate(ctx.stream, ptr) {
            Ok(()) => Vec::new(),
            Err(failure) => vec![ctx.report(
                self,
                failure.position,
                failure.reason.code(),
                failure.reason.to_string(),
            )],
        }
    }
}
