//! # php-standards-sniffs
//!
//! Built-in sniffs for the php-standards coding standard.
//!
//! ## Available Sniffs
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | PS001 | `strict-declaration` | Requires `declare(strict_types=1);` right after `<?php` |
//! | PS002 | `function-comment` | Requires doc comments on functions with accurate `@return` tags |
//! | PS003 | `doc-comment-spacing` | Enforces blank-line counts inside doc comments |
//! | PS004 | `forbidden-array-trailing-comma` | Forbids a comma after the last array element |
//! | PS005 | `yoda-condition` | Enforces the operand order of comparisons |
//!
//! ## Usage
//!
//! ```ignore
//! use php_standards_core::Analyzer;
//! use php_standards_sniffs::{StrictDeclaration, YodaCondition};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .sniff(StrictDeclaration::new())
//!     .sniff(YodaCondition::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod doc_comment_spacing;
pub mod forbidden_array_trailing_comma;
pub mod function_comment;
mod presets;
pub mod strict_declaration;
pub mod yoda_condition;

#[cfg(test)]
mod test_support;

pub use doc_comment_spacing::DocCommentSpacing;
pub use forbidden_array_trailing_comma::ForbiddenArrayTrailingComma;
pub use function_comment::FunctionComment;
pub use presets::{all_sniffs, minimal_sniffs, sniffs_from_config, Preset};
pub use strict_declaration::{validate, DeclarationFailure, FailureReason, StrictDeclaration};
pub use yoda_condition::{YodaCondition, YodaStyle};

/// Re-export core types for convenience.
pub use php_standards_core::{Severity, Sniff, Violation};
