//! Type lookups for expressions.

use crate::{Expr, Type};

/// Answers type questions about expressions at a point in the program.
pub trait Scope {
    /// Returns the type of `expr`.
    fn type_of(&self, expr: &Expr) -> Type;
}

/// A scope that only knows literals.
///
/// String literals and `X::class` are constant strings, integer literals
/// are constant integers and everything else is `mixed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralScope;

impl Scope for LiteralScope {
    fn type_of(&self, expr: &Expr) -> Type {
        match expr {
            Expr::String(value) => Type::ConstantString(value.clone()),
            Expr::Int(value) => Type::ConstantInt(*value),
            Expr::ClassConstFetch { class, name } if name.eq_ignore_ascii_case("class") => {
                Type::ConstantString(class.trim_start_matches('\\').to_string())
            }
            _ => Type::Mixed,
        }
    }
}
