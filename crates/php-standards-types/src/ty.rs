//! Inferred types.

use std::fmt;

/// The type of an expression, as far as the extension cares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Nothing is known.
    Mixed,
    /// An instance of the named class.
    Object(String),
    /// A string whose value is known.
    ConstantString(String),
    /// An integer whose value is known.
    ConstantInt(i64),
}

impl Type {
    /// Returns the value of a constant string type.
    #[must_use]
    pub fn as_constant_string(&self) -> Option<&str> {
        match self {
            Self::ConstantString(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mixed => f.write_str("mixed"),
            Self::Object(class) => f.write_str(class),
            Self::ConstantString(value) => write!(f, "'{value}'"),
            Self::ConstantInt(value) => write!(f, "{value}"),
        }
    }
}
