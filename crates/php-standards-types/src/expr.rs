//! Expression nodes the extension inspects.

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `$name`
    Variable(String),
    /// A quoted string literal.
    String(String),
    /// An integer literal.
    Int(i64),
    /// `Class::NAME`, including `Class::class`.
    ClassConstFetch {
        /// Class name as written.
        class: String,
        /// Constant name.
        name: String,
    },
    /// `$var->name(...)`
    MethodCall(Box<MethodCall>),
}

impl Expr {
    /// Builds a variable expression.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Builds a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Builds a class constant fetch.
    #[must_use]
    pub fn class_constant(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ClassConstFetch {
            class: class.into(),
            name: name.into(),
        }
    }
}

impl From<MethodCall> for Expr {
    fn from(call: MethodCall) -> Self {
        Self::MethodCall(Box::new(call))
    }
}

/// A call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    /// Argument value.
    pub value: Expr,
}

impl Arg {
    /// Wraps an expression as an argument.
    #[must_use]
    pub fn new(value: Expr) -> Self {
        Self { value }
    }
}

/// A method call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    /// The receiver.
    pub var: Expr,
    /// Method name.
    pub name: String,
    /// Arguments in call order.
    pub args: Vec<Arg>,
}

impl MethodCall {
    /// Creates a method call.
    #[must_use]
    pub fn new(var: Expr, name: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            var,
            name: name.into(),
            args,
        }
    }

    /// Returns the argument at `position`.
    #[must_use]
    pub fn arg(&self, position: usize) -> Option<&Arg> {
        self.args.get(position)
    }
}
