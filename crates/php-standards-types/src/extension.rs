//! Return type extensions for method calls.

use crate::{MethodCall, Scope, Type};
use tracing::trace;

/// Computes the return type of a method call from the call itself.
pub trait DynamicMethodReturnTypeExtension: Send + Sync {
    /// Class whose methods this extension handles.
    fn class(&self) -> &str;

    /// Returns true if this extension handles `method`.
    fn is_method_supported(&self, method: &str) -> bool;

    /// Returns the type of `call`, a call to `method` on [`class`](Self::class).
    fn type_from_method_call(&self, method: &str, call: &MethodCall, scope: &dyn Scope) -> Type;

    /// One-line summary for listings.
    fn describe(&self) -> String {
        self.class().to_string()
    }
}

/// Types factory calls by the class name passed in one of their arguments.
///
/// `$builder->build(User::class)` is typed as `User` when the argument is a
/// constant string, and `mixed` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryMethodReturnType {
    class: String,
    methods: Vec<String>,
    dynamic_arg: usize,
}

impl FactoryMethodReturnType {
    /// Creates an extension for `methods` of `class`.
    ///
    /// `dynamic_arg` is the position of the argument holding the class
    /// name, 0 when `None`.
    #[must_use]
    pub fn new<I, S>(class: impl Into<String>, methods: I, dynamic_arg: Option<usize>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            class: class.into(),
            methods: methods.into_iter().map(Into::into).collect(),
            dynamic_arg: dynamic_arg.unwrap_or(0),
        }
    }

    /// Supported method names.
    #[must_use]
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Position of the argument holding the class name.
    #[must_use]
    pub fn dynamic_arg(&self) -> usize {
        self.dynamic_arg
    }
}

impl DynamicMethodReturnTypeExtension for FactoryMethodReturnType {
    fn class(&self) -> &str {
        &self.class
    }

    fn is_method_supported(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m == method)
    }

    fn type_from_method_call(&self, method: &str, call: &MethodCall, scope: &dyn Scope) -> Type {
        let Some(arg) = call.arg(self.dynamic_arg) else {
            trace!(method, position = self.dynamic_arg, "Factory argument missing");
            return Type::Mixed;
        };
        match scope.type_of(&arg.value) {
            Type::ConstantString(class) => Type::Object(class),
            _ => Type::Mixed,
        }
    }

    fn describe(&self) -> String {
        format!(
            "{}::{{{}}} (argument {})",
            self.class,
            self.methods.join(", "),
            self.dynamic_arg
        )
    }
}
