//! # php-standards-types
//!
//! Dynamic return types for factory methods.
//!
//! A factory such as `$builder->build(User::class, $data)` is declared to
//! return `mixed`, but the class it builds is spelled out in an argument.
//! This crate lets a static analyser recover that type:
//!
//! - [`Type`] and [`Expr`], a minimal model of inferred types and call nodes
//! - [`Scope`] for asking the type of an argument expression
//! - [`DynamicMethodReturnTypeExtension`] trait and its
//!   [`FactoryMethodReturnType`] implementation
//! - [`ExtensionRegistry`], built from `[[factory_methods]]` config tables
//!
//! ## Example
//!
//! ```
//! use php_standards_types::{Arg, Expr, FactoryMethodReturnType, LiteralScope, MethodCall, Type};
//! use php_standards_types::DynamicMethodReturnTypeExtension;
//!
//! let extension = FactoryMethodReturnType::new("App\\ObjectBuilder", ["build"], None);
//! let call = MethodCall::new(
//!     Expr::variable("builder"),
//!     "build",
//!     vec![Arg::new(Expr::class_constant("App\\User", "class"))],
//! );
//!
//! let ty = extension.type_from_method_call("build", &call, &LiteralScope);
//! assert_eq!(ty, Type::Object("App\\User".to_string()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod expr;
pub mod extension;
pub mod registry;
pub mod scope;
pub mod ty;

pub use expr::{Arg, Expr, MethodCall};
pub use extension::{DynamicMethodReturnTypeExtension, FactoryMethodReturnType};
pub use registry::{ExtensionConfigError, ExtensionRegistry, FactoryMethodConfig};
pub use scope::{LiteralScope, Scope};
pub use ty::Type;
