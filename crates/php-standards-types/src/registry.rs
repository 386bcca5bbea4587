//! Extension registry and its TOML configuration.
//!
//! Extensions are declared in the project config file next to the sniff
//! settings:
//!
//! ```toml
//! [[factory_methods]]
//! class = "App\\Builder\\ObjectBuilderInterface"
//! methods = ["build", "buildWithContext"]
//! argument = 0
//! ```

use crate::{DynamicMethodReturnTypeExtension, FactoryMethodReturnType, MethodCall, Scope, Type};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One `[[factory_methods]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FactoryMethodConfig {
    /// Class or interface declaring the factory methods.
    pub class: String,
    /// Factory method names.
    pub methods: Vec<String>,
    /// Position of the argument holding the class name.
    #[serde(default)]
    pub argument: Option<usize>,
}

/// Errors when loading extension configuration.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },
    /// An entry is structurally invalid.
    #[error("factory_methods[{index}]: {message}")]
    Validation {
        /// Position of the entry in the file.
        index: usize,
        /// What is wrong with it.
        message: String,
    },
}

/// An ordered set of return type extensions.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn DynamicMethodReturnTypeExtension>>,
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.extensions.iter().map(|e| e.class()))
            .finish()
    }
}

impl ExtensionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the `[[factory_methods]]` tables of a config file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ExtensionConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ExtensionConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Builds a registry from the `[[factory_methods]]` tables in `content`.
    ///
    /// Other tables are ignored, so the whole project config can be passed.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid or an entry has an empty class
    /// or no methods.
    pub fn from_toml(content: &str) -> Result<Self, ExtensionConfigError> {
        #[derive(Deserialize)]
        struct RawConfig {
            #[serde(default)]
            factory_methods: Vec<FactoryMethodConfig>,
        }

        let raw: RawConfig = toml::from_str(content).map_err(|e| ExtensionConfigError::Parse {
            message: e.to_string(),
        })?;

        let mut registry = Self::new();
        for (index, entry) in raw.factory_methods.into_iter().enumerate() {
            if entry.class.trim().is_empty() {
                return Err(ExtensionConfigError::Validation {
                    index,
                    message: "class must not be empty".to_string(),
                });
            }
            if entry.methods.is_empty() {
                return Err(ExtensionConfigError::Validation {
                    index,
                    message: format!("no methods listed for {}", entry.class),
                });
            }
            debug!(class = %entry.class, methods = ?entry.methods, "Registered factory extension");
            registry.register(FactoryMethodReturnType::new(
                entry.class,
                entry.methods,
                entry.argument,
            ));
        }
        Ok(registry)
    }

    /// Adds an extension. Earlier extensions take precedence.
    pub fn register<E: DynamicMethodReturnTypeExtension + 'static>(&mut self, extension: E) {
        self.extensions.push(Box::new(extension));
    }

    /// Registered extensions, in precedence order.
    #[must_use]
    pub fn extensions(&self) -> &[Box<dyn DynamicMethodReturnTypeExtension>] {
        &self.extensions
    }

    /// Number of registered extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Returns true if no extensions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Types a call to `method` on `class` with the first matching extension.
    ///
    /// Class names compare case-insensitively, ignoring a leading `\`.
    /// Returns `None` when no extension handles the call.
    #[must_use]
    pub fn resolve(
        &self,
        class: &str,
        method: &str,
        call: &MethodCall,
        scope: &dyn Scope,
    ) -> Option<Type> {
        let class = class.trim_start_matches('\\');
        self.extensions
            .iter()
            .find(|e| {
                e.class().trim_start_matches('\\').eq_ignore_ascii_case(class)
                    && e.is_method_supported(method)
            })
            .map(|e| e.type_from_method_call(method, call, scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arg, Expr, LiteralScope};

    const CONFIG: &str = r#"
preset = "standard"

[rules.yoda-condition]
style = "require"

[[factory_methods]]
class = "App\\Builder\\ObjectBuilderInterface"
methods = ["build", "buildWithContext"]

[[factory_methods]]
class = "App\\Repository\\Registry"
methods = ["get"]
argument = 1
"#;

    fn call(name: &str, args: Vec<Expr>) -> MethodCall {
        MethodCall::new(
            Expr::variable("factory"),
            name,
            args.into_iter().map(Arg::new).collect(),
        )
    }

    #[test]
    fn test_from_toml() {
        let registry = ExtensionRegistry::from_toml(CONFIG).unwrap();
        assert_eq!(registry.len(), 2);
        let classes: Vec<_> = registry.extensions().iter().map(|e| e.class().to_string()).collect();
        assert_eq!(
            classes,
            vec!["App\\Builder\\ObjectBuilderInterface", "App\\Repository\\Registry"]
        );
    }

    #[test]
    fn test_config_without_extensions() {
        let registry = ExtensionRegistry::from_toml("preset = \"minimal\"\n").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve() {
        let registry = ExtensionRegistry::from_toml(CONFIG).unwrap();
        let user = Expr::class_constant("App\\User", "class");

        assert_eq!(
            registry.resolve(
                "\\app\\builder\\ObjectBuilderInterface",
                "buildWithContext",
                &call("buildWithContext", vec![user.clone()]),
                &LiteralScope,
            ),
            Some(Type::Object("App\\User".into()))
        );
        assert_eq!(
            registry.resolve(
                "App\\Repository\\Registry",
                "get",
                &call("get", vec![Expr::variable("id"), Expr::string("App\\Post")]),
                &LiteralScope,
            ),
            Some(Type::Object("App\\Post".into()))
        );
    }

    #[test]
    fn test_resolve_unhandled() {
        let registry = ExtensionRegistry::from_toml(CONFIG).unwrap();
        let args = vec![Expr::string("App\\User")];

        assert_eq!(
            registry.resolve("App\\Other", "build", &call("build", args.clone()), &LiteralScope),
            None
        );
        assert_eq!(
            registry.resolve(
                "App\\Builder\\ObjectBuilderInterface",
                "destroy",
                &call("destroy", args),
                &LiteralScope,
            ),
            None
        );
    }

    #[test]
    fn test_first_extension_wins() {
        let mut registry = ExtensionRegistry::new();
        registry.register(FactoryMethodReturnType::new("Factory", ["make"], Some(1)));
        registry.register(FactoryMethodReturnType::new("Factory", ["make"], None));

        let found = registry.resolve(
            "Factory",
            "make",
            &call("make", vec![Expr::string("First"), Expr::string("Second")]),
            &LiteralScope,
        );
        assert_eq!(found, Some(Type::Object("Second".into())));
    }

    #[test]
    fn test_validation_errors() {
        let err = ExtensionRegistry::from_toml("[[factory_methods]]\nclass = \"A\"\nmethods = []\n")
            .unwrap_err();
        assert!(matches!(err, ExtensionConfigError::Validation { index: 0, .. }));

        let err = ExtensionRegistry::from_toml("[[factory_methods]]\nclass = \" \"\nmethods = [\"a\"]\n")
            .unwrap_err();
        assert!(err.to_string().contains("class must not be empty"));
    }

    #[test]
    fn test_parse_error() {
        let err = ExtensionRegistry::from_toml("[[factory_methods]]\nclass = 1\n").unwrap_err();
        assert!(matches!(err, ExtensionConfigError::Parse { .. }));
    }
}
