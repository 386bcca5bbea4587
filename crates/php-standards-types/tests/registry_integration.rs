//! Integration test: the registry loaded from a full project config file.

use php_standards_types::{
    Arg, Expr, ExtensionConfigError, ExtensionRegistry, LiteralScope, MethodCall, Type,
};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn loads_factory_methods_from_project_config() {
    let registry =
        ExtensionRegistry::from_file(&fixture("php-standards.toml")).expect("config should load");
    assert_eq!(registry.len(), 2);

    let builder = "LoyaltyCorp\\RequestHandlers\\Builder\\Interfaces\\ObjectBuilderInterface";
    let call = MethodCall::new(
        Expr::variable("builder"),
        "buildWithContext",
        vec![
            Arg::new(Expr::class_constant("\\App\\Requests\\CreateUser", "class")),
            Arg::new(Expr::variable("context")),
        ],
    );
    assert_eq!(
        registry.resolve(builder, "buildWithContext", &call, &LiteralScope),
        Some(Type::Object("App\\Requests\\CreateUser".to_string()))
    );

    let call = MethodCall::new(
        Expr::variable("container"),
        "make",
        vec![Arg::new(Expr::variable("id"))],
    );
    assert_eq!(
        registry.resolve("App\\Container", "make", &call, &LiteralScope),
        Some(Type::Mixed)
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let err = ExtensionRegistry::from_file(Path::new("does/not/exist.toml")).unwrap_err();
    assert!(matches!(err, ExtensionConfigError::Io { .. }));
}
