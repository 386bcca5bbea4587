//! List extensions command implementation.

use anyhow::{Context, Result};
use php_standards_types::ExtensionRegistry;

use crate::config_resolver::ConfigSource;

/// Runs the list-extensions command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let Some(path) = source.path() else {
        println!("No configuration file found; no extensions registered.");
        return Ok(());
    };

    let registry = ExtensionRegistry::from_file(path)
        .with_context(|| format!("Failed to load extensions from {}", path.display()))?;

    if registry.is_empty() {
        println!("No [[factory_methods]] entries in {}", path.display());
        return Ok(());
    }

    println!("Return type extensions from {}:\n", path.display());
    for extension in registry.extensions() {
        println!("  {}", extension.describe());
    }
    Ok(())
}
