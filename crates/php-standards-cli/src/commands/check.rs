//! Check command implementation.

use anyhow::{Context, Result};
use php_standards_core::{Analyzer, Config, SniffBox};
use php_standards_sniffs::sniffs_from_config;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Loads the configuration the resolver pointed at.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Runs the check command.
///
/// Returns `false` when a violation reaches the configured failure
/// severity.
pub fn run(
    path: &Path,
    format: OutputFormat,
    sniffs_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<bool> {
    let config = load_config(source)?;
    let fail_on = config.fail_threshold();

    let sniffs = match sniffs_filter {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            select_sniffs(&config, &names)
        }
        None => sniffs_from_config(&config),
    };

    let analyzer = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(exclude)
        .sniffs(sniffs)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} sniffs",
        path.display(),
        analyzer.sniff_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, analyzer.root())?;

    Ok(!result.has_violations_at(fail_on))
}

/// Picks sniffs by name or code from the full set, ignoring the preset.
fn select_sniffs(config: &Config, names: &[&str]) -> Vec<SniffBox> {
    let mut every = config.clone();
    every.preset = Some("standard".to_string());
    let available = sniffs_from_config(&every);

    for name in names {
        if !available.iter().any(|s| s.name() == *name || s.code() == *name) {
            tracing::warn!("Unknown sniff: {}", name);
        }
    }

    available
        .into_iter()
        .filter(|s| names.contains(&s.name()) || names.contains(&s.code()))
        .collect()
}
