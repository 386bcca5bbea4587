//! php-standards CLI tool.
//!
//! Usage:
//! ```bash
//! php-standards check [OPTIONS] [PATH]
//! php-standards list-sniffs
//! php-standards list-extensions
//! php-standards init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Coding-standard checks for PHP projects
#[derive(Parser)]
#[command(name = "php-standards")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PHP_STANDARDS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sniffs over PHP files
    Check {
        /// File or directory to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific sniffs, by name or code (comma-separated)
        #[arg(long)]
        sniffs: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available sniffs
    ListSniffs,

    /// List the configured return type extensions
    ListExtensions {
        /// Project directory used to find the config file
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Source snippets rendered with miette.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            sniffs,
            exclude,
        } => {
            let source = config_resolver::resolve(&project_dir(&path), cli.config.as_deref());
            let passed = commands::check::run(&path, format, sniffs, exclude, &source)?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListSniffs => {
            commands::list_sniffs::run();
            Ok(())
        }
        Commands::ListExtensions { path } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            commands::list_extensions::run(&source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

/// Directory searched for a project config: the path itself, or the
/// parent when a single file is checked.
fn project_dir(path: &std::path::Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf)
    } else {
        path.to_path_buf()
    }
}
