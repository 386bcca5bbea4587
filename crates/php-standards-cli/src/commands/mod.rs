//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_extensions;
pub mod list_sniffs;
pub mod output;
