//! CLI, configuration file and JSON output
//!
//! This crate provides the `supl` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{CliError, CliResult};
