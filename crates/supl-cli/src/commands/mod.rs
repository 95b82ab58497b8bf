//! Subcommand implementations.

pub mod config;
pub mod periods;
pub mod process;
