//! Tooling & Integration Layer
//!
//! Command-line surface of the crate.

pub mod cli;

pub use cli::{Cli, CliContext, CommandOutput, Commands, OutputFormat};
