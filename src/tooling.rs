//! Tooling & Integration Layer
//!
//! Command-line entry points over the library: tree printing and unit conversion.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, OutputFormat};
