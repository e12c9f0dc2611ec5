//! Tooling & Integration Layer
//!
//! The `sidetree` command line and its text renderers.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
