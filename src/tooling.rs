//! Tooling & Integration Layer
//!
//! Command-line surface over the session and snapshot store.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
