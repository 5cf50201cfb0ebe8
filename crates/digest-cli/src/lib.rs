//! Browsing Digest CLI library.
//!
//! Argument parsing, configuration file handling, console output and the
//! commands behind the `browsing-digest` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
