//! Error types for the CLI application.

use crate::output::nothing_message;
use digest_core::NothingToSummarize;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Digest pipeline error
    #[error(transparent)]
    Digest(#[from] digest_core::DigestError),

    /// Backend error outside a pipeline run
    #[error(transparent)]
    Llm(#[from] digest_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The export had nothing to summarize
    #[error("{}", nothing_message(.0))]
    NothingToSummarize(NothingToSummarize),
}
