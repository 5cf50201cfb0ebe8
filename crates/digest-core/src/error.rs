//! Error types for the digest pipeline

use digest_llm::LlmError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing a digest
///
/// Every variant is terminal for the current run.
#[derive(Error, Debug)]
pub enum DigestError {
    /// Input path does not reference an existing file
    #[error("File not found: {}", .path.display())]
    NotFound {
        /// Requested input path
        path: PathBuf,
    },

    /// Input does not have a `.json` extension
    #[error("Expected JSON file, got: {}", display_extension(.extension))]
    Format {
        /// Input path
        path: PathBuf,
        /// Extension found, including the leading dot (empty when none)
        extension: String,
    },

    /// Input exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Input path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Input is not syntactically valid JSON
    #[error("Invalid JSON format in {}: {source}", .path.display())]
    Parse {
        /// Input path
        path: PathBuf,
        /// Decoder error
        source: serde_json::Error,
    },

    /// Required top-level keys are missing after repair
    #[error(
        "JSON missing required keys: {}. Found keys: {}. This may indicate a severely malformed export file.",
        format_keys(.missing),
        format_keys(.found)
    )]
    Schema {
        /// Required keys that are absent
        missing: Vec<String>,
        /// Top-level keys actually present
        found: Vec<String>,
    },

    /// A required field has the wrong JSON type
    #[error("Field '{field}' must be {expected}, found {found}")]
    FieldType {
        /// Field location (e.g., "pages" or "pages[2]")
        field: String,
        /// Expected JSON type
        expected: &'static str,
        /// JSON type actually present
        found: &'static str,
    },

    /// Generation backend is not reachable or not responsive
    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend was reached but generation failed
    #[error("Error generating summary: {cause}")]
    Generation {
        /// Human-readable cause
        cause: String,
        /// The backend timed out or the connection failed
        timeout_or_connection: bool,
    },

    /// Backup or output file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DigestError {
    /// Generation failure caused by a backend error
    pub fn generation(err: &LlmError) -> Self {
        DigestError::Generation {
            cause: err.to_string(),
            timeout_or_connection: err.is_timeout_or_connection(),
        }
    }

    /// Backend unavailability caused by a backend error
    pub fn unavailable(err: &LlmError) -> Self {
        DigestError::BackendUnavailable(err.to_string())
    }

    /// True for failures while loading or validating the input file
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DigestError::NotFound { .. }
                | DigestError::Format { .. }
                | DigestError::Read { .. }
                | DigestError::Parse { .. }
                | DigestError::Schema { .. }
                | DigestError::FieldType { .. }
        )
    }
}

fn format_keys(keys: &[String]) -> String {
    if keys.is_empty() {
        "(none)".to_string()
    } else {
        keys.join(", ")
    }
}

fn display_extension(extension: &str) -> &str {
    if extension.is_empty() {
        "(no extension)"
    } else {
        extension
    }
}
