//! Browsing Digest LLM Provider Layer
//!
//! Generation backends behind the `LlmProvider` trait from `digest-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local `ollama` command-line runner
//! - `LlamaCppProvider`: llama.cpp server through its OpenAI-compatible API
//!
//! `Backend` wraps the two real providers so the pipeline can be built once
//! with whichever one the configuration selects.
//!
//! # Examples
//!
//! ```
//! use digest_domain::{GenerationOptions, LlmProvider};
//! use digest_llm::MockProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.complete("test prompt", &GenerationOptions::default()).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod llamacpp;
pub mod mock;
pub mod ollama;

use std::future::Future;
use thiserror::Error;

pub use backend::{Backend, BackendConfig, BackendKind};
pub use llamacpp::LlamaCppProvider;
pub use mock::MockProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Backend is not installed, not running or not responding
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Could not open a connection to the backend
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The call did not finish within its timeout
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Backend was reached but the request failed
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The backend produced no text
    #[error("Received empty response from model")]
    EmptyResponse,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The async runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// True for failures to reach the backend in time, as opposed to failed requests
    pub fn is_timeout_or_connection(&self) -> bool {
        matches!(self, LlmError::Timeout(_) | LlmError::Connection(_))
    }
}

/// Drive an async backend call to completion on a fresh current-thread runtime
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, LlmError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Runtime(format!("Failed to start async runtime: {}", e)))?;
    Ok(runtime.block_on(future))
}
