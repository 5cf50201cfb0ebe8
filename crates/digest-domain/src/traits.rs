//! Trait definitions for external interactions
//!
//! These traits define the boundary between the digest pipeline and the
//! generation backends. Implementations live in `digest-llm`.

use crate::GenerationOptions;

/// Trait for text generation backends
///
/// Implemented by the infrastructure layer (digest-llm). Calls block until
/// a completion or a failure arrives.
pub trait LlmProvider {
    /// Error type for provider operations
    type Error;

    /// Human-readable backend name (e.g., "Ollama")
    fn name(&self) -> &str;

    /// Model the provider generates with
    fn model(&self) -> &str;

    /// Check that the backend is reachable and responsive
    fn check_available(&self) -> Result<(), Self::Error>;

    /// List models the backend can serve
    fn list_models(&self) -> Result<Vec<String>, Self::Error>;

    /// Make the configured model ready before generating
    fn prepare(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Generate a completion for the prompt; never returns an empty string
    fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String, Self::Error>;

    /// Instructions for getting the backend running
    fn setup_hint(&self) -> String;
}
