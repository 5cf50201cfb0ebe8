//! Mock provider for deterministic testing

use crate::LlmError;
use digest_domain::{GenerationOptions, LlmProvider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network
/// calls or spawning processes. Every prompt it receives is recorded so tests
/// can assert on what the pipeline sent. Responses are returned verbatim,
/// empty ones included.
///
/// # Examples
///
/// ```
/// use digest_domain::{GenerationOptions, LlmProvider};
/// use digest_llm::MockProvider;
///
/// let options = GenerationOptions::default();
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.complete("any prompt", &options).unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.complete("prompt1", &options).unwrap(), "response1");
/// assert_eq!(provider.complete("prompt2", &options).unwrap(), "response2");
/// assert_eq!(provider.prompts().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    options: Arc<Mutex<Vec<GenerationOptions>>>,
    models: Vec<String>,
    available: bool,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            options: Arc::new(Mutex::new(Vec::new())),
            models: vec!["mock-model".to_string()],
            available: true,
        }
    }

    /// Make availability checks fail
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Replace the list of models the mock reports
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Error);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// The most recent prompt, if any
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.prompts).last().cloned()
    }

    /// Options passed with the most recent call, if any
    pub fn last_options(&self) -> Option<GenerationOptions> {
        lock(&self.options).last().cloned()
    }

    /// Forget recorded calls
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
        lock(&self.options).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        "mock provider"
    }

    fn model(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or("mock-model")
    }

    fn check_available(&self) -> Result<(), Self::Error> {
        if self.available {
            Ok(())
        } else {
            Err(LlmError::Unavailable("Mock backend is switched off".to_string()))
        }
    }

    fn list_models(&self) -> Result<Vec<String>, Self::Error> {
        self.check_available()?;
        Ok(self.models.clone())
    }

    fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());
        lock(&self.options).push(options.clone());

        match lock(&self.responses).get(prompt) {
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            Some(MockReply::Text(response)) => Ok(response.clone()),
            None => Ok(self.default_response.clone()),
        }
    }

    fn setup_hint(&self) -> String {
        "The mock backend needs no setup.".to_string()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
