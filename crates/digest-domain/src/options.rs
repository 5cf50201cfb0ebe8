//! Per-call generation settings

use std::time::Duration;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Default ceiling on generated tokens
pub const DEFAULT_COMPLETION_TOKENS: u32 = 1200;

/// Default time allowed for one generation call (3 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Settings passed to [`LlmProvider::complete`](crate::LlmProvider::complete)
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// System instruction; providers without a system role prepend it to the prompt
    pub system_prompt: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum number of tokens to generate
    pub max_tokens: u32,

    /// Hard limit on the whole call; exceeding it fails the call
    pub timeout: Duration,
}

impl GenerationOptions {
    /// Set the system instruction
    pub fn with_system_prompt(mut self, system: impl Into<String>) -> Self {
        self.system_prompt = Some(system.into());
        self
    }

    /// Set the call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join the system instruction and prompt for single-message backends
    pub fn merged_prompt(&self, prompt: &str) -> String {
        match &self.system_prompt {
            Some(system) if !system.is_empty() => format!("{}\n\n{}", system, prompt),
            _ => prompt.to_string(),
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_COMPLETION_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
