//! Configuration for the digest pipeline

use crate::budget::DEFAULT_MAX_TOKENS;
use digest_domain::options::{DEFAULT_COMPLETION_TOKENS, DEFAULT_TEMPERATURE};
use digest_domain::GenerationOptions;
use digest_llm::BackendKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do with the input file when it needs repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairMode {
    /// Back up the original, then overwrite it with the repaired JSON
    #[default]
    InPlace,
    /// Back up the original and repair only the in-memory copy
    InMemory,
}

/// Configuration for the digest pipeline
///
/// `Default` uses the default backend's timeout; build with
/// [`DigestConfig::for_backend`] when driving another backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestConfig {
    /// Token budget for the browsing log sent to the model
    pub max_tokens: usize,

    /// Input repair behavior
    pub repair_mode: RepairMode,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens the model may generate
    pub completion_tokens: u32,

    /// Maximum time for the generation call (seconds): 120 for Ollama,
    /// 180 for llama.cpp
    pub generation_timeout_secs: u64,
}

impl DigestConfig {
    /// Default settings with the generation timeout of `kind`
    pub fn for_backend(kind: BackendKind) -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            repair_mode: RepairMode::InPlace,
            temperature: DEFAULT_TEMPERATURE,
            completion_tokens: DEFAULT_COMPLETION_TOKENS,
            generation_timeout_secs: kind.default_timeout_secs(),
        }
    }

    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Options for the generation call (no system instruction)
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            system_prompt: None,
            temperature: self.temperature,
            max_tokens: self.completion_tokens,
            timeout: self.generation_timeout(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.completion_tokens == 0 {
            return Err("completion_tokens must be greater than 0".to_string());
        }
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        Ok(())
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self::for_backend(BackendKind::default())
    }
}
