//! Backend selection
//!
//! The pipeline is written once against `LlmProvider`; `Backend` picks the
//! concrete provider from configuration.

use crate::llamacpp::{self, LlamaCppProvider};
use crate::ollama::{self, OllamaProvider};
use crate::LlmError;
use digest_domain::{GenerationOptions, LlmProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which generation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local `ollama` command-line runner
    #[default]
    Ollama,
    /// llama.cpp server over HTTP
    LlamaCpp,
}

impl BackendKind {
    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            BackendKind::Ollama => ollama::DEFAULT_MODEL,
            BackendKind::LlamaCpp => llamacpp::DEFAULT_MODEL,
        }
    }

    /// Generation timeout used when none is configured, in seconds
    pub fn default_timeout_secs(&self) -> u64 {
        match self {
            BackendKind::Ollama => ollama::DEFAULT_TIMEOUT_SECS,
            BackendKind::LlamaCpp => digest_domain::options::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Config/CLI name
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Ollama => "ollama",
            BackendKind::LlamaCpp => "llamacpp",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "llamacpp" | "llama.cpp" | "llama-cpp" => Ok(BackendKind::LlamaCpp),
            _ => Err(format!("Invalid backend: {}", s)),
        }
    }
}

/// Backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend to use
    #[serde(default)]
    pub kind: BackendKind,

    /// Model name; the backend's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// llama.cpp API base URL
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// `ollama` executable
    #[serde(default = "default_ollama_binary")]
    pub ollama_binary: String,
}

impl BackendConfig {
    /// Configured model, or the backend's default
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.kind.default_model())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            model: None,
            server_url: default_server_url(),
            ollama_binary: default_ollama_binary(),
        }
    }
}

fn default_server_url() -> String {
    llamacpp::DEFAULT_SERVER_URL.to_string()
}

fn default_ollama_binary() -> String {
    ollama::DEFAULT_BINARY.to_string()
}

/// The provider chosen by configuration
#[derive(Debug, Clone)]
pub enum Backend {
    /// Local process backend
    Ollama(OllamaProvider),
    /// HTTP backend
    LlamaCpp(LlamaCppProvider),
}

impl Backend {
    /// Build the provider described by `config`
    pub fn from_config(config: &BackendConfig) -> Self {
        match config.kind {
            BackendKind::Ollama => Backend::Ollama(
                OllamaProvider::new(config.model()).with_binary(&config.ollama_binary),
            ),
            BackendKind::LlamaCpp => {
                Backend::LlamaCpp(LlamaCppProvider::new(&config.server_url, config.model()))
            }
        }
    }

    /// Which kind of backend this is
    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Ollama(_) => BackendKind::Ollama,
            Backend::LlamaCpp(_) => BackendKind::LlamaCpp,
        }
    }

    fn provider(&self) -> &dyn LlmProvider<Error = LlmError> {
        match self {
            Backend::Ollama(p) => p,
            Backend::LlamaCpp(p) => p,
        }
    }
}

impl LlmProvider for Backend {
    type Error = LlmError;

    fn name(&self) -> &str {
        self.provider().name()
    }

    fn model(&self) -> &str {
        self.provider().model()
    }

    fn check_available(&self) -> Result<(), Self::Error> {
        self.provider().check_available()
    }

    fn list_models(&self) -> Result<Vec<String>, Self::Error> {
        self.provider().list_models()
    }

    fn prepare(&self) -> Result<(), Self::Error> {
        self.provider().prepare()
    }

    fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String, Self::Error> {
        self.provider().complete(prompt, options)
    }

    fn setup_hint(&self) -> String {
        self.provider().setup_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("ollama".parse::<BackendKind>().unwrap(), BackendKind::Ollama);
        assert_eq!("LlamaCpp".parse::<BackendKind>().unwrap(), BackendKind::LlamaCpp);
        assert_eq!("llama.cpp".parse::<BackendKind>().unwrap(), BackendKind::LlamaCpp);
        assert!("gpt".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::LlamaCpp.to_string(), "llamacpp");
    }

    #[test]
    fn test_default_models_per_backend() {
        let mut config = BackendConfig::default();
        assert_eq!(config.model(), "llama3.2");

        config.kind = BackendKind::LlamaCpp;
        assert_eq!(config.model(), "local-model");

        config.model = Some("mistral".to_string());
        assert_eq!(config.model(), "mistral");
    }

    #[test]
    fn test_from_config_selects_provider() {
        let config = BackendConfig {
            kind: BackendKind::LlamaCpp,
            model: Some("qwen".to_string()),
            ..Default::default()
        };
        let backend = Backend::from_config(&config);
        assert_eq!(backend.kind(), BackendKind::LlamaCpp);
        assert_eq!(backend.name(), "llama.cpp server");
        assert_eq!(backend.model(), "qwen");

        let backend = Backend::from_config(&BackendConfig::default());
        assert_eq!(backend.kind(), BackendKind::Ollama);
        assert_eq!(backend.name(), "Ollama");
        assert!(backend.setup_hint().contains("ollama serve"));
    }

    #[test]
    fn test_timeouts_per_backend() {
        assert_eq!(BackendKind::Ollama.default_timeout_secs(), 120);
        assert_eq!(BackendKind::LlamaCpp.default_timeout_secs(), 180);
    }
}
