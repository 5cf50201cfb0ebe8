//! Configuration management for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use digest_core::{DigestConfig, RepairMode};
use digest_llm::BackendConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration, read from `~/.browsing-digest/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generation backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Digest settings; unset values fall back to defaults
    #[serde(default)]
    pub digest: DigestSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// The `[digest]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigestSettings {
    /// Token budget for the browsing log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Input repair behavior
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_mode: Option<RepairMode>,

    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Completion token ceiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,

    /// Generation timeout in seconds; the backend's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".browsing-digest").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides to the backend settings.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(backend) = cli.backend {
            self.backend.kind = backend;
        }
        if let Some(model) = &cli.model {
            self.backend.model = Some(model.clone());
        }
        if let Some(server) = &cli.server {
            self.backend.server_url = server.clone();
        }
        if let Some(max_tokens) = cli.max_tokens {
            self.digest.max_tokens = Some(max_tokens);
        }
        if let Some(timeout) = cli.timeout {
            self.digest.timeout_secs = Some(timeout);
        }
        if cli.no_rewrite {
            self.digest.repair_mode = Some(RepairMode::InMemory);
        }
        if cli.no_color {
            self.settings.color = false;
        }
    }

    /// Pipeline configuration: the backend's defaults, then explicit values.
    pub fn digest_config(&self) -> Result<DigestConfig> {
        let defaults = DigestConfig::for_backend(self.backend.kind);
        let config = DigestConfig {
            max_tokens: self.digest.max_tokens.unwrap_or(defaults.max_tokens),
            repair_mode: self.digest.repair_mode.unwrap_or(defaults.repair_mode),
            temperature: self.digest.temperature.unwrap_or(defaults.temperature),
            completion_tokens: self
                .digest
                .completion_tokens
                .unwrap_or(defaults.completion_tokens),
            generation_timeout_secs: self
                .digest
                .timeout_secs
                .unwrap_or(defaults.generation_timeout_secs),
        };
        config.validate().map_err(CliError::Config)?;
        Ok(config)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self { color: true }
    }
}

fn default_true() -> bool {
    true
}
