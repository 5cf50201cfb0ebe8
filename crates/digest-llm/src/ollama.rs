//! Ollama Provider Implementation
//!
//! Drives a local model through the `ollama` command-line runner. The prompt
//! is piped to `ollama run <model>` on stdin and standard output is the
//! completion.
//!
//! # Features
//!
//! - Availability probe via `ollama list`
//! - Installed-model listing and automatic `ollama pull` of a missing model
//! - Timeout handling; the child process is killed when the limit is hit
//!
//! # Examples
//!
//! ```no_run
//! use digest_domain::{GenerationOptions, LlmProvider};
//! use digest_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("llama3.2");
//! provider.check_available()?;
//! let digest = provider.complete("Summarize my day", &GenerationOptions::default())?;
//! # Ok::<(), digest_llm::LlmError>(())
//! ```

use crate::{block_on, LlmError};
use digest_domain::{GenerationOptions, LlmProvider};
use std::io;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Default executable name
pub const DEFAULT_BINARY: &str = "ollama";

/// Default model
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Default generation timeout (2 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const LIST_TIMEOUT: Duration = Duration::from_secs(10);
const PULL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Ollama command-line provider for local LLM inference
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    binary: PathBuf,
    model: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider using the `ollama` executable on `PATH`
    ///
    /// # Examples
    ///
    /// ```
    /// use digest_domain::LlmProvider;
    /// use digest_llm::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new("mistral");
    /// assert_eq!(provider.model(), "mistral");
    /// ```
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            model: model.into(),
        }
    }

    /// Use a specific `ollama` executable
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Generate text by piping the prompt through `ollama run`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the `ollama` executable cannot be found
    /// - the run exceeds `options.timeout`
    /// - `ollama` exits unsuccessfully
    /// - the model prints nothing
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let input = options.merged_prompt(prompt);
        debug!("Running ollama model '{}' with {} chars of input", self.model, input.len());

        let output = self
            .run(&["run", self.model.as_str()], Some(input), options.timeout)
            .await
            .map_err(|e| match e {
                LlmError::Timeout(_) => LlmError::Timeout(
                    "Ollama timed out. The model might be too slow or the input too large."
                        .to_string(),
                ),
                other => other,
            })?;

        if !output.status.success() {
            return Err(LlmError::Communication(format!(
                "Ollama error: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }

    /// Models reported by `ollama list`
    pub async fn installed_models(&self) -> Result<Vec<String>, LlmError> {
        let output = self.run(&["list"], None, LIST_TIMEOUT).await?;
        if !output.status.success() {
            return Err(LlmError::Communication(format!(
                "`ollama list` failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(parse_model_list(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Download the configured model
    pub async fn pull(&self) -> Result<(), LlmError> {
        info!("Pulling ollama model '{}'", self.model);
        let output = self
            .run(&["pull", self.model.as_str()], None, PULL_TIMEOUT)
            .await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(LlmError::ModelNotAvailable(format!(
                "{} ({})",
                self.model,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    async fn probe(&self) -> Result<(), LlmError> {
        let output = self.run(&["list"], None, CHECK_TIMEOUT).await.map_err(|e| match e {
            LlmError::Unavailable(msg) => LlmError::Unavailable(msg),
            other => LlmError::Unavailable(format!("Ollama is not running: {}", other)),
        })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(LlmError::Unavailable(format!(
                "Ollama is not running: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    async fn run(
        &self,
        args: &[&str],
        input: Option<String>,
        limit: Duration,
    ) -> Result<Output, LlmError> {
        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| self.spawn_error(e))?;

        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            // Write stdin while stdout is drained
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    debug!("Failed to write prompt to ollama stdin: {}", e);
                }
            });
        }

        match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(LlmError::Communication(format!(
                "Failed to run {}: {}",
                self.binary.display(),
                e
            ))),
            Err(_) => {
                warn!("`ollama {}` exceeded {}s", args.join(" "), limit.as_secs());
                Err(LlmError::Timeout(format!(
                    "`ollama {}` did not finish within {}s",
                    args.join(" "),
                    limit.as_secs()
                )))
            }
        }
    }

    fn spawn_error(&self, e: io::Error) -> LlmError {
        if e.kind() == io::ErrorKind::NotFound {
            LlmError::Unavailable("Ollama not found. Please install it from https://ollama.ai".to_string())
        } else {
            LlmError::Unavailable(format!("Failed to start {}: {}", self.binary.display(), e))
        }
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl LlmProvider for OllamaProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        "Ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn check_available(&self) -> Result<(), Self::Error> {
        block_on(self.probe())?
    }

    fn list_models(&self) -> Result<Vec<String>, Self::Error> {
        block_on(self.installed_models())?
    }

    fn prepare(&self) -> Result<(), Self::Error> {
        block_on(async {
            let models = self.installed_models().await?;
            if model_is_listed(&self.model, &models) {
                return Ok(());
            }
            warn!("Model '{}' not found locally, pulling it", self.model);
            self.pull().await
        })?
    }

    fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String, Self::Error> {
        block_on(self.generate(prompt, options))?
    }

    fn setup_hint(&self) -> String {
        "Start it with: ollama serve\nOr install from: https://ollama.ai".to_string()
    }
}

/// Parse `ollama list` output: skip the header, keep the first column
pub fn parse_model_list(stdout: &str) -> Vec<String> {
    stdout
        .trim()
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Whether `model` is installed; tags match loosely ("llama3.2" matches "llama3.2:latest")
pub fn model_is_listed(model: &str, models: &[String]) -> bool {
    models.iter().any(|m| m == model || m.contains(model))
}
