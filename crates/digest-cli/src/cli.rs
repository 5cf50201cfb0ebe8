//! Command-line argument definitions.

use clap::{ArgAction, Parser};
use digest_llm::BackendKind;
use std::path::PathBuf;

/// Generate a 2-minute digest of your daily browsing using a local model.
#[derive(Debug, Parser)]
#[command(name = "browsing-digest")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
    browsing-digest browsing-digest-2025-01-19.json
    browsing-digest data.json --model mistral
    browsing-digest data.json -b llamacpp --server http://localhost:8080/v1
    browsing-digest data.json --output today.md")]
pub struct Cli {
    /// JSON file exported from the Browsing Digest extension
    #[arg(required_unless_present_any = ["list_models", "check_server"])]
    pub input_file: Option<PathBuf>,

    /// Generation backend: ollama or llamacpp (alias llama.cpp)
    #[arg(short, long, env = "BROWSING_DIGEST_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Model to use (default: llama3.2 for Ollama, local-model for llama.cpp)
    #[arg(short, long, env = "BROWSING_DIGEST_MODEL")]
    pub model: Option<String>,

    /// llama.cpp server URL (default: http://localhost:8080/v1)
    #[arg(short, long, env = "BROWSING_DIGEST_SERVER")]
    pub server: Option<String>,

    /// Output markdown file (default: digest-<date>.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Token budget for the browsing log
    #[arg(long)]
    pub max_tokens: Option<usize>,

    /// Generation timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Repair malformed input in memory only (a .bak is still written)
    #[arg(long)]
    pub no_rewrite: bool,

    /// List available models and exit
    #[arg(long, conflicts_with = "check_server")]
    pub list_models: bool,

    /// Check backend status and exit
    #[arg(long)]
    pub check_server: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter directive for the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
