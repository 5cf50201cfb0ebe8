//! Output formatting for the CLI.

use crate::error::CliError;
use colored::*;
use digest_core::{DigestError, NothingToSummarize, ProgressEvent};
use digest_domain::DigestStats;

/// Characters of the digest shown after a run
pub const PREVIEW_CHARS: usize = 500;

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Indented follow-up line under a message.
    pub fn detail(&self, message: &str) -> String {
        format!("  {}", message)
    }

    /// Console lines for a pipeline progress event.
    pub fn progress(&self, event: &ProgressEvent) -> Vec<String> {
        match event {
            ProgressEvent::CheckingBackend { backend } => {
                vec![self.info(&format!("Checking {}...", backend))]
            }
            ProgressEvent::BackendReady { backend, model } => {
                vec![self.success(&format!("{} is running (model: {})", backend, model))]
            }
            ProgressEvent::Loading { path } => {
                vec![self.info(&format!("Loading {}...", path.display()))]
            }
            ProgressEvent::Repaired(report) => {
                let mut lines = vec![self.warning("Malformed JSON detected, repaired keys and values")];
                lines.push(self.detail(&format!(
                    "Original saved as {}",
                    report.backup_path.display()
                )));
                if let Some(path) = &report.rewritten_path {
                    lines.push(self.detail(&format!("Repaired JSON saved to {}", path.display())));
                }
                lines
            }
            ProgressEvent::Loaded {
                page_count,
                reading_time_minutes,
                ..
            } => {
                let stats = DigestStats {
                    page_count: *page_count,
                    total_reading_time_minutes: *reading_time_minutes,
                };
                vec![self.info(&format!(
                    "Found {} pages ({} min reading time)",
                    stats.page_count,
                    stats.reading_time_display()
                ))]
            }
            ProgressEvent::Budgeted {
                included, total, ..
            } => {
                if included < total {
                    vec![self.info(&format!(
                        "Prepared {} of {} pages for summarization (token budget reached)",
                        included, total
                    ))]
                } else {
                    vec![self.info(&format!("Prepared {} pages for summarization", included))]
                }
            }
            ProgressEvent::Generating { backend, model } => vec![
                self.info(&format!("Generating digest with {} via {}...", model, backend)),
                self.detail("(This may take 30-90 seconds depending on context size)"),
            ],
            ProgressEvent::Saving { path } => {
                vec![self.info(&format!("Saving to {}...", path.display()))]
            }
            ProgressEvent::Saved { path } => {
                vec![self.success(&format!("Done! Your digest is ready: {}", path.display()))]
            }
        }
    }

    /// Preview block for a finished digest.
    pub fn preview(&self, digest: &str) -> String {
        let rule = "=".repeat(50);
        format!(
            "\n{}\n{}\n{}\n{}",
            rule,
            self.colorize("PREVIEW:", "cyan"),
            rule,
            preview_text(digest)
        )
    }

    /// Message for a run that had nothing to summarize.
    pub fn nothing_to_summarize(&self, reason: NothingToSummarize) -> String {
        self.error(nothing_message(&reason))
    }

    /// Error line plus remediation text.
    ///
    /// `setup_hint` is shown when the backend could not be reached.
    pub fn error_report(&self, err: &CliError, setup_hint: Option<&str>) -> Vec<String> {
        let mut lines = Vec::new();
        match err {
            CliError::Digest(DigestError::BackendUnavailable(cause)) => {
                lines.push(self.error(&format!("Backend is not available: {}", cause)));
                if let Some(hint) = setup_hint {
                    lines.extend(hint.lines().map(|line| self.detail(line)));
                }
            }
            CliError::Digest(DigestError::Generation {
                cause,
                timeout_or_connection: true,
            }) => {
                lines.push(self.error(&format!("Error generating summary: {}", cause)));
                lines.push(self.detail(
                    "The backend timed out or dropped the connection. Try a smaller --max-tokens or a longer --timeout.",
                ));
            }
            CliError::Digest(e) if e.is_input_error() => {
                lines.push(self.error(&format!("Error loading file: {}", e)));
            }
            CliError::NothingToSummarize(reason) => lines.push(self.nothing_to_summarize(*reason)),
            other => lines.push(self.error(&other.to_string())),
        }
        lines
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of the digest, with `...` when cut.
pub fn preview_text(digest: &str) -> String {
    match digest.char_indices().nth(PREVIEW_CHARS) {
        Some((index, _)) => format!("{}...", &digest[..index]),
        None => digest.to_string(),
    }
}

/// Human wording for an empty run.
pub fn nothing_message(reason: &NothingToSummarize) -> &'static str {
    match reason {
        NothingToSummarize::NoPages => "No browsing data found in the file",
        NothingToSummarize::EmptyContent => "No content to summarize",
    }
}
