//! Digest command implementation.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use digest_core::{DigestConfig, DigestOutcome, DigestPipeline, DigestReport, ProgressEvent};
use digest_domain::LlmProvider;
use digest_llm::LlmError;
use std::path::Path;

/// Run the pipeline on `input` and print progress plus a preview.
pub fn execute_digest<L>(
    provider: L,
    config: DigestConfig,
    input: &Path,
    output: Option<&Path>,
    formatter: &Formatter,
) -> Result<DigestReport>
where
    L: LlmProvider<Error = LlmError>,
{
    let printer = *formatter;
    let pipeline = DigestPipeline::new(provider, config).with_observer(move |event: &ProgressEvent| {
        for line in printer.progress(event) {
            println!("{}", line);
        }
    });

    match pipeline.run(input, output)? {
        DigestOutcome::Written(report) => {
            println!("{}", formatter.preview(&report.digest));
            Ok(report)
        }
        DigestOutcome::NothingToSummarize(reason) => Err(CliError::NothingToSummarize(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::NothingToSummarize;
    use digest_llm::MockProvider;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_digest_written() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.json");
        fs::write(
            &input,
            r#"{"date": "2025-01-19", "pages": [{"title": "Rust", "content": "Traits", "timestamp": "2025-01-19T09:00:00Z"}]}"#,
        )
        .unwrap();
        let output = dir.path().join("digest.md");

        let report = execute_digest(
            MockProvider::new("A focused day."),
            DigestConfig::default(),
            &input,
            Some(&output),
            &Formatter::new(false),
        )
        .unwrap();

        assert_eq!(report.output_path, output);
        assert!(fs::read_to_string(&output).unwrap().contains("A focused day."));
    }

    #[test]
    fn test_empty_export_is_an_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.json");
        fs::write(&input, r#"{"date": "2025-01-19", "pages": []}"#).unwrap();

        let result = execute_digest(
            MockProvider::default(),
            DigestConfig::default(),
            &input,
            Some(&dir.path().join("digest.md")),
            &Formatter::new(false),
        );

        match result {
            Err(CliError::NothingToSummarize(reason)) => {
                assert_eq!(reason, NothingToSummarize::NoPages)
            }
            other => panic!("Expected NothingToSummarize, got {:?}", other),
        }
    }
}
