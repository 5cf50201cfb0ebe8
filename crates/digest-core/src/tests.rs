//! Pipeline tests against the mock backend

#[cfg(test)]
mod tests {
    use crate::{
        DigestConfig, DigestError, DigestOutcome, DigestPipeline, NothingToSummarize,
        ProgressEvent, RepairMode,
    };
    use digest_domain::LlmProvider;
    use digest_llm::MockProvider;
    use serde_json::json;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn write_export(dir: &TempDir, name: &str, value: &serde_json::Value) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
        path
    }

    fn two_page_export() -> serde_json::Value {
        json!({
            "date": "2025-01-19",
            "totalPages": 2,
            "pages": [
                {
                    "title": "Afternoon read",
                    "domain": "blog.example.com",
                    "content": "Notes on async runtimes",
                    "timestamp": "2025-01-19T15:30:00Z",
                    "readingTime": 6
                },
                {
                    "title": "Morning read",
                    "domain": "news.example.com",
                    "content": "Compiler release notes",
                    "timestamp": "2025-01-19T08:15:00Z",
                    "readingTime": 4
                }
            ]
        })
    }

    fn recording_observer() -> (Arc<Mutex<Vec<ProgressEvent>>>, impl Fn(&ProgressEvent)) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        (events, move |event: &ProgressEvent| {
            sink.lock().unwrap().push(event.clone())
        })
    }

    fn written(outcome: DigestOutcome) -> crate::DigestReport {
        match outcome {
            DigestOutcome::Written(report) => report,
            other => panic!("Expected a written digest, got {:?}", other),
        }
    }

    #[test]
    fn test_end_to_end_two_pages() {
        let dir = TempDir::new().unwrap();
        let input = write_export(&dir, "export.json", &two_page_export());
        let output = dir.path().join("digest.md");

        let pipeline = DigestPipeline::new(
            MockProvider::new("You spent the day on Rust."),
            DigestConfig::default(),
        );
        let report = written(pipeline.run(&input, Some(&output)).unwrap());

        assert_eq!(report.output_path, output);
        assert_eq!(report.included_pages, 2);
        assert_eq!(report.stats.page_count, 2);
        assert_eq!(report.stats.total_reading_time_minutes, 10.0);
        assert!(report.repair.is_none());

        let document = fs::read_to_string(&output).unwrap();
        assert!(document.contains("2025-01-19"));
        assert!(document.contains("You spent the day on Rust."));
        assert!(document.contains("**Pages analyzed**: 2"));
        assert!(document.contains("**Estimated reading time**: 10 minutes"));
        assert!(document.contains("*Generated locally using mock provider."));

        let prompt = pipeline.provider().last_prompt().unwrap();
        let morning = prompt
            .find("[08:15] Morning read\nSource: news.example.com\nContent: Compiler release notes")
            .unwrap();
        let afternoon = prompt
            .find("[15:30] Afternoon read\nSource: blog.example.com\nContent: Notes on async runtimes")
            .unwrap();
        assert!(morning < afternoon);
        assert!(prompt.contains("I visited on 2025-01-19"));
    }

    #[test]
    fn test_generation_options_carry_system_instruction() {
        let dir = TempDir::new().unwrap();
        let input = write_export(&dir, "export.json", &two_page_export());
        let config = DigestConfig {
            temperature: 0.2,
            completion_tokens: 500,
            ..Default::default()
        };

        let pipeline = DigestPipeline::new(MockProvider::new("digest"), config);
        pipeline
            .run(&input, Some(&dir.path().join("out.md")))
            .unwrap();

        let options = pipeline.provider().last_options().unwrap();
        assert_eq!(options.temperature, 0.2);
        assert_eq!(options.max_tokens, 500);
        assert_eq!(
            options.system_prompt.as_deref(),
            Some(crate::prompt::SYSTEM_INSTRUCTION)
        );
    }

    #[test]
    fn test_progress_events_in_order() {
        let dir = TempDir::new().unwrap();
        let input = write_export(&dir, "export.json", &two_page_export());
        let output = dir.path().join("out.md");
        let (events, observer) = recording_observer();

        DigestPipeline::new(MockProvider::new("digest"), DigestConfig::default())
            .with_observer(observer)
            .run(&input, Some(&output))
            .unwrap();

        let kinds: Vec<&'static str> = events
            .lock()
            .unwrap()
            .iter()
            .map(|event| match event {
                ProgressEvent::CheckingBackend { .. } => "checking",
                ProgressEvent::BackendReady { .. } => "ready",
                ProgressEvent::Loading { .. } => "loading",
                ProgressEvent::Repaired(_) => "repaired",
                ProgressEvent::Loaded { .. } => "loaded",
                ProgressEvent::Budgeted { .. } => "budgeted",
                ProgressEvent::Generating { .. } => "generating",
                ProgressEvent::Saving { .. } => "saving",
                ProgressEvent::Saved { .. } => "saved",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "checking",
                "ready",
                "loading",
                "loaded",
                "budgeted",
                "generating",
                "saving",
                "saved"
            ]
        );
    }

    #[test]
    fn test_unavailable_backend_stops_before_loading() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.md");
        let provider = MockProvider::new("digest").unavailable();

        let pipeline = DigestPipeline::new(provider, DigestConfig::default());
        let result = pipeline.run(dir.path().join("missing.json"), Some(&output));

        assert!(matches!(result, Err(DigestError::BackendUnavailable(_))));
        assert_eq!(pipeline.provider().call_count(), 0);
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let dir = TempDir::new().unwrap();
        let pipeline = DigestPipeline::new(MockProvider::default(), DigestConfig::default());
        let result = pipeline.run(dir.path().join("missing.json"), None);
        assert!(matches!(result, Err(DigestError::NotFound { .. })));
    }

    #[test]
    fn test_no_pages_is_nothing_to_summarize() {
        let dir = TempDir::new().unwrap();
        let input = write_export(&dir, "empty.json", &json!({"date": "2025-01-19", "pages": []}));
        let output = dir.path().join("out.md");
        let (events, observer) = recording_observer();

        let pipeline = DigestPipeline::new(MockProvider::default(), DigestConfig::default())
            .with_observer(observer);
        let outcome = pipeline.run(&input, Some(&output)).unwrap();

        assert!(matches!(
            outcome,
            DigestOutcome::NothingToSummarize(NothingToSummarize::NoPages)
        ));
        assert_eq!(pipeline.provider().call_count(), 0);
        assert!(!output.exists());

        // Nothing is reported past loading for an empty export
        let events = events.lock().unwrap();
        assert!(matches!(events.last(), Some(ProgressEvent::Loading { .. })));
        assert!(!events
            .iter()
            .any(|event| matches!(event, ProgressEvent::Loaded { .. })));
    }

    #[test]
    fn test_tiny_budget_is_nothing_to_summarize() {
        let dir = TempDir::new().unwrap();
        let input = write_export(&dir, "export.json", &two_page_export());
        let output = dir.path().join("out.md");
        let config = DigestConfig {
            max_tokens: 10,
            ..Default::default()
        };

        let pipeline = DigestPipeline::new(MockProvider::default(), config);
        let outcome = pipeline.run(&input, Some(&output)).unwrap();

        assert!(matches!(
            outcome,
            DigestOutcome::NothingToSummarize(NothingToSummarize::EmptyContent)
        ));
        assert_eq!(pipeline.provider().call_count(), 0);
        assert!(!output.exists());
    }

    #[test]
    fn test_generation_error_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_export(&dir, "export.json", &two_page_export());
        let output = dir.path().join("out.md");

        // Learn the exact prompt first, then make that prompt fail
        let probe = DigestPipeline::new(MockProvider::default(), DigestConfig::default());
        probe.run(&input, Some(&dir.path().join("probe.md"))).unwrap();
        let prompt = probe.provider().last_prompt().unwrap();

        let mut provider = MockProvider::default();
        provider.add_error(prompt);
        let pipeline = DigestPipeline::new(provider, DigestConfig::default());
        let result = pipeline.run(&input, Some(&output));

        match result {
            Err(DigestError::Generation {
                timeout_or_connection,
                ..
            }) => assert!(!timeout_or_connection),
            other => panic!("Expected Generation error, got {:?}", other),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_blank_completion_is_generation_error() {
        let dir = TempDir::new().unwrap();
        let input = write_export(&dir, "export.json", &two_page_export());
        let output = dir.path().join("out.md");

        let pipeline = DigestPipeline::new(MockProvider::new("  \n "), DigestConfig::default());
        let result = pipeline.run(&input, Some(&output));

        assert!(matches!(result, Err(DigestError::Generation { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_malformed_export_is_repaired_in_place() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.json");
        let raw = r#"{"date ": "2025-01-19", " pages": [{"title ": " Padded ", "timestamp": "2025-01-19T10:00:00Z"}]}"#;
        fs::write(&input, raw).unwrap();
        let (events, observer) = recording_observer();

        let pipeline = DigestPipeline::new(MockProvider::new("digest"), DigestConfig::default())
            .with_observer(observer);
        let report = written(
            pipeline
                .run(&input, Some(&dir.path().join("out.md")))
                .unwrap(),
        );

        let repair = report.repair.unwrap();
        assert_eq!(fs::read_to_string(&repair.backup_path).unwrap(), raw);
        assert_eq!(repair.rewritten_path.as_deref(), Some(input.as_path()));
        assert!(pipeline
            .provider()
            .last_prompt()
            .unwrap()
            .contains("[10:00] Padded\n"));
        assert!(events
            .lock()
            .unwrap()
            .iter()
            .any(|event| matches!(event, ProgressEvent::Repaired(_))));
    }

    #[test]
    fn test_in_memory_repair_leaves_input_untouched() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.json");
        let raw = r#"{"date ": "2025-01-19", "pages": [{"title": "A"}]}"#;
        fs::write(&input, raw).unwrap();
        let config = DigestConfig {
            repair_mode: RepairMode::InMemory,
            ..Default::default()
        };

        let report = written(
            DigestPipeline::new(MockProvider::new("digest"), config)
                .run(&input, Some(&dir.path().join("out.md")))
                .unwrap(),
        );

        assert_eq!(fs::read_to_string(&input).unwrap(), raw);
        let repair = report.repair.unwrap();
        assert!(repair.rewritten_path.is_none());
        assert!(Path::new(&repair.backup_path).exists());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DigestConfig {
            max_tokens: 0,
            ..Default::default()
        };
        let pipeline = DigestPipeline::new(MockProvider::default(), config);
        let result = pipeline.run("whatever.json", None);
        assert!(matches!(result, Err(DigestError::Config(_))));
        assert_eq!(pipeline.provider().call_count(), 0);
    }

    #[test]
    fn test_check_backend_reports_model() {
        let provider = MockProvider::default().with_models(vec!["llama3.2".to_string()]);
        let (events, observer) = recording_observer();
        let pipeline =
            DigestPipeline::new(provider, DigestConfig::default()).with_observer(observer);

        pipeline.check_backend().unwrap();

        assert_eq!(pipeline.provider().model(), "llama3.2");
        assert!(events.lock().unwrap().contains(&ProgressEvent::BackendReady {
            backend: "mock provider".to_string(),
            model: "llama3.2".to_string(),
        }));
    }
}
