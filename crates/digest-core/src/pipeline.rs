//! The digest pipeline: check backend, load, budget, generate, write

use crate::budget::ContentBudgeter;
use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::loader::Loader;
use crate::progress::{NoopObserver, ProgressEvent, ProgressObserver};
use crate::prompt::{DigestPrompt, SYSTEM_INSTRUCTION};
use crate::types::{DigestOutcome, DigestReport, LoadedRecord, NothingToSummarize};
use crate::writer::{default_output_path, DocumentWriter};
use digest_domain::{DigestStats, LlmProvider};
use digest_llm::LlmError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Runs one browsing export through to a written digest
pub struct DigestPipeline<L>
where
    L: LlmProvider<Error = LlmError>,
{
    provider: L,
    config: DigestConfig,
    observer: Box<dyn ProgressObserver>,
}

impl<L> DigestPipeline<L>
where
    L: LlmProvider<Error = LlmError>,
{
    /// Create a pipeline over `provider`
    pub fn new(provider: L, config: DigestConfig) -> Self {
        Self {
            provider,
            config,
            observer: Box::new(NoopObserver),
        }
    }

    /// Receive progress events during runs
    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The generation backend
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Pipeline configuration
    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// Probe the backend and make sure the configured model is usable
    pub fn check_backend(&self) -> Result<(), DigestError> {
        let backend = self.provider.name().to_string();
        self.emit(ProgressEvent::CheckingBackend {
            backend: backend.clone(),
        });

        self.provider.check_available().map_err(|e| {
            warn!("{} is not available: {}", backend, e);
            DigestError::unavailable(&e)
        })?;
        self.provider.prepare().map_err(|e| {
            warn!("Could not prepare model {}: {}", self.provider.model(), e);
            DigestError::unavailable(&e)
        })?;

        info!("{} is ready with model {}", backend, self.provider.model());
        self.emit(ProgressEvent::BackendReady {
            backend,
            model: self.provider.model().to_string(),
        });
        Ok(())
    }

    /// Produce a digest for `input`, writing it to `output` or the default path
    pub fn run(
        &self,
        input: impl AsRef<Path>,
        output: Option<&Path>,
    ) -> Result<DigestOutcome, DigestError> {
        let input = input.as_ref();
        self.config.validate().map_err(DigestError::Config)?;

        self.check_backend()?;

        self.emit(ProgressEvent::loading(input));
        let loaded = Loader::new(self.config.repair_mode).load(input)?;
        if let Some(report) = &loaded.repair {
            self.emit(ProgressEvent::Repaired(report.clone()));
        }

        self.summarize(loaded, output)
    }

    /// Budget, generate and write a digest for an already loaded record
    pub fn summarize(
        &self,
        loaded: LoadedRecord,
        output: Option<&Path>,
    ) -> Result<DigestOutcome, DigestError> {
        let LoadedRecord { record, repair } = loaded;

        if record.is_empty() {
            info!("No browsing data found for {}", record.date);
            return Ok(DigestOutcome::NothingToSummarize(NothingToSummarize::NoPages));
        }

        let stats = DigestStats::from_record(&record);
        self.emit(ProgressEvent::Loaded {
            date: record.date.clone(),
            page_count: stats.page_count,
            reading_time_minutes: stats.total_reading_time_minutes,
        });

        let content = ContentBudgeter::new(self.config.max_tokens).budget_detailed(&record);
        debug!(
            "Browsing log: {} of {} pages, ~{} tokens",
            content.included, content.total, content.estimated_tokens
        );
        self.emit(ProgressEvent::Budgeted {
            included: content.included,
            total: content.total,
            estimated_tokens: content.estimated_tokens,
        });

        if content.is_empty() {
            info!(
                "No page fits in the {}-token budget",
                self.config.max_tokens
            );
            return Ok(DigestOutcome::NothingToSummarize(
                NothingToSummarize::EmptyContent,
            ));
        }

        let prompt = DigestPrompt::new(&record.date, &content.text).build();
        let options = self
            .config
            .generation_options()
            .with_system_prompt(SYSTEM_INSTRUCTION);

        self.emit(ProgressEvent::Generating {
            backend: self.provider.name().to_string(),
            model: self.provider.model().to_string(),
        });
        info!(
            "Generating digest with {} ({} prompt characters)",
            self.provider.model(),
            prompt.len()
        );

        let digest = self.provider.complete(&prompt, &options).map_err(|e| {
            warn!("Generation failed: {}", e);
            DigestError::generation(&e)
        })?;
        if digest.trim().is_empty() {
            return Err(DigestError::generation(&LlmError::EmptyResponse));
        }

        let output_path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_path(&record.date));
        self.write(&digest, &output_path, &record.date, &stats)?;

        Ok(DigestOutcome::Written(DigestReport {
            output_path,
            date: record.date,
            stats,
            included_pages: content.included,
            estimated_tokens: content.estimated_tokens,
            digest,
            repair,
        }))
    }

    fn write(
        &self,
        digest: &str,
        path: &Path,
        date: &str,
        stats: &DigestStats,
    ) -> Result<(), DigestError> {
        self.emit(ProgressEvent::Saving {
            path: path.to_path_buf(),
        });
        DocumentWriter::new(self.provider.name()).write(digest, path, date, stats)?;
        self.emit(ProgressEvent::Saved {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn emit(&self, event: ProgressEvent) {
        self.observer.on_event(&event);
    }
}
