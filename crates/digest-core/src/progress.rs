//! Progress reporting for pipeline runs
//!
//! The pipeline never prints. Front ends that want to show progress pass a
//! [`ProgressObserver`]; any `Fn(&ProgressEvent)` closure works.

use crate::types::RepairReport;
use std::path::{Path, PathBuf};

/// A step the pipeline has reached
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// About to probe the generation backend
    CheckingBackend {
        /// Backend label
        backend: String,
    },
    /// Backend answered its availability probe and is ready
    BackendReady {
        /// Backend label
        backend: String,
        /// Model that will be used
        model: String,
    },
    /// About to read the input file
    Loading {
        /// Input path
        path: PathBuf,
    },
    /// The input was malformed and has been repaired
    Repaired(RepairReport),
    /// The input was validated
    Loaded {
        /// Export date
        date: String,
        /// Page count the export reports
        page_count: usize,
        /// Summed reading time in minutes
        reading_time_minutes: f64,
    },
    /// The browsing log was assembled
    Budgeted {
        /// Pages that fit the budget
        included: usize,
        /// Pages in the record
        total: usize,
        /// Estimated tokens of the log
        estimated_tokens: f64,
    },
    /// Generation has started
    Generating {
        /// Backend label
        backend: String,
        /// Model in use
        model: String,
    },
    /// About to write the document
    Saving {
        /// Destination path
        path: PathBuf,
    },
    /// The document was written
    Saved {
        /// Destination path
        path: PathBuf,
    },
}

impl ProgressEvent {
    pub(crate) fn loading(path: &Path) -> Self {
        ProgressEvent::Loading {
            path: path.to_path_buf(),
        }
    }
}

/// Receives progress events from a pipeline run
pub trait ProgressObserver {
    /// Called once per event, in pipeline order
    fn on_event(&self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent),
{
    fn on_event(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closure_observer_receives_events() {
        let seen = RefCell::new(Vec::new());
        let observer = |event: &ProgressEvent| seen.borrow_mut().push(event.clone());

        observer.on_event(&ProgressEvent::loading(Path::new("a.json")));
        observer.on_event(&ProgressEvent::Saved {
            path: PathBuf::from("digest.md"),
        });

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0],
            ProgressEvent::Loading {
                path: PathBuf::from("a.json")
            }
        );
    }

    #[test]
    fn test_noop_observer() {
        NoopObserver.on_event(&ProgressEvent::CheckingBackend {
            backend: "Ollama".to_string(),
        });
    }
}
