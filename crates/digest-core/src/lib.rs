//! Browsing Digest Core
//!
//! Turns a day's browsing export into a short markdown digest written by a
//! local language model.
//!
//! # Overview
//!
//! Exports produced by the browser extension are sometimes malformed (keys
//! with stray whitespace). The loader repairs those, keeps a `.bak` of the
//! original and validates the schema. The budgeter then renders the day's
//! pages in time order until a token ceiling is reached, and the result is
//! sent to whichever generation backend was configured.
//!
//! # Architecture
//!
//! ```text
//! export.json → Loader → Budgeter → LlmProvider → DocumentWriter → digest-<date>.md
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use digest_core::{DigestConfig, DigestOutcome, DigestPipeline};
//! use digest_llm::MockProvider;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = DigestPipeline::new(MockProvider::new("Today you read..."), DigestConfig::default());
//!
//! match pipeline.run("browsing-digest-2025-01-19.json", None)? {
//!     DigestOutcome::Written(report) => println!("Saved {}", report.output_path.display()),
//!     DigestOutcome::NothingToSummarize(reason) => println!("Nothing to do: {:?}", reason),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod budget;
mod config;
mod error;
pub mod loader;
pub mod normalize;
mod pipeline;
pub mod progress;
pub mod prompt;
mod types;
pub mod writer;

#[cfg(test)]
mod tests;

pub use budget::{BudgetedContent, ContentBudgeter};
pub use config::{DigestConfig, RepairMode};
pub use error::DigestError;
pub use loader::Loader;
pub use pipeline::DigestPipeline;
pub use progress::{NoopObserver, ProgressEvent, ProgressObserver};
pub use prompt::DigestPrompt;
pub use types::{DigestOutcome, DigestReport, LoadedRecord, NothingToSummarize, RepairReport};
pub use writer::DocumentWriter;
