//! Result types for loading and digest runs

use digest_domain::{BrowsingRecord, DigestStats};
use std::path::PathBuf;

/// What the loader did to repair a malformed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairReport {
    /// Byte-identical copy of the input taken before repair
    pub backup_path: PathBuf,

    /// Path the repaired JSON was written to, if the input was rewritten
    pub rewritten_path: Option<PathBuf>,
}

/// A validated record plus how it was obtained
#[derive(Debug, Clone)]
pub struct LoadedRecord {
    /// The validated browsing record
    pub record: BrowsingRecord,

    /// Present when the input needed repair
    pub repair: Option<RepairReport>,
}

/// Why a run stopped without producing a digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NothingToSummarize {
    /// The export lists no pages
    NoPages,
    /// Not even the first page fits in the token budget
    EmptyContent,
}

/// Details of a written digest
#[derive(Debug, Clone)]
pub struct DigestReport {
    /// Markdown file written
    pub output_path: PathBuf,

    /// Date string of the export
    pub date: String,

    /// Statistics embedded in the document
    pub stats: DigestStats,

    /// Pages that made it into the prompt
    pub included_pages: usize,

    /// Estimated tokens of the browsing log sent to the model
    pub estimated_tokens: f64,

    /// Generated digest text
    pub digest: String,

    /// Present when the input needed repair
    pub repair: Option<RepairReport>,
}

/// How a pipeline run ended
#[derive(Debug, Clone)]
pub enum DigestOutcome {
    /// A digest document was written
    Written(DigestReport),
    /// There was nothing to summarize; no document was written
    NothingToSummarize(NothingToSummarize),
}
