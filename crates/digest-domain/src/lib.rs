//! Browsing Digest Domain Layer
//!
//! This crate contains the model that every other layer of the digest
//! pipeline shares. It has ZERO external dependencies and defines the
//! validated browsing record, the statistics shown in a digest, and the
//! trait boundary towards text generation backends.
//!
//! ## Key Concepts
//!
//! - **BrowsingRecord**: One day of browsing, validated from a JSON export
//! - **PageEntry**: A single visited page with optional metadata
//! - **DigestStats**: Page count and reading time displayed in the digest
//! - **LlmProvider**: Synchronous text completion with a uniform failure signal
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure data and trait definitions only
//! - JSON handling, repair and backends live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod options;
pub mod record;
pub mod stats;
pub mod traits;

// Re-exports for convenience
pub use options::GenerationOptions;
pub use record::{BrowsingRecord, PageEntry, UNKNOWN_DOMAIN, UNTITLED};
pub use stats::DigestStats;
pub use traits::LlmProvider;
