//! Markdown digest documents

use crate::error::DigestError;
use chrono::{Local, NaiveDateTime};
use digest_domain::DigestStats;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Renders and writes digest documents
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    backend_label: String,
}

impl DocumentWriter {
    /// Create a writer whose footer names `backend_label`
    pub fn new(backend_label: impl Into<String>) -> Self {
        Self {
            backend_label: backend_label.into(),
        }
    }

    /// Render the document; the digest text is embedded verbatim
    pub fn render(
        &self,
        digest: &str,
        date: &str,
        stats: &DigestStats,
        generated_at: NaiveDateTime,
    ) -> String {
        format!(
            "# 📚 Browsing Digest - {date}\n\
             \n\
             **Generated**: {generated}\n\
             **Pages analyzed**: {pages}\n\
             **Estimated reading time**: {minutes} minutes\n\
             \n\
             ---\n\
             \n\
             {digest}\n\
             \n\
             ---\n\
             \n\
             *Generated locally using {backend}. No data left your machine.*\n",
            date = date,
            generated = generated_at.format("%Y-%m-%d %H:%M"),
            pages = stats.page_count,
            minutes = stats.reading_time_display(),
            digest = digest,
            backend = self.backend_label,
        )
    }

    /// Write the document to `path`, stamped with the current local time
    pub fn write(
        &self,
        digest: &str,
        path: &Path,
        date: &str,
        stats: &DigestStats,
    ) -> Result<(), DigestError> {
        let document = self.render(digest, date, stats, Local::now().naive_local());
        fs::write(path, document).map_err(|source| DigestError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Digest saved to {}", path.display());
        Ok(())
    }
}

/// `digest-<date>.md` with the date made filename-safe
pub fn default_output_path(date: &str) -> PathBuf {
    PathBuf::from(format!("digest-{}.md", sanitize_date(date)))
}

/// Replace every character that is not alphanumeric, `-` or `_` with `-`
pub fn sanitize_date(date: &str) -> String {
    date.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
