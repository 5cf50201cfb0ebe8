//! Browsing record model
//!
//! A [`BrowsingRecord`] is built once per run from a validated export file
//! and then handed by value to the content budgeter.

/// Placeholder title for pages exported without one
pub const UNTITLED: &str = "Untitled";

/// Placeholder domain for pages exported without one
pub const UNKNOWN_DOMAIN: &str = "Unknown";

/// One visited page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageEntry {
    /// Page title
    pub title: Option<String>,

    /// Domain the page was served from (e.g., "docs.rs")
    pub domain: Option<String>,

    /// Extracted page text
    pub content: Option<String>,

    /// Visit time, expected to be ISO-8601-like (e.g., "2025-01-19T09:00:00Z")
    pub timestamp: Option<String>,

    /// Estimated reading time in minutes
    pub reading_time: Option<f64>,
}

impl PageEntry {
    /// Create an empty page entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the page content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the visit timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Set the reading time in minutes
    pub fn with_reading_time(mut self, minutes: f64) -> Self {
        self.reading_time = Some(minutes);
        self
    }

    /// Title, or [`UNTITLED`] when absent
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Domain, or [`UNKNOWN_DOMAIN`] when absent
    pub fn display_domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(UNKNOWN_DOMAIN)
    }

    /// Key used to order pages: the raw timestamp, or "" when absent
    pub fn sort_key(&self) -> &str {
        self.timestamp.as_deref().unwrap_or("")
    }
}

/// A validated day of browsing activity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowsingRecord {
    /// Free-form date string of the export (not parsed)
    pub date: String,

    /// Visited pages in export order
    pub pages: Vec<PageEntry>,

    /// Page count reported by the exporter, if any
    pub total_pages: Option<u64>,
}

impl BrowsingRecord {
    /// Create a record for the given date
    pub fn new(date: impl Into<String>, pages: Vec<PageEntry>) -> Self {
        Self {
            date: date.into(),
            pages,
            total_pages: None,
        }
    }

    /// Set the exporter-reported page count
    pub fn with_total_pages(mut self, total: u64) -> Self {
        self.total_pages = Some(total);
        self
    }

    /// Reported page count, falling back to the number of pages present
    pub fn page_count(&self) -> usize {
        self.total_pages
            .map(|total| total as usize)
            .unwrap_or(self.pages.len())
    }

    /// Sum of all reading times; missing values count as zero
    pub fn total_reading_time(&self) -> f64 {
        self.pages
            .iter()
            .map(|page| page.reading_time.unwrap_or(0.0))
            .sum()
    }

    /// True when there is nothing to summarize
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
