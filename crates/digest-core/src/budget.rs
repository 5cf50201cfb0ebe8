//! Token-bounded browsing log
//!
//! Pages are ordered by their raw timestamp, rendered to a fixed template and
//! taken greedily from the front until the next one would overflow the
//! budget. Nothing after the first overflowing page is considered.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use digest_domain::{BrowsingRecord, PageEntry};
use tracing::debug;

/// Default token budget for the browsing log
pub const DEFAULT_MAX_TOKENS: usize = 4000;

/// Characters of page content kept per page
pub const MAX_CONTENT_CHARS: usize = 1000;

/// Rough token cost of one character (4 characters per token)
pub const TOKENS_PER_CHAR: f64 = 0.25;

/// Shown for pages whose timestamp is missing or unparsable
pub const UNKNOWN_TIME: &str = "Unknown time";

/// Estimates the token cost of rendered text
pub type TokenEstimator = fn(&str) -> f64;

/// Default estimator: a quarter token per character
pub fn estimate_tokens(text: &str) -> f64 {
    text.chars().count() as f64 * TOKENS_PER_CHAR
}

/// Browsing log selected for the prompt
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetedContent {
    /// Rendered pages joined by newlines; empty when nothing fits
    pub text: String,

    /// Number of pages included
    pub included: usize,

    /// Number of pages in the record
    pub total: usize,

    /// Estimated token cost of the included pages
    pub estimated_tokens: f64,
}

impl BudgetedContent {
    /// True when no page made it into the log
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Pages cut off by the budget
    pub fn excluded(&self) -> usize {
        self.total - self.included
    }
}

/// Selects and renders pages within a token budget
#[derive(Debug, Clone, Copy)]
pub struct ContentBudgeter {
    max_tokens: usize,
    estimator: TokenEstimator,
}

impl ContentBudgeter {
    /// Create a budgeter with the default estimator
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            estimator: estimate_tokens,
        }
    }

    /// Replace the token estimator
    pub fn with_estimator(mut self, estimator: TokenEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Rendered browsing log; empty when there are no pages or none fit
    pub fn budget(&self, record: &BrowsingRecord) -> String {
        self.budget_detailed(record).text
    }

    /// Rendered browsing log with selection details
    pub fn budget_detailed(&self, record: &BrowsingRecord) -> BudgetedContent {
        let total = record.pages.len();

        let mut pages: Vec<&PageEntry> = record.pages.iter().collect();
        pages.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));

        let budget = self.max_tokens as f64;
        let mut parts = Vec::new();
        let mut estimated_tokens = 0.0;

        for page in pages {
            let rendered = render_page(page);
            let cost = (self.estimator)(&rendered);
            if estimated_tokens + cost > budget {
                debug!(
                    "Budget of {} tokens reached after {} of {} pages",
                    self.max_tokens,
                    parts.len(),
                    total
                );
                break;
            }
            parts.push(rendered);
            estimated_tokens += cost;
        }

        BudgetedContent {
            text: parts.join("\n"),
            included: parts.len(),
            total,
            estimated_tokens,
        }
    }
}

impl Default for ContentBudgeter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

/// Render a record's browsing log within `max_tokens`
pub fn budget(record: &BrowsingRecord, max_tokens: usize) -> String {
    ContentBudgeter::new(max_tokens).budget(record)
}

/// Render one page to the browsing-log template
pub fn render_page(page: &PageEntry) -> String {
    format!(
        "\n---\n[{}] {}\nSource: {}\nContent: {}\n",
        display_time(page.timestamp.as_deref()),
        page.display_title(),
        page.display_domain(),
        truncate_chars(page.content.as_deref().unwrap_or(""), MAX_CONTENT_CHARS)
    )
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// `HH:MM` of an ISO-8601 timestamp, or [`UNKNOWN_TIME`]
pub fn display_time(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(parse_clock_time)
        .unwrap_or_else(|| UNKNOWN_TIME.to_string())
}

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Wall-clock time in the timestamp's own offset; a trailing `Z` means UTC
fn parse_clock_time(raw: &str) -> Option<String> {
    let normalized = match raw.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => raw.to_string(),
    };
    let text = normalized.as_str();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.format("%H:%M").to_string());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.format("%H:%M").to_string());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.format("%H:%M").to_string());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|_| "00:00".to_string())
}
