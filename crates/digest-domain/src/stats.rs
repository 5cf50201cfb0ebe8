//! Statistics embedded in a written digest

use crate::BrowsingRecord;
use std::fmt;

/// Page count and reading time shown in the digest header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigestStats {
    /// Number of pages the export reports
    pub page_count: usize,

    /// Summed reading time across all pages, in minutes
    pub total_reading_time_minutes: f64,
}

impl DigestStats {
    /// Derive statistics from a validated record
    pub fn from_record(record: &BrowsingRecord) -> Self {
        Self {
            page_count: record.page_count(),
            total_reading_time_minutes: record.total_reading_time(),
        }
    }

    /// Reading time for display: whole minutes without a fractional part
    pub fn reading_time_display(&self) -> ReadingTime {
        ReadingTime(self.total_reading_time_minutes)
    }
}

/// Display wrapper for a reading time in minutes
#[derive(Debug, Clone, Copy)]
pub struct ReadingTime(f64);

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PageEntry;

    #[test]
    fn test_whole_minutes_have_no_fraction() {
        let record = BrowsingRecord::new(
            "2025-01-19",
            vec![
                PageEntry::new().with_reading_time(5.0),
                PageEntry::new().with_reading_time(7.0),
            ],
        );
        let stats = DigestStats::from_record(&record);
        assert_eq!(stats.page_count, 2);
        assert_eq!(stats.reading_time_display().to_string(), "12");
    }

    #[test]
    fn test_fractional_minutes() {
        let stats = DigestStats {
            page_count: 1,
            total_reading_time_minutes: 7.5,
        };
        assert_eq!(stats.reading_time_display().to_string(), "7.5");
    }
}
