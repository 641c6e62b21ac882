use chrono::{Datelike, NaiveDate};
use sha2::{Digest, Sha256};

use super::error::EngineError;

/// Gapless document number sequence.
///
/// Produces numbers in the form `{prefix}{series-}{year}-{sequential}`,
/// e.g. "FA-2025-001" or "FT A-2025-001" when a series is set. Several
/// jurisdictions require gapless, auditable sequences (and some require a
/// per-series counter or a yearly reset); this struct tracks the last issued
/// number and never skips.
///
/// When `chained` is enabled (PT-style tamper evidence), each issued number
/// also yields a SHA-256 link over `prev_hash + number`, so any later
/// alteration of an issued number breaks every subsequent link.
#[derive(Debug, Clone)]
pub struct NumberSequence {
    prefix: String,
    series: Option<String>,
    year: i32,
    next_number: u64,
    zero_pad: usize,
    chained: bool,
    prev_hash: Option<String>,
}

/// A number issued by a chained sequence, with its chain link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedNumber {
    pub number: String,
    /// Hex SHA-256 over the previous link and this number. `None` when the
    /// sequence is not chained.
    pub hash: Option<String>,
}

impl NumberSequence {
    /// Create a new sequence starting at 1.
    pub fn new(prefix: impl Into<String>, year: i32) -> Self {
        Self {
            prefix: prefix.into(),
            series: None,
            year,
            next_number: 1,
            zero_pad: 3,
            chained: false,
            prev_hash: None,
        }
    }

    /// Create a sequence continuing from a given counter value.
    pub fn starting_at(prefix: impl Into<String>, year: i32, next_number: u64) -> Self {
        Self {
            next_number,
            ..Self::new(prefix, year)
        }
    }

    /// Add a series segment (e.g. Portuguese/Spanish invoice series).
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    /// Set zero-padding width (default: 3, so "001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    /// Enable SHA-256 hash chaining, seeding from the last persisted link
    /// (or `None` for a fresh chain).
    pub fn with_chaining(mut self, prev_hash: Option<String>) -> Self {
        self.chained = true;
        self.prev_hash = prev_hash;
        self
    }

    fn format(&self, num: u64) -> String {
        match &self.series {
            Some(series) => format!(
                "{}{}-{}-{:0>width$}",
                self.prefix,
                series,
                self.year,
                num,
                width = self.zero_pad
            ),
            None => format!(
                "{}{}-{:0>width$}",
                self.prefix,
                self.year,
                num,
                width = self.zero_pad
            ),
        }
    }

    /// Issue the next number, advancing the counter (and the chain when enabled).
    pub fn issue(&mut self) -> IssuedNumber {
        let number = self.format(self.next_number);
        self.next_number += 1;

        let hash = if self.chained {
            let mut hasher = Sha256::new();
            if let Some(prev) = &self.prev_hash {
                hasher.update(prev.as_bytes());
            }
            hasher.update(number.as_bytes());
            let link = format!("{:x}", hasher.finalize());
            self.prev_hash = Some(link.clone());
            Some(link)
        } else {
            None
        };

        IssuedNumber { number, hash }
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> String {
        self.format(self.next_number)
    }

    /// Current year of the sequence.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The last chain link, when chaining is enabled.
    pub fn chain_head(&self) -> Option<&str> {
        self.prev_hash.as_deref()
    }

    /// Advance to a new year, resetting the counter to 1. The chain, when
    /// enabled, continues across years.
    pub fn advance_year(&mut self, new_year: i32) -> Result<(), EngineError> {
        if new_year <= self.year {
            return Err(EngineError::Numbering(format!(
                "new year {new_year} must be greater than current year {}",
                self.year
            )));
        }
        self.year = new_year;
        self.next_number = 1;
        Ok(())
    }

    /// Auto-advance year if the given date is in a new year.
    /// Returns true if the year was advanced.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        let date_year = date.year();
        if date_year > self.year {
            self.year = date_year;
            self.next_number = 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_numbering() {
        let mut seq = NumberSequence::new("FA-", 2025);
        assert_eq!(seq.issue().number, "FA-2025-001");
        assert_eq!(seq.issue().number, "FA-2025-002");
        assert_eq!(seq.issue().number, "FA-2025-003");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = NumberSequence::new("FA-", 2025);
        assert_eq!(seq.peek(), "FA-2025-001");
        assert_eq!(seq.peek(), "FA-2025-001");
        assert_eq!(seq.issue().number, "FA-2025-001");
        assert_eq!(seq.peek(), "FA-2025-002");
    }

    #[test]
    fn series_segment() {
        let mut seq = NumberSequence::new("FT ", 2025).with_series("A");
        assert_eq!(seq.issue().number, "FT A-2025-001");
    }

    #[test]
    fn year_advance_resets_counter() {
        let mut seq = NumberSequence::new("FA-", 2025);
        seq.issue();
        seq.issue();
        seq.advance_year(2026).unwrap();
        assert_eq!(seq.issue().number, "FA-2026-001");
    }

    #[test]
    fn year_advance_rejects_past() {
        let mut seq = NumberSequence::new("FA-", 2025);
        assert!(seq.advance_year(2024).is_err());
        assert!(seq.advance_year(2025).is_err());
    }

    #[test]
    fn auto_advance_year() {
        let mut seq = NumberSequence::new("FA-", 2025);
        seq.issue();
        let jan = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(seq.auto_advance(jan));
        assert_eq!(seq.issue().number, "FA-2026-001");
        let feb = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert!(!seq.auto_advance(feb));
    }

    #[test]
    fn chain_is_deterministic() {
        let mut a = NumberSequence::new("FT-", 2025).with_chaining(None);
        let mut b = NumberSequence::new("FT-", 2025).with_chaining(None);
        let ia = a.issue();
        let ib = b.issue();
        assert_eq!(ia.hash, ib.hash);
        assert!(ia.hash.is_some());
    }

    #[test]
    fn chain_links_depend_on_history() {
        let mut seq = NumberSequence::new("FT-", 2025).with_chaining(None);
        let first = seq.issue();
        let second = seq.issue();
        assert_ne!(first.hash, second.hash);

        // Same second number on a different starting link yields a different hash.
        let mut forged = NumberSequence::starting_at("FT-", 2025, 2)
            .with_chaining(Some("deadbeef".to_string()));
        let forged_second = forged.issue();
        assert_eq!(forged_second.number, second.number);
        assert_ne!(forged_second.hash, second.hash);
    }

    #[test]
    fn unchained_sequence_has_no_hash() {
        let mut seq = NumberSequence::new("FA-", 2025);
        assert!(seq.issue().hash.is_none());
        assert!(seq.chain_head().is_none());
    }
}
