//! Reporting periods and period range selection

use crate::error::{CoreError, CoreResult};
use crate::models::LedgerEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive range of reporting periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl PeriodRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Range covering the last `count` of `periods` (all of them when fewer)
    pub fn trailing(periods: &[NaiveDate], count: usize) -> Option<Self> {
        let to = *periods.last()?;
        let start = periods.len().saturating_sub(count.max(1));
        Some(Self::new(periods[start], to))
    }

    /// Check if a period is within the range
    pub fn contains(&self, period: &NaiveDate) -> bool {
        self.from <= *period && *period <= self.to
    }

    /// A reversed range selects nothing
    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    /// The periods of `periods` falling inside the range, in input order
    pub fn select(&self, periods: &[NaiveDate]) -> Vec<NaiveDate> {
        periods.iter().copied().filter(|p| self.contains(p)).collect()
    }

    /// Both ends must be periods the ledger actually has
    pub fn validate_against(&self, periods: &[NaiveDate]) -> CoreResult<()> {
        for (end, date) in [("start", self.from), ("end", self.to)] {
            if !periods.contains(&date) {
                return Err(CoreError::InvalidPeriodRange {
                    from: self.from.to_string(),
                    to: self.to.to_string(),
                    reason: format!("{} period {} is not in the ledger", end, date),
                });
            }
        }
        Ok(())
    }

    /// Human-readable description, e.g. "January 2024 to June 2024"
    pub fn description(&self) -> String {
        format!("{} to {}", self.from.format("%B %Y"), self.to.format("%B %Y"))
    }
}

/// Distinct periods of the ledger, in chronological order
pub fn available_periods(entries: &[LedgerEntry]) -> Vec<NaiveDate> {
    entries
        .iter()
        .map(|e| e.period)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
