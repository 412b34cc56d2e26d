//! Core data models for the ledger snapshot

use chrono::NaiveDate;
use execportal_loader::{MetricRecord, TrialBalanceRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{classify_account, AccountCategory};

/// Ledger entry: one account's figures for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Month start of the period
    pub period: NaiveDate,
    /// General-ledger account code; the leading digit selects the category
    pub gl_account_code: String,
    /// Account display name
    pub gl_account_description: String,
    pub opening_balance: Decimal,
    pub debit: Decimal,
    pub credit: Decimal,
    /// Cumulative balance at period end
    pub closing_balance: Decimal,
    /// Net movement within the period
    pub activity: Decimal,
}

impl LedgerEntry {
    /// Entry with only the figures the statements read
    pub fn new(
        period: NaiveDate,
        code: &str,
        description: &str,
        activity: Decimal,
        closing_balance: Decimal,
    ) -> Self {
        Self {
            period,
            gl_account_code: code.to_string(),
            gl_account_description: description.to_string(),
            opening_balance: closing_balance - activity,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            closing_balance,
            activity,
        }
    }

    /// Statement category of the entry's account
    pub fn category(&self) -> Option<AccountCategory> {
        classify_account(&self.gl_account_code)
    }
}

impl From<TrialBalanceRecord> for LedgerEntry {
    fn from(record: TrialBalanceRecord) -> Self {
        Self {
            period: record.period,
            gl_account_code: record.gl_account_code,
            gl_account_description: record.gl_account_description,
            opening_balance: record.opening_balance,
            debit: record.debit,
            credit: record.credit,
            closing_balance: record.closing_balance,
            activity: record.activity,
        }
    }
}

/// A named metric's value for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricObservation {
    pub period: NaiveDate,
    /// Metric name as written in the source, e.g. "Gross Profit Ratio"
    pub metric: String,
    pub value: Decimal,
}

impl From<MetricRecord> for MetricObservation {
    fn from(record: MetricRecord) -> Self {
        Self {
            period: record.period,
            metric: record.metric,
            value: record.value,
        }
    }
}
