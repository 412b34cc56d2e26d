//! Typed records produced by the loader

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trial balance line: an account's movement and balances for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRecord {
    /// Month start of the reporting period
    pub period: NaiveDate,
    pub gl_account_code: String,
    pub gl_account_description: String,
    pub opening_balance: Decimal,
    pub debit: Decimal,
    pub credit: Decimal,
    pub closing_balance: Decimal,
    /// Net movement for the period
    pub activity: Decimal,
}

/// One observation of a named performance metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub period: NaiveDate,
    pub metric: String,
    pub value: Decimal,
}

/// Column names required in the trial balance CSV
pub const TRIAL_BALANCE_COLUMNS: [&str; 8] = [
    "period",
    "gl_account_code",
    "gl_account_description",
    "opening_balance",
    "debit",
    "credit",
    "closing_balance",
    "activity",
];

/// Column names required in the performance metrics CSV
pub const METRIC_COLUMNS: [&str; 3] = ["period", "metric", "value"];
