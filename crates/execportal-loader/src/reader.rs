//! CSV readers for trial balance and performance metric snapshots

use crate::error::LoadError;
use crate::types::{MetricRecord, TrialBalanceRecord, METRIC_COLUMNS, TRIAL_BALANCE_COLUMNS};
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Deserialize)]
struct TrialBalanceRow {
    period: String,
    gl_account_code: String,
    gl_account_description: String,
    opening_balance: String,
    debit: String,
    credit: String,
    closing_balance: String,
    activity: String,
}

#[derive(Deserialize)]
struct MetricRow {
    period: String,
    metric: String,
    value: String,
}

/// Parse a period cell. Accepts `YYYY-MM-DD` or `YYYY-MM`; the result is
/// always the first day of the month.
pub fn parse_period(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok())?;
    date.with_day(1)
}

/// Parse a decimal cell. Blank cells read as zero.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim().replace(',', "");
    if s.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(&s)
        .ok()
        .or_else(|| Decimal::from_scientific(&s).ok())
}

fn check_columns(headers: &StringRecord, required: &[&str], source_name: &str) -> Result<(), LoadError> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(LoadError::MissingColumn {
                column: column.to_string(),
                source_name: source_name.to_string(),
            });
        }
    }
    Ok(())
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field_error(line: u64, field: &str, value: &str) -> LoadError {
    LoadError::InvalidRecord {
        line,
        message: format!("cannot parse {} '{}'", field, value),
    }
}

fn amount_field(line: u64, field: &str, value: &str) -> Result<Decimal, LoadError> {
    parse_amount(value).ok_or_else(|| field_error(line, field, value))
}

/// Parse trial balance CSV text into records sorted by period.
///
/// The sort is stable, so rows within a period keep their file order.
pub fn parse_trial_balance(content: &str) -> Result<Vec<TrialBalanceRecord>, LoadError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();
    check_columns(&headers, &TRIAL_BALANCE_COLUMNS, "trial balance")?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = line_of(&record);
        let row: TrialBalanceRow = record.deserialize(Some(&headers))?;

        let period = parse_period(&row.period)
            .ok_or_else(|| field_error(line, "period", &row.period))?;
        let code = row.gl_account_code.trim().to_string();
        if code.is_empty() {
            log::warn!(
                target: "execportal::loader",
                "line {}: empty gl_account_code; row kept but matches no statement category",
                line
            );
        }

        records.push(TrialBalanceRecord {
            period,
            gl_account_code: code,
            gl_account_description: row.gl_account_description.trim().to_string(),
            opening_balance: amount_field(line, "opening_balance", &row.opening_balance)?,
            debit: amount_field(line, "debit", &row.debit)?,
            credit: amount_field(line, "credit", &row.credit)?,
            closing_balance: amount_field(line, "closing_balance", &row.closing_balance)?,
            activity: amount_field(line, "activity", &row.activity)?,
        });
    }

    records.sort_by_key(|r| r.period);
    log::debug!(target: "execportal::loader", "parsed {} trial balance rows", records.len());
    Ok(records)
}

/// Parse performance metric CSV text into records sorted by period
pub fn parse_performance_metrics(content: &str) -> Result<Vec<MetricRecord>, LoadError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();
    check_columns(&headers, &METRIC_COLUMNS, "performance metrics")?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = line_of(&record);
        let row: MetricRow = record.deserialize(Some(&headers))?;

        records.push(MetricRecord {
            period: parse_period(&row.period)
                .ok_or_else(|| field_error(line, "period", &row.period))?,
            metric: row.metric.trim().to_string(),
            value: amount_field(line, "value", &row.value)?,
        });
    }

    records.sort_by_key(|r| r.period);
    log::debug!(target: "execportal::loader", "parsed {} metric observations", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TRIAL_BALANCE: &str = "\
period,gl_account_code,gl_account_description,opening_balance,debit,credit,closing_balance,activity
2024-02-01,4000,Sales,0,0,150,-300,-150
2024-01-01,4000,Sales,0,0,150,-150,-150
2024-01-01,1000,Cash,100,150,0,250,150
";

    #[test]
    fn test_parse_trial_balance_sorted_by_period() {
        let records = parse_trial_balance(TRIAL_BALANCE).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].period, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(records[0].gl_account_code, "4000");
        assert_eq!(records[1].gl_account_code, "1000");
        assert_eq!(records[2].period, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(records[2].closing_balance, dec!(-300));
        assert_eq!(records[1].activity, dec!(150));
    }

    #[test]
    fn test_blank_account_code_is_kept() {
        let content = "\
period,gl_account_code,gl_account_description,opening_balance,debit,credit,closing_balance,activity
2024-01-01,4000,Sales,0,0,150,-150,-150
2024-01-01,  ,Unmapped,0,5,0,5,5
2024-01-01,1000,Cash,100,150,0,250,150
";
        let records = parse_trial_balance(content).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].gl_account_code, "4000");
        assert_eq!(records[1].gl_account_code, "");
        assert_eq!(records[1].activity, dec!(5));
        assert_eq!(records[2].gl_account_code, "1000");
    }

    #[test]
    fn test_parse_period_formats() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_period("2024-01-01"), Some(jan));
        assert_eq!(parse_period("2024-01"), Some(jan));
        assert_eq!(parse_period("2024-01-31"), Some(jan));
        assert_eq!(parse_period("January"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(""), Some(Decimal::ZERO));
        assert_eq!(parse_amount("-1,250.75"), Some(dec!(-1250.75)));
        assert_eq!(parse_amount("1e3"), Some(dec!(1000)));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_missing_column() {
        let content = "period,gl_account_code,activity\n2024-01-01,4000,-10\n";
        let err = parse_trial_balance(content).unwrap_err();
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "gl_account_description"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_amount_reports_line() {
        let content = "\
period,gl_account_code,gl_account_description,opening_balance,debit,credit,closing_balance,activity
2024-01-01,4000,Sales,0,0,0,0,lots
";
        let err = parse_trial_balance(content).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("activity"));
    }

    #[test]
    fn test_parse_performance_metrics() {
        let content = "period,metric,value\n2024-02-01,Revenue,200\n2024-01-01,Gross Profit Ratio,0.42\n";
        let records = parse_performance_metrics(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].metric, "Gross Profit Ratio");
        assert_eq!(records[0].value, dec!(0.42));
        assert_eq!(records[1].metric, "Revenue");
    }
}
