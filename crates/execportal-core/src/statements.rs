//! Statement builder: turns the flat trial balance into subtotaled statements
//!
//! Both statements follow the same pipeline. Entries are filtered to the
//! period range and the statement's account categories, pivoted into one row
//! per account with one column per period, partitioned by category, summed
//! into subtotals, and concatenated in a fixed order.
//!
//! A missing (account, period) cell is zero. Detail rows keep the order in
//! which their account first appears in the ledger.

use crate::error::{CoreError, CoreResult};
use crate::models::LedgerEntry;
use crate::time::{available_periods, PeriodRange};
use crate::types::{AccountCategory, RowKind, StatementKind, SubtotalLine};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One statement line with a value per period column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    /// `None` on computed subtotal/total rows
    pub account_code: Option<String>,
    pub description: String,
    pub kind: RowKind,
    /// Aligned with `StatementTable::periods`
    pub values: Vec<Decimal>,
}

impl StatementRow {
    fn detail(code: &str, description: &str, width: usize) -> Self {
        Self {
            account_code: Some(code.to_string()),
            description: description.to_string(),
            kind: RowKind::Detail,
            values: vec![Decimal::ZERO; width],
        }
    }

    fn subtotal(line: SubtotalLine, values: Vec<Decimal>) -> Self {
        Self {
            account_code: None,
            description: line.label().to_string(),
            kind: RowKind::Subtotal,
            values,
        }
    }

    pub fn is_subtotal(&self) -> bool {
        self.kind == RowKind::Subtotal
    }

    /// Sum of the row across all period columns
    pub fn total(&self) -> Decimal {
        self.values.iter().copied().sum()
    }
}

/// A built statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    pub kind: StatementKind,
    /// Period columns, chronological
    pub periods: Vec<NaiveDate>,
    pub rows: Vec<StatementRow>,
    /// Account codes in range that no category claims
    pub excluded_accounts: Vec<String>,
}

impl StatementTable {
    /// Find a computed line
    pub fn subtotal(&self, line: SubtotalLine) -> Option<&StatementRow> {
        self.rows
            .iter()
            .find(|r| r.is_subtotal() && r.description == line.label())
    }

    /// Find a detail row by account code
    pub fn account(&self, code: &str) -> Option<&StatementRow> {
        self.rows
            .iter()
            .find(|r| r.account_code.as_deref() == Some(code))
    }

    pub fn detail_rows(&self) -> impl Iterator<Item = &StatementRow> {
        self.rows.iter().filter(|r| !r.is_subtotal())
    }

    /// Value of `row` in the column for `period`
    pub fn value_at(&self, row: &StatementRow, period: NaiveDate) -> Option<Decimal> {
        let column = self.periods.iter().position(|p| *p == period)?;
        row.values.get(column).copied()
    }
}

#[derive(Debug, Clone, Copy)]
enum ValueField {
    Activity,
    ClosingBalance,
}

impl ValueField {
    fn of(&self, entry: &LedgerEntry) -> Decimal {
        match self {
            ValueField::Activity => entry.activity,
            ValueField::ClosingBalance => entry.closing_balance,
        }
    }
}

/// Detail rows of one statement, tagged with their category
struct Pivot {
    periods: Vec<NaiveDate>,
    rows: Vec<(AccountCategory, StatementRow)>,
    excluded_accounts: Vec<String>,
}

impl Pivot {
    fn width(&self) -> usize {
        self.periods.len()
    }

    fn take(&mut self, category: AccountCategory) -> Vec<StatementRow> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|(c, _)| *c == category);
        self.rows = kept;
        taken.into_iter().map(|(_, row)| row).collect()
    }
}

fn pivot(
    entries: &[LedgerEntry],
    from: NaiveDate,
    to: NaiveDate,
    statement: StatementKind,
    field: ValueField,
) -> CoreResult<Pivot> {
    let range = PeriodRange::new(from, to);
    let all_periods = available_periods(entries);
    range.validate_against(&all_periods)?;

    if range.is_empty() {
        log::debug!(
            target: "execportal::statements",
            "{} requested for reversed range {}; no columns selected",
            statement.label(),
            range.description()
        );
    }
    let periods = range.select(&all_periods);
    let columns: HashMap<NaiveDate, usize> =
        periods.iter().enumerate().map(|(i, p)| (*p, i)).collect();

    let mut rows: Vec<(AccountCategory, StatementRow)> = Vec::new();
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut excluded = BTreeSet::new();

    for entry in entries {
        let Some(&column) = columns.get(&entry.period) else {
            continue;
        };
        let Some(category) = entry.category() else {
            excluded.insert(entry.gl_account_code.clone());
            continue;
        };
        if category.statement() != statement {
            continue;
        }

        let key = (entry.gl_account_code.as_str(), entry.gl_account_description.as_str());
        let slot = *slots.entry(key).or_insert_with(|| {
            rows.push((category, StatementRow::detail(key.0, key.1, periods.len())));
            rows.len() - 1
        });
        rows[slot].1.values[column] += field.of(entry);
    }

    for code in &excluded {
        log::warn!(
            target: "execportal::statements",
            "account {} has no statement category and was excluded from the {}",
            code,
            statement.label()
        );
    }

    Ok(Pivot {
        periods,
        rows,
        excluded_accounts: excluded.into_iter().collect(),
    })
}

/// Per-period column sums over `rows`
fn column_sums(rows: &[StatementRow], width: usize) -> Vec<Decimal> {
    let mut sums = vec![Decimal::ZERO; width];
    for row in rows {
        for (sum, value) in sums.iter_mut().zip(&row.values) {
            *sum += *value;
        }
    }
    sums
}

fn column_difference(left: &[Decimal], right: &[Decimal]) -> Vec<Decimal> {
    left.iter().zip(right).map(|(l, r)| *l - *r).collect()
}

fn negate(value: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        -value
    }
}

/// Build the income statement for `[period_from, period_to]`.
///
/// Revenue accounts (4) are sign-flipped to display as positive figures.
/// Rows: revenue details, Total Revenue, COGS details (5), Total Cost of
/// Goods Sold, Gross Profit, operating expense details (6-9), Total
/// Operating Expenses, Net Profit.
pub fn build_income_statement(
    entries: &[LedgerEntry],
    period_from: NaiveDate,
    period_to: NaiveDate,
) -> CoreResult<StatementTable> {
    let mut pivot = pivot(
        entries,
        period_from,
        period_to,
        StatementKind::IncomeStatement,
        ValueField::Activity,
    )?;
    let width = pivot.width();

    let mut revenue = pivot.take(AccountCategory::Revenue);
    for row in &mut revenue {
        for value in &mut row.values {
            *value = negate(*value);
        }
    }
    let cost_of_goods_sold = pivot.take(AccountCategory::CostOfGoodsSold);
    let operating_expenses = pivot.take(AccountCategory::OperatingExpense);

    let total_revenue = column_sums(&revenue, width);
    let total_cost_of_goods_sold = column_sums(&cost_of_goods_sold, width);
    let gross_profit = column_difference(&total_revenue, &total_cost_of_goods_sold);
    let total_operating_expenses = column_sums(&operating_expenses, width);
    let net_profit = column_difference(&gross_profit, &total_operating_expenses);

    let mut rows = Vec::with_capacity(
        revenue.len() + cost_of_goods_sold.len() + operating_expenses.len() + 5,
    );
    rows.extend(revenue);
    rows.push(StatementRow::subtotal(SubtotalLine::TotalRevenue, total_revenue));
    rows.extend(cost_of_goods_sold);
    rows.push(StatementRow::subtotal(SubtotalLine::TotalCostOfGoodsSold, total_cost_of_goods_sold));
    rows.push(StatementRow::subtotal(SubtotalLine::GrossProfit, gross_profit));
    rows.extend(operating_expenses);
    rows.push(StatementRow::subtotal(SubtotalLine::TotalOperatingExpenses, total_operating_expenses));
    rows.push(StatementRow::subtotal(SubtotalLine::NetProfit, net_profit));

    log::debug!(
        target: "execportal::statements",
        "built income statement: {} rows x {} periods",
        rows.len(),
        width
    );

    Ok(StatementTable {
        kind: StatementKind::IncomeStatement,
        periods: pivot.periods,
        rows,
        excluded_accounts: pivot.excluded_accounts,
    })
}

/// Build the balance sheet for `[period_from, period_to]` from closing
/// balances. Each of assets (1), liabilities (2) and equity (3) is followed
/// by its own total; the sections are not combined further.
pub fn build_balance_sheet(
    entries: &[LedgerEntry],
    period_from: NaiveDate,
    period_to: NaiveDate,
) -> CoreResult<StatementTable> {
    let mut pivot = pivot(
        entries,
        period_from,
        period_to,
        StatementKind::BalanceSheet,
        ValueField::ClosingBalance,
    )?;
    let width = pivot.width();

    let mut rows = Vec::new();
    for category in [AccountCategory::Asset, AccountCategory::Liability, AccountCategory::Equity] {
        let section = pivot.take(category);
        let total = column_sums(&section, width);
        rows.extend(section);
        rows.push(StatementRow::subtotal(SubtotalLine::total_of(category), total));
    }

    log::debug!(
        target: "execportal::statements",
        "built balance sheet: {} rows x {} periods",
        rows.len(),
        width
    );

    Ok(StatementTable {
        kind: StatementKind::BalanceSheet,
        periods: pivot.periods,
        rows,
        excluded_accounts: pivot.excluded_accounts,
    })
}

/// Build the statement chosen in the selector
pub fn build_statement(
    kind: StatementKind,
    entries: &[LedgerEntry],
    period_from: NaiveDate,
    period_to: NaiveDate,
) -> CoreResult<StatementTable> {
    match kind {
        StatementKind::IncomeStatement => build_income_statement(entries, period_from, period_to),
        StatementKind::BalanceSheet => build_balance_sheet(entries, period_from, period_to),
        StatementKind::CashFlowStatement => Err(CoreError::NotSupported {
            operation: "cash flow statement".to_string(),
        }),
    }
}

// ==================== Tests ====================
