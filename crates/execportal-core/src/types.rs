//! Basic types for statement building

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Statement category of a general-ledger account.
///
/// The leading digit of the account code decides the category:
///
/// | digit | category |
/// |-------|----------|
/// | 1 | Asset |
/// | 2 | Liability |
/// | 3 | Equity |
/// | 4 | Revenue |
/// | 5 | Cost of goods sold |
/// | 6-9 | Operating expense |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCategory {
    Asset,
    Liability,
    Equity,
    Revenue,
    CostOfGoodsSold,
    OperatingExpense,
}

impl AccountCategory {
    /// Section label
    pub fn label(&self) -> &'static str {
        match self {
            AccountCategory::Asset => "Assets",
            AccountCategory::Liability => "Liabilities",
            AccountCategory::Equity => "Equity",
            AccountCategory::Revenue => "Revenue",
            AccountCategory::CostOfGoodsSold => "Cost of Goods Sold",
            AccountCategory::OperatingExpense => "Operating Expenses",
        }
    }

    /// Statement the category belongs to
    pub fn statement(&self) -> StatementKind {
        match self {
            AccountCategory::Asset | AccountCategory::Liability | AccountCategory::Equity => {
                StatementKind::BalanceSheet
            }
            AccountCategory::Revenue
            | AccountCategory::CostOfGoodsSold
            | AccountCategory::OperatingExpense => StatementKind::IncomeStatement,
        }
    }
}

impl std::fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify an account code by its leading digit.
///
/// Codes that are empty or start with anything other than 1-9 have no
/// category and are left out of every statement.
pub fn classify_account(code: &str) -> Option<AccountCategory> {
    match code.chars().next()? {
        '1' => Some(AccountCategory::Asset),
        '2' => Some(AccountCategory::Liability),
        '3' => Some(AccountCategory::Equity),
        '4' => Some(AccountCategory::Revenue),
        '5' => Some(AccountCategory::CostOfGoodsSold),
        '6'..='9' => Some(AccountCategory::OperatingExpense),
        _ => None,
    }
}

/// Statement selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    IncomeStatement,
    BalanceSheet,
    CashFlowStatement,
}

impl Default for StatementKind {
    fn default() -> Self {
        StatementKind::IncomeStatement
    }
}

impl StatementKind {
    /// Selector options in display order
    pub fn all() -> [StatementKind; 3] {
        [
            StatementKind::IncomeStatement,
            StatementKind::BalanceSheet,
            StatementKind::CashFlowStatement,
        ]
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatement => "Income Statement",
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::CashFlowStatement => "Cash Flow Statement",
        }
    }

    /// URL/config identifier
    pub fn slug(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatement => "income_statement",
            StatementKind::BalanceSheet => "balance_sheet",
            StatementKind::CashFlowStatement => "cash_flow_statement",
        }
    }
}

impl std::str::FromStr for StatementKind {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "income_statement" | "income" | "pnl" => Ok(StatementKind::IncomeStatement),
            "balance_sheet" | "balance" => Ok(StatementKind::BalanceSheet),
            "cash_flow_statement" | "cash_flow" => Ok(StatementKind::CashFlowStatement),
            _ => Err(CoreError::UnknownStatement { name: s.to_string() }),
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Whether a statement row is an account line or a computed total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Detail,
    Subtotal,
}

/// Computed statement lines, each with a fixed label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtotalLine {
    TotalRevenue,
    TotalCostOfGoodsSold,
    GrossProfit,
    TotalOperatingExpenses,
    NetProfit,
    TotalAssets,
    TotalLiabilities,
    TotalEquity,
}

impl SubtotalLine {
    pub fn label(&self) -> &'static str {
        match self {
            SubtotalLine::TotalRevenue => "Total Revenue",
            SubtotalLine::TotalCostOfGoodsSold => "Total Cost of Goods Sold",
            SubtotalLine::GrossProfit => "Gross Profit",
            SubtotalLine::TotalOperatingExpenses => "Total Operating Expenses",
            SubtotalLine::NetProfit => "Net Profit",
            SubtotalLine::TotalAssets => "Total Assets",
            SubtotalLine::TotalLiabilities => "Total Liabilities",
            SubtotalLine::TotalEquity => "Total Equity",
        }
    }

    /// Total line closing a category section
    pub fn total_of(category: AccountCategory) -> SubtotalLine {
        match category {
            AccountCategory::Asset => SubtotalLine::TotalAssets,
            AccountCategory::Liability => SubtotalLine::TotalLiabilities,
            AccountCategory::Equity => SubtotalLine::TotalEquity,
            AccountCategory::Revenue => SubtotalLine::TotalRevenue,
            AccountCategory::CostOfGoodsSold => SubtotalLine::TotalCostOfGoodsSold,
            AccountCategory::OperatingExpense => SubtotalLine::TotalOperatingExpenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_account() {
        assert_eq!(classify_account("1000"), Some(AccountCategory::Asset));
        assert_eq!(classify_account("2100"), Some(AccountCategory::Liability));
        assert_eq!(classify_account("3000"), Some(AccountCategory::Equity));
        assert_eq!(classify_account("4010"), Some(AccountCategory::Revenue));
        assert_eq!(classify_account("5000"), Some(AccountCategory::CostOfGoodsSold));
        for code in ["6000", "7200", "8000", "9999"] {
            assert_eq!(classify_account(code), Some(AccountCategory::OperatingExpense));
        }
    }

    #[test]
    fn test_classify_account_unclassified() {
        assert_eq!(classify_account("0100"), None);
        assert_eq!(classify_account("A-100"), None);
        assert_eq!(classify_account(""), None);
    }

    #[test]
    fn test_category_statement() {
        assert_eq!(AccountCategory::Equity.statement(), StatementKind::BalanceSheet);
        assert_eq!(AccountCategory::CostOfGoodsSold.statement(), StatementKind::IncomeStatement);
    }

    #[test]
    fn test_statement_kind_from_str() {
        assert_eq!("income_statement".parse::<StatementKind>().unwrap(), StatementKind::IncomeStatement);
        assert_eq!("Balance Sheet".parse::<StatementKind>().unwrap(), StatementKind::BalanceSheet);
        assert_eq!("cash-flow".parse::<StatementKind>().unwrap(), StatementKind::CashFlowStatement);
        assert!("trial".parse::<StatementKind>().is_err());
    }

    #[test]
    fn test_statement_kind_round_trips_slug() {
        for kind in StatementKind::all() {
            assert_eq!(kind.to_string().parse::<StatementKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_subtotal_labels() {
        assert_eq!(SubtotalLine::total_of(AccountCategory::Revenue).label(), "Total Revenue");
        assert_eq!(SubtotalLine::total_of(AccountCategory::Asset).label(), "Total Assets");
        assert_eq!(SubtotalLine::NetProfit.label(), "Net Profit");
    }
}
