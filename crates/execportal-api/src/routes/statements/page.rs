//! Financial statements page rendering

use crate::routes::time::{resolve_range, RangeQuery};
use crate::{format_amount, notice, render_page, ApiResult, AppState};
use axum::extract::{Query, State};
use axum::response::Html;
use execportal_config::Config;
use execportal_core::{CoreError, Ledger, PeriodRange, StatementKind, StatementTable};
use execportal_utils::{escape_html, long_month_label, month_label};
use serde::Deserialize;

pub const NOT_IMPLEMENTED_NOTICE: &str = "This statement has not been implemented yet.";

#[derive(Debug, Default, Deserialize)]
pub struct StatementsQuery {
    pub kind: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Statement table with subtotal rows highlighted
pub fn render_statement_table(table: &StatementTable, config: &Config) -> String {
    let mut html = String::from(
        "<div class='overflow-x-auto bg-white rounded-xl shadow-sm'><table class='w-full text-sm'><thead class='bg-gray-50'><tr><th class='px-4 py-2 text-left'></th>",
    );
    for period in &table.periods {
        html.push_str(&format!(
            "<th class='px-4 py-2 text-right whitespace-nowrap'>{}</th>",
            month_label(*period)
        ));
    }
    html.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        let (row_class, label_class) = if row.is_subtotal() {
            ("bg-indigo-50 font-semibold border-t border-indigo-200", "px-4 py-2")
        } else {
            ("border-b", "px-4 py-2 pl-8")
        };
        html.push_str(&format!(
            "<tr class='{}'><td class='{}'>{}</td>",
            row_class,
            label_class,
            escape_html(&row.description)
        ));
        for value in &row.values {
            let color = if value.is_sign_negative() && !value.is_zero() { " text-red-600" } else { "" };
            html.push_str(&format!(
                "<td class='px-4 py-2 text-right whitespace-nowrap{}'>{}</td>",
                color,
                format_amount(config, *value)
            ));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");

    if !table.excluded_accounts.is_empty() {
        html.push_str(&format!(
            "<p class='mt-3 text-sm text-yellow-700'>Excluded accounts without a statement category: {}</p>",
            escape_html(&table.excluded_accounts.join(", "))
        ));
    }
    html
}

fn statement_pills(selected: StatementKind, range: &PeriodRange) -> String {
    let mut html = String::from("<div class='flex gap-2 mb-4'>");
    for kind in StatementKind::all() {
        let class = if kind == selected {
            "bg-indigo-600 text-white"
        } else {
            "bg-white text-gray-700 border hover:bg-gray-50"
        };
        html.push_str(&format!(
            "<a href='/statements?kind={}&amp;from={}&amp;to={}' class='px-4 py-1.5 rounded-full text-sm {}'>{}</a>",
            kind.slug(),
            range.from,
            range.to,
            class,
            kind.label()
        ));
    }
    html.push_str("</div>");
    html
}

fn period_select(name: &str, label: &str, ledger: &Ledger, selected: chrono::NaiveDate) -> ApiResult<String> {
    let mut html = format!(
        "<label class='text-sm text-gray-600'>{} <select name='{}' class='ml-1 px-2 py-1.5 text-sm border rounded-lg bg-white'>",
        label, name
    );
    for period in ledger.periods()? {
        html.push_str(&format!(
            "<option value='{}'{}>{}</option>",
            period,
            if period == selected { " selected" } else { "" },
            long_month_label(period)
        ));
    }
    html.push_str("</select></label>");
    Ok(html)
}

fn range_form(kind: StatementKind, range: &PeriodRange, ledger: &Ledger) -> ApiResult<String> {
    Ok(format!(
        "<form method='get' action='/statements' class='flex items-center gap-3 mb-6 p-3 bg-white rounded-lg border shadow-sm'>\
         <input type='hidden' name='kind' value='{}'>{}{}\
         <button type='submit' class='px-3 py-1.5 text-sm rounded-lg bg-indigo-600 text-white'>Apply</button></form>",
        kind.slug(),
        period_select("from", "From", ledger, range.from)?,
        period_select("to", "To", ledger, range.to)?
    ))
}

/// Page body for the selected statement and range
pub fn render_statements(ledger: &Ledger, config: &Config, query: &StatementsQuery) -> ApiResult<String> {
    let kind = match query.kind.as_deref().filter(|k| !k.is_empty()) {
        Some(kind) => kind.parse()?,
        None => ledger.default_statement(),
    };
    let range = resolve_range(
        ledger,
        &RangeQuery {
            from: query.from.clone(),
            to: query.to.clone(),
        },
    )?;

    let mut html = String::from("<div class='mb-6'><h2 class='text-2xl font-bold'>Financial statements</h2></div>");
    html.push_str(&statement_pills(kind, &range));
    html.push_str(&range_form(kind, &range, ledger)?);

    match ledger.statement(kind, range) {
        Ok(table) => {
            html.push_str(&format!(
                "<h3 class='text-lg font-semibold mb-3'>{} <span class='text-sm font-normal text-gray-500'>{}</span></h3>",
                kind.label(),
                range.description()
            ));
            html.push_str(&render_statement_table(&table, config));
        }
        Err(CoreError::NotSupported { .. }) => html.push_str(&notice(NOT_IMPLEMENTED_NOTICE)),
        Err(e) => return Err(e.into()),
    }
    Ok(html)
}

/// Financial statements page
pub async fn page_statements(
    State(state): State<AppState>,
    Query(query): Query<StatementsQuery>,
) -> Html<String> {
    let ledger = state.ledger.read().await;
    let content = render_statements(&ledger, &state.config, &query);
    render_page("Financial statements", "/statements", &ledger, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_ledger, month, unloaded_ledger};

    fn query(kind: &str, from: &str, to: &str) -> StatementsQuery {
        StatementsQuery {
            kind: Some(kind.to_string()),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
        }
    }

    #[test]
    fn test_render_income_statement_page() {
        let ledger = loaded_ledger();
        let html = render_statements(
            &ledger,
            &Config::default(),
            &query("income_statement", "2024-01-01", "2024-02-01"),
        )
        .unwrap();

        assert!(html.contains("<th class='px-4 py-2 text-right whitespace-nowrap'>Jan 2024</th>"));
        assert!(html.contains("Feb 2024"));
        assert!(!html.contains("Mar 2024</th>"));
        assert!(html.contains("Salaries &amp; Wages"));
        assert!(html.contains("($100.00)"));
        assert!(html.contains("$900.00"));
        assert!(html.contains("bg-indigo-50 font-semibold"));
        assert!(html.contains("January 2024 to February 2024"));
    }

    #[test]
    fn test_render_balance_sheet_uses_default_range() {
        let ledger = loaded_ledger();
        let html = render_statements(
            &ledger,
            &Config::default(),
            &StatementsQuery {
                kind: Some("balance_sheet".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(html.contains("Total Assets"));
        assert!(html.contains("$5,007.00"));
        assert!(!html.contains("Jan 2024</th>"));
    }

    #[test]
    fn test_cash_flow_shows_notice() {
        let ledger = loaded_ledger();
        let html = render_statements(
            &ledger,
            &Config::default(),
            &query("cash_flow_statement", "2024-01-01", "2024-03-01"),
        )
        .unwrap();
        assert!(html.contains(NOT_IMPLEMENTED_NOTICE));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_statement_table_lists_excluded_accounts() {
        let table = StatementTable {
            kind: StatementKind::IncomeStatement,
            periods: vec![month(1)],
            rows: Vec::new(),
            excluded_accounts: vec!["0999".to_string()],
        };
        let html = render_statement_table(&table, &Config::default());
        assert!(html.contains("Excluded accounts without a statement category: 0999"));
    }

    #[test]
    fn test_unloaded_ledger_is_an_error() {
        let ledger = unloaded_ledger();
        let result = render_statements(&ledger, &Config::default(), &StatementsQuery::default());
        assert!(result.is_err());
        let page = render_page("Financial statements", "/statements", &ledger, result);
        assert!(page.0.contains("Ledger not loaded"));
    }
}
