//! Period routes
//!
//! Lists the ledger's reporting periods and resolves `from`/`to` query
//! parameters into a period range.

use crate::{ApiError, ApiResult, AppState};
use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use execportal_core::{Ledger, PeriodRange};
use execportal_utils::{long_month_label, month_label};
use serde::Deserialize;
use serde_json::json;

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`; either end may be omitted
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Parse a period parameter; `YYYY-MM` means the first of the month
pub fn parse_period_param(field: &str, value: &str) -> ApiResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d"))
        .map_err(|_| ApiError::BadRequest {
            message: format!("{} must be a date like 2024-01-01, got '{}'", field, value),
        })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Resolve the requested range against the ledger.
///
/// A missing `to` is the latest period. A missing `from` covers the
/// configured number of periods ending at `to`.
pub fn resolve_range(ledger: &Ledger, query: &RangeQuery) -> ApiResult<PeriodRange> {
    let periods = ledger.periods()?;
    let latest = periods.last().copied().ok_or(ApiError::NotFound {
        resource: "ledger periods".to_string(),
    })?;

    let to = match non_empty(&query.to) {
        Some(value) => parse_period_param("to", value)?,
        None => latest,
    };
    let from = match non_empty(&query.from) {
        Some(value) => parse_period_param("from", value)?,
        None => {
            let up_to: Vec<NaiveDate> = periods.iter().copied().filter(|p| *p <= to).collect();
            PeriodRange::trailing(&up_to, ledger.config().reports.default_period_count)
                .map(|range| range.from)
                .unwrap_or(to)
        }
    };
    Ok(PeriodRange::new(from, to))
}

/// Ledger periods with display labels (JSON API)
pub async fn api_periods(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let ledger = state.ledger.read().await;
    let periods = ledger.periods()?;
    let default_range = ledger.default_range()?;

    let items: Vec<serde_json::Value> = periods
        .iter()
        .map(|p| {
            json!({
                "period": p.to_string(),
                "label": long_month_label(*p),
                "short_label": month_label(*p),
            })
        })
        .collect();

    Ok(Json(json!({
        "periods": items,
        "default_range": default_range.map(|r| json!({
            "from": r.from.to_string(),
            "to": r.to.to_string(),
        })),
    })))
}
