//! Statement JSON API

use crate::routes::time::{resolve_range, RangeQuery};
use crate::{ApiResult, AppState};
use axum::extract::{Path, Query, State};
use axum::Json;
use execportal_core::{DefaultErrorLogger, ErrorContext, ErrorLogger, StatementKind};
use execportal_utils::month_label;
use serde_json::json;

/// Build a statement (JSON API)
///
/// `GET /api/statements/:kind?from=&to=`
pub async fn api_statement(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let kind: StatementKind = kind.parse()?;
    let ledger = state.ledger.read().await;
    let range = resolve_range(&ledger, &query)?;

    let table = ledger.statement(kind, range).map_err(|e| {
        let context = ErrorContext::new("api_statement")
            .with_data("kind", json!(kind.slug()))
            .with_data("from", json!(range.from.to_string()))
            .with_data("to", json!(range.to.to_string()));
        DefaultErrorLogger.log_error(&e, &context);
        e
    })?;

    let period_labels: Vec<String> = table.periods.iter().map(|p| month_label(*p)).collect();
    Ok(Json(json!({
        "kind": kind.slug(),
        "label": kind.label(),
        "range": {
            "from": range.from.to_string(),
            "to": range.to.to_string(),
            "description": range.description(),
        },
        "period_labels": period_labels,
        "statement": table,
    })))
}
