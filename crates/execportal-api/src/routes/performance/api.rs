//! Metric JSON API

use crate::{ApiResult, AppState};
use axum::extract::{Path, State};
use axum::Json;
use execportal_core::Metric;
use serde_json::json;

/// Available metrics (JSON API)
pub async fn api_metrics(State(state): State<AppState>) -> Json<serde_json::Value> {
    let ledger = state.ledger.read().await;
    let metrics: Vec<serde_json::Value> = Metric::all()
        .iter()
        .map(|m| {
            json!({
                "metric": m.slug(),
                "label": m.label(),
                "format": m.format(),
            })
        })
        .collect();

    Json(json!({
        "metrics": metrics,
        "default": ledger.default_metric().slug(),
        "source": ledger.metrics_source().ok(),
    }))
}

/// One metric's series (JSON API)
pub async fn api_metric_series(
    State(state): State<AppState>,
    Path(metric): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let metric: Metric = metric.parse()?;
    let ledger = state.ledger.read().await;
    let series = ledger.metric_series(metric)?;
    Ok(Json(json!({
        "series": series,
        "min": series.min(),
        "max": series.max(),
    })))
}
