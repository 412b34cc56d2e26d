//! Performance explorer page rendering

use crate::{format_metric_value, notice, render_page, ApiResult, AppState};
use axum::extract::{Query, State};
use axum::response::Html;
use execportal_config::Config;
use execportal_core::{Ledger, Metric, MetricSeries};
use execportal_utils::{escape_html, long_month_label};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 340.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 90.0;
const Y_TICKS: u32 = 4;

#[derive(Debug, Default, Deserialize)]
pub struct PerformanceQuery {
    pub metric: Option<String>,
}

/// Vertical extent of the chart; a flat series gets a unit band around it
fn y_domain(series: &MetricSeries) -> Option<(Decimal, Decimal)> {
    let (min, max) = (series.min()?, series.max()?);
    if min == max {
        let pad = if min.is_zero() { Decimal::ONE } else { min.abs() / Decimal::TEN };
        Some((min - pad, max + pad))
    } else {
        Some((min, max))
    }
}

/// Inline SVG line chart with point tooltips
pub fn render_chart(series: &MetricSeries, config: &Config) -> String {
    let Some((low, high)) = y_domain(series) else {
        return String::new();
    };
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let span = (high - low).to_f64().unwrap_or(1.0);
    let count = series.points.len();

    let x_at = |index: usize| -> f64 {
        if count == 1 {
            MARGIN_LEFT + plot_width / 2.0
        } else {
            MARGIN_LEFT + plot_width * index as f64 / (count - 1) as f64
        }
    };
    let y_at = |value: Decimal| -> f64 {
        let offset = (high - value).to_f64().unwrap_or(0.0);
        MARGIN_TOP + plot_height * offset / span
    };

    let mut svg = format!(
        "<svg viewBox='0 0 {} {}' class='w-full' role='img' aria-label='{}'>",
        CHART_WIDTH,
        CHART_HEIGHT,
        escape_html(&series.label)
    );

    for tick in 0..=Y_TICKS {
        let value = low + (high - low) * Decimal::from(tick) / Decimal::from(Y_TICKS);
        let y = y_at(value);
        svg.push_str(&format!(
            "<line x1='{:.1}' y1='{:.1}' x2='{:.1}' y2='{:.1}' stroke='#e5e7eb'/>\
             <text x='{:.1}' y='{:.1}' text-anchor='end' font-size='11' fill='#6b7280'>{}</text>",
            MARGIN_LEFT,
            y,
            CHART_WIDTH - MARGIN_RIGHT,
            y,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            format_metric_value(config, &series.format, value, series.format.axis_decimals)
        ));
    }

    let path: Vec<String> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.1},{:.1}", x_at(i), y_at(p.value)))
        .collect();
    svg.push_str(&format!(
        "<polyline points='{}' fill='none' stroke='#4f46e5' stroke-width='2'/>",
        path.join(" ")
    ));

    for (i, point) in series.points.iter().enumerate() {
        let (x, y) = (x_at(i), y_at(point.value));
        svg.push_str(&format!(
            "<circle cx='{:.1}' cy='{:.1}' r='4' fill='#4f46e5'><title>{}: {}</title></circle>",
            x,
            y,
            long_month_label(point.period),
            format_metric_value(config, &series.format, point.value, series.format.tooltip_decimals)
        ));
        let label_y = CHART_HEIGHT - MARGIN_BOTTOM + 16.0;
        svg.push_str(&format!(
            "<text x='{:.1}' y='{:.1}' text-anchor='end' font-size='11' fill='#6b7280' transform='rotate(-45 {:.1} {:.1})'>{}</text>",
            x,
            label_y,
            x,
            label_y,
            long_month_label(point.period)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Data table under the chart
pub fn render_series_table(series: &MetricSeries, config: &Config) -> String {
    let mut html = format!(
        "<table class='w-full text-sm mt-6'><thead class='bg-gray-50'><tr><th class='px-4 py-2 text-left'>Period</th><th class='px-4 py-2 text-right'>{}</th></tr></thead><tbody>",
        escape_html(&series.label)
    );
    for point in &series.points {
        html.push_str(&format!(
            "<tr class='border-b'><td class='px-4 py-2'>{}</td><td class='px-4 py-2 text-right'>{}</td></tr>",
            long_month_label(point.period),
            format_metric_value(config, &series.format, point.value, series.format.tooltip_decimals)
        ));
    }
    html.push_str("</tbody></table>");
    html
}

fn metric_picker(selected: Metric) -> String {
    let mut html = String::from(
        "<form method='get' action='/performance' class='flex items-center gap-3 mb-6 p-3 bg-white rounded-lg border shadow-sm'>\
         <label class='text-sm text-gray-600'>Metric <select name='metric' class='ml-1 px-2 py-1.5 text-sm border rounded-lg bg-white' onchange='this.form.submit()'>",
    );
    for metric in Metric::all() {
        html.push_str(&format!(
            "<option value='{}'{}>{}</option>",
            metric.slug(),
            if metric == selected { " selected" } else { "" },
            metric.label()
        ));
    }
    html.push_str("</select></label><noscript><button type='submit' class='px-3 py-1.5 text-sm rounded-lg bg-indigo-600 text-white'>Show</button></noscript></form>");
    html
}

/// Page body for the selected metric
pub fn render_performance(ledger: &Ledger, config: &Config, query: &PerformanceQuery) -> ApiResult<String> {
    let metric = match query.metric.as_deref().filter(|m| !m.is_empty()) {
        Some(metric) => metric.parse()?,
        None => ledger.default_metric(),
    };
    let series = ledger.metric_series(metric)?;

    let mut html = String::from("<div class='mb-6'><h2 class='text-2xl font-bold'>Performance explorer</h2></div>");
    html.push_str(&metric_picker(metric));

    if series.is_empty() {
        html.push_str(&notice(&format!("No data for {}.", series.label)));
        return Ok(html);
    }

    html.push_str("<div class='bg-white rounded-xl shadow-sm p-6'>");
    if let Some(latest) = series.latest() {
        html.push_str(&format!(
            "<p class='text-sm text-gray-500 mb-4'>Latest ({}): <span class='text-lg font-semibold text-gray-900'>{}</span></p>",
            long_month_label(latest.period),
            format_metric_value(config, &series.format, latest.value, series.format.tooltip_decimals)
        ));
    }
    html.push_str(&render_chart(&series, config));
    html.push_str(&render_series_table(&series, config));
    html.push_str("</div>");
    Ok(html)
}

/// Performance explorer page
pub async fn page_performance(
    State(state): State<AppState>,
    Query(query): Query<PerformanceQuery>,
) -> Html<String> {
    let ledger = state.ledger.read().await;
    let content = render_performance(&ledger, &state.config, &query);
    render_page("Performance explorer", "/performance", &ledger, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_ledger, month};
    use execportal_core::{metric_series, MetricObservation};
    use rust_decimal_macros::dec;

    fn query(metric: &str) -> PerformanceQuery {
        PerformanceQuery {
            metric: Some(metric.to_string()),
        }
    }

    #[test]
    fn test_render_ratio_metric() {
        let ledger = loaded_ledger();
        let html = render_performance(&ledger, &Config::default(), &query("gross_profit_ratio")).unwrap();

        assert!(html.contains("<option value='gross_profit_ratio' selected>"));
        assert!(html.contains("<polyline"));
        assert_eq!(html.matches("<circle").count(), 7);
        assert!(html.contains("<title>January 2024: 51.00%</title>"));
        assert!(html.contains("57.00%"));
        assert!(html.contains("Latest (July 2024): <span class='text-lg font-semibold text-gray-900'>57.00%</span>"));
    }

    #[test]
    fn test_empty_series_shows_notice() {
        let ledger = loaded_ledger();
        let html = render_performance(&ledger, &Config::default(), &PerformanceQuery::default()).unwrap();
        assert!(html.contains("No data for Revenue."));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_unknown_metric_is_an_error() {
        let ledger = loaded_ledger();
        assert!(render_performance(&ledger, &Config::default(), &query("ebitda")).is_err());
    }

    #[test]
    fn test_flat_series_chart() {
        let observations = vec![
            MetricObservation { period: month(1), metric: "Revenue".to_string(), value: dec!(1500) },
            MetricObservation { period: month(2), metric: "Revenue".to_string(), value: dec!(1500) },
        ];
        let series = metric_series(&observations, Metric::Revenue);
        let svg = render_chart(&series, &Config::default());

        assert!(svg.contains("$1,650"));
        assert!(svg.contains("$1,350"));
        assert!(svg.contains("<title>February 2024: $1,500.00</title>"));
    }
}
