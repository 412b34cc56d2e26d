//! HTTP API server and dashboard pages
//!
//! Routes are organized into modules:
//! - routes::statements: Income statement and balance sheet
//! - routes::performance: Metric explorer
//! - routes::time: Period listing and range resolution

pub mod error;
pub mod routes;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use execportal_config::Config;
use execportal_core::{Ledger, MetricFormat, ValueFormat};
use execportal_utils::{day_label, escape_html, format_accounting, format_currency, format_percent};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::performance::{api_metric_series, api_metrics, page_performance};
    use routes::statements::{api_statement, page_statements};
    use routes::time::api_periods;

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/periods", get(api_periods))
        .route("/api/statements/:kind", get(api_statement))
        .route("/api/metrics", get(api_metrics))
        .route("/api/metrics/:metric", get(api_metric_series))
        .route("/api/reload", post(api_reload))
        // Pages
        .route("/", get(index_page))
        .route("/statements", get(page_statements))
        .route("/performance", get(page_performance))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let ledger = state.ledger.read().await;
    Json(json!({
        "status": "ok",
        "loaded": ledger.is_loaded(),
    }))
}

async fn index_page() -> Redirect {
    Redirect::temporary("/statements")
}

/// Reload ledger API endpoint
async fn api_reload(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut ledger = state.ledger.write().await;
    ledger.reload().await?;
    let periods = ledger.periods()?;
    log::info!(target: "execportal::api", "ledger reloaded, {} periods", periods.len());
    Ok(Json(json!({
        "success": true,
        "periods": periods.len(),
    })))
}

// ==================== Formatting ====================

/// Statement cell in accounting format
pub fn format_amount(config: &Config, value: Decimal) -> String {
    format_accounting(
        value,
        &config.currency.symbol,
        config.currency.decimal_places,
        &config.currency.thousands_separator,
    )
}

/// Metric value with `decimal_places`, in the metric's currency or percent format
pub fn format_metric_value(config: &Config, format: &MetricFormat, value: Decimal, decimal_places: u32) -> String {
    match format.kind {
        ValueFormat::Currency => format_currency(
            value,
            &config.currency.symbol,
            decimal_places,
            &config.currency.thousands_separator,
        ),
        ValueFormat::Percent => format_percent(value, decimal_places),
    }
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} | Executive Portal</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css">
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/statements", "Financial statements"),
        ("/performance", "Performance explorer"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Executive Portal</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");
    for (path, label) in &links {
        let active_class = if current_path.starts_with(path) {
            "bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'><span>{}</span></a></li>"#,
            path, active_class, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// "Latest data" badge for the page footer
pub fn latest_data_badge(ledger: &Ledger) -> String {
    match ledger.latest_period() {
        Ok(Some(latest)) => format!(
            "<span class='inline-block px-3 py-1 text-sm rounded-full bg-green-50 text-green-700 border border-green-200'>Latest data: {}</span>",
            day_label(latest)
        ),
        _ => "<span class='inline-block px-3 py-1 text-sm rounded-full bg-gray-100 text-gray-500 border'>No data loaded</span>".to_string(),
    }
}

/// Full page with sidebar, content and footer badge
pub fn page(title: &str, current_path: &str, inner_content: &str, ledger: &Ledger) -> String {
    base_html(
        title,
        &format!(
            r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}<footer class='mt-8'>{}</footer></main>
    </div>
</div>"#,
            nav_sidebar(current_path),
            inner_content,
            latest_data_badge(ledger)
        ),
    )
}

/// Notice box, used for errors and unavailable statements
pub fn notice(message: &str) -> String {
    format!(
        "<div class='p-4 rounded-lg border border-blue-200 bg-blue-50 text-blue-700'>{}</div>",
        escape_html(message)
    )
}

/// Page body for a failed request
pub fn error_notice(error: &ApiError) -> String {
    let body = error.body();
    let mut html = format!(
        "<div class='p-4 rounded-lg border border-red-200 bg-red-50 text-red-700'><p class='font-medium'>{}</p>",
        escape_html(body["message"].as_str().unwrap_or_default())
    );
    if let Some(suggestions) = body["suggestions"].as_array() {
        html.push_str("<ul class='mt-2 text-sm list-disc list-inside'>");
        for suggestion in suggestions.iter().filter_map(|s| s.as_str()) {
            html.push_str(&format!("<li>{}</li>", escape_html(suggestion)));
        }
        html.push_str("</ul>");
    }
    html.push_str("</div>");
    html
}

/// Render a full page; errors become a notice inside the page
pub fn render_page(
    title: &str,
    current_path: &str,
    ledger: &Ledger,
    content: ApiResult<String>,
) -> Html<String> {
    let inner = match content {
        Ok(html) => html,
        Err(e) => {
            let heading = format!("<h2 class='text-2xl font-bold mb-6'>{}</h2>", escape_html(title));
            format!("{}{}", heading, error_notice(&e))
        }
    };
    Html(page(title, current_path, &inner, ledger))
}

/// Start the HTTP server
///
/// Creates the router, binds to the configured address and serves until
/// the process is stopped.
pub async fn start_server(config: Config, ledger: Arc<RwLock<Ledger>>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { ledger, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!(target: "execportal::api", "Starting executive portal on http://{}", addr);
    log::info!(target: "execportal::api", "Available routes:");
    log::info!(target: "execportal::api", "  - /statements (Financial statements)");
    log::info!(target: "execportal::api", "  - /performance (Performance explorer)");
    log::info!(target: "execportal::api", "  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!(target: "execportal::api", "Server stopped");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_load_state() {
        let (status, body) = get(create_router(state(unloaded_ledger())), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"loaded\":false"));
    }

    #[tokio::test]
    async fn test_index_redirects_to_statements() {
        let response = create_router(state(loaded_ledger()))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()["location"], "/statements");
    }

    #[test]
    fn test_latest_data_badge() {
        assert!(latest_data_badge(&loaded_ledger()).contains("Latest data: July 1, 2024"));
        assert!(latest_data_badge(&unloaded_ledger()).contains("No data loaded"));
    }

    #[test]
    fn test_format_amount_uses_currency_config() {
        let mut config = Config::default();
        assert_eq!(format_amount(&config, Decimal::new(-123450, 2)), "($1,234.50)");
        config.currency.symbol = "€".to_string();
        config.currency.decimal_places = 0;
        assert_eq!(format_amount(&config, Decimal::new(123450, 2)), "€1,235");
    }

    #[test]
    fn test_error_notice_lists_suggestions() {
        let html = error_notice(&ApiError::from(execportal_core::CoreError::NotLoaded));
        assert!(html.contains("Ledger not loaded"));
        assert!(html.contains("<li>"));
    }
}
