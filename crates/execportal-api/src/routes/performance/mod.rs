//! Performance explorer routes
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Chart and table page

pub mod api;
pub mod page;

pub use api::{api_metric_series, api_metrics};
pub use page::page_performance;
