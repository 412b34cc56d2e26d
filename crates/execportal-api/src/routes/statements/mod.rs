//! Financial statement routes
//!
//! Structure:
//! - api.rs: JSON API endpoint
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::api_statement;
pub use page::{page_statements, render_statement_table};
