//! Route modules for the API server
//!
//! - statements: Financial statements (JSON and page)
//! - performance: Metric explorer (JSON and page)
//! - time: Ledger periods and range query handling
//!
//! Feature modules follow the same structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: Page rendering

pub mod performance;
pub mod statements;
pub mod time;
