//! Fleet report generation.
//!
//! This module provides pure business logic for the report endpoints:
//! - Expenses grouped by category
//! - Expenses grouped by vehicle
//! - Monthly expense buckets
//! - Trip profit per vehicle

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
