//! Dashboard aggregates.
//!
//! This module provides types for dashboard data:
//! - Entity counts
//! - Expense totals by type
//! - Trip and ledger totals
//! - Recent expenses

pub mod types;

pub use types::*;
