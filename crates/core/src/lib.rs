//! Core business logic for Fleetbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Purchase & Sale running balance and tin bookkeeping, settlement
//! - `trip` - Fuel purchase/sale lines and trip totals
//! - `expense` - Expense classification and validation
//! - `dashboard` - Dashboard aggregates
//! - `reports` - Grouped expense and trip profit reports
//! - `money` - Range of stored amounts and quantities
//! - `auth` - Password hashing

pub mod auth;
pub mod dashboard;
pub mod expense;
pub mod ledger;
pub mod money;
pub mod reports;
pub mod trip;
