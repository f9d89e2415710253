//! Purchase & Sale ledger bookkeeping.
//!
//! A ledger is a per-vehicle running account. It starts from an opening
//! balance; sales add to the balance and remove tins, purchases take from the
//! balance and add tins, expenses only take from the balance. Neither the
//! balance nor the tin count may ever go below zero.
//!
//! This module implements:
//! - Transaction kinds and their effect on a ledger
//! - Position arithmetic (apply, revert, replace, rebase, recompute)
//! - The complete-collection settlement and its undo

pub mod balance;
pub mod error;
pub mod settlement;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use balance::{
    LedgerPosition, LedgerVerification, validate_rate, validate_transaction, verify,
};
pub use error::LedgerError;
pub use settlement::{CompletionPlan, plan_completion, plan_undo};
pub use types::{LedgerStatus, TransactionEffect, TransactionKind, ensure_active};
