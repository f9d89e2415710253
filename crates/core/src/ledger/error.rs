//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction amount must be greater than zero.
    #[error("Transaction amount must be greater than zero")]
    NonPositiveAmount,

    /// Tin count cannot be negative.
    #[error("Tin count cannot be negative")]
    NegativeTinCount,

    /// Expense transactions do not move tins.
    #[error("Expense transactions cannot carry tins")]
    ExpenseWithTins,

    /// Opening balance cannot be negative.
    #[error("Opening balance cannot be negative")]
    NegativeOpeningBalance,

    /// Value has more than four decimal places or too many digits.
    #[error("Amount {0} is out of range: at most 4 decimal places and 16 integer digits")]
    AmountOutOfRange(Decimal),

    /// Unrecognised transaction kind.
    #[error("Unknown transaction kind: {0}")]
    UnknownKind(String),

    // ========== Position Errors ==========
    /// Operation would drive the balance below zero.
    #[error("Insufficient balance: current {balance}, change {delta}")]
    InsufficientBalance {
        /// Balance before the operation.
        balance: Decimal,
        /// Net change the operation tried to apply.
        delta: Decimal,
    },

    /// Operation would drive the tin count below zero.
    #[error("Insufficient tins: current {tins}, change {delta}")]
    InsufficientTins {
        /// Tins before the operation.
        tins: i64,
        /// Net change the operation tried to apply.
        delta: i64,
    },

    /// Arithmetic overflow.
    #[error("Ledger arithmetic overflow")]
    Overflow,

    // ========== State Errors ==========
    /// Ledger is completed; transactions are frozen.
    #[error("Ledger is completed; undo the collection before changing it")]
    LedgerCompleted,

    /// Ledger has already been completed.
    #[error("Ledger collection is already completed")]
    AlreadyCompleted,

    /// Ledger is not completed, nothing to undo.
    #[error("Ledger collection is not completed")]
    NotCompleted,

    /// Balance is zero, nothing to collect.
    #[error("Ledger balance is zero, nothing to collect")]
    NothingToCollect,
}

impl LedgerError {
    /// Returns true if this is an input validation error (as opposed to a
    /// business rule on the current ledger state).
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveAmount
                | Self::NegativeTinCount
                | Self::ExpenseWithTins
                | Self::NegativeOpeningBalance
                | Self::AmountOutOfRange(_)
                | Self::UnknownKind(_)
        )
    }
}
