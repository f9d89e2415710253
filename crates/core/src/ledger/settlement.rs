//! Complete Collection settlement.
//!
//! Completing a ledger snapshots its current balance into a revenue expense
//! and freezes the ledger. Undo removes that expense and reopens the ledger.
//! The position itself is never touched by either step.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::LedgerPosition;
use super::error::LedgerError;
use super::types::LedgerStatus;
use crate::expense::ExpenseType;

/// What the completion step has to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPlan {
    /// Amount of the revenue expense (the ledger's current balance).
    pub amount: Decimal,
    /// Title for the revenue expense.
    pub title: String,
    /// Always `ExpenseType::Revenue`.
    pub expense_type: ExpenseType,
    /// Tins left on hand at completion, recorded in the expense notes.
    pub tins_on_hand: i64,
}

impl CompletionPlan {
    /// Notes attached to the generated expense.
    #[must_use]
    pub fn notes(&self) -> String {
        format!(
            "Collected balance {} with {} tins on hand",
            self.amount, self.tins_on_hand
        )
    }
}

/// Plans the complete-collection step for a ledger.
///
/// # Errors
///
/// - `AlreadyCompleted` if the ledger is completed
/// - `NothingToCollect` if the balance is zero
pub fn plan_completion(
    status: LedgerStatus,
    position: LedgerPosition,
    ledger_title: &str,
) -> Result<CompletionPlan, LedgerError> {
    if status == LedgerStatus::Completed {
        return Err(LedgerError::AlreadyCompleted);
    }
    if position.balance <= Decimal::ZERO {
        return Err(LedgerError::NothingToCollect);
    }

    Ok(CompletionPlan {
        amount: position.balance,
        title: format!("Collection: {}", ledger_title.trim()),
        expense_type: ExpenseType::Revenue,
        tins_on_hand: position.tins,
    })
}

/// Checks that a completion can be undone.
///
/// # Errors
///
/// Returns `NotCompleted` if the ledger is still active.
pub fn plan_undo(status: LedgerStatus) -> Result<(), LedgerError> {
    match status {
        LedgerStatus::Completed => Ok(()),
        LedgerStatus::Active => Err(LedgerError::NotCompleted),
    }
}
